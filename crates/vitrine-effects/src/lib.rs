//! Animated canvas effects for portfolio pages.
//!
//! Each effect implements [`vitrine_core::Effect`] and is driven by a
//! [`vitrine_core::AnimationDriver`]. Hosts that choose an effect by name use
//! [`EffectKind`].
//!
//! ```
//! use vitrine_core::{DeterministicRng, Effect, RecordingCanvas, Size};
//! use vitrine_effects::MatrixRain;
//!
//! let mut rain = MatrixRain::default();
//! let mut rng = DeterministicRng::new(7);
//! rain.initialize(Size::new(300.0, 200.0), &mut rng);
//! rain.tick(1.0 / 60.0, &mut rng);
//!
//! let mut canvas = RecordingCanvas::with_size(Size::new(300.0, 200.0));
//! rain.render(&mut canvas);
//! assert!(!canvas.is_empty());
//! ```

mod catalog;
mod data_pipeline;
mod gradient_backdrop;
mod matrix_rain;
mod neural_network;
pub mod palette;
mod particle_field;
mod skill_radar;

pub use catalog::{EffectError, EffectKind};
pub use data_pipeline::{DataPipeline, DataPipelineConfig, Stage};
pub use gradient_backdrop::{GradientBackdrop, GradientBackdropConfig, GradientSpec};
pub use matrix_rain::{glyph_color, glyph_size, MatrixRain, MatrixRainConfig, GLYPHS};
pub use neural_network::{NeuralNetwork, NeuralNetworkConfig};
pub use particle_field::{ParticleField, ParticleFieldConfig};
pub use skill_radar::{Skill, SkillRadar, SkillRadarConfig};
