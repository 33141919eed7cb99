//! Core types and traits for Vitrine canvas effects.
//!
//! This crate provides the scaffolding every effect shares:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color and paint: [`Color`], [`Paint`], [`DrawCommand`]
//! - The drawing surface: [`Canvas`], with [`RecordingCanvas`] for headless use
//! - Tweening: [`Easing`], [`Tween`], [`Timeline`]
//! - The effect contract: [`Effect`] and [`EntityPool`]
//! - Frame loop: [`AnimationDriver`], [`FrameScheduler`], [`CanvasComponent`]
//!
//! Nothing here touches the browser. Host crates implement [`Canvas`],
//! [`FrameScheduler`] and [`Viewport`] over their platform.

pub mod animation;
mod canvas;
mod color;
mod component;
pub mod draw;
mod driver;
mod effect;
mod error;
mod geometry;
mod lifecycle;
pub mod rng;
mod scheduler;
mod viewport;

pub use animation::{Easing, Interpolate, Repeat, Timeline, Tween};
pub use canvas::{Canvas, RecordingCanvas};
pub use color::{Color, ColorParseError};
pub use component::CanvasComponent;
pub use draw::{DrawCommand, GradientStop, Paint, TextAlign, TextStyle};
pub use driver::{AnimationDriver, DriverConfig, FrameOutcome};
pub use effect::{frame_factor, Effect, EntityPool, REFERENCE_FRAME_SECS};
pub use error::{DriverError, Result};
pub use geometry::{clamp_coord, wrap_coord, Point, Rect, Size};
pub use lifecycle::DriverState;
pub use rng::DeterministicRng;
pub use scheduler::{FrameRequest, FrameScheduler, ManualScheduler};
pub use viewport::{ListenerId, ResizeDebouncer, SimulatedViewport, Viewport};
