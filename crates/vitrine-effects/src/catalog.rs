//! Name → effect lookup for hosts that pick effects at runtime.

use crate::{
    DataPipeline, DataPipelineConfig, GradientBackdrop, GradientBackdropConfig, MatrixRain,
    MatrixRainConfig, NeuralNetwork, NeuralNetworkConfig, ParticleField, ParticleFieldConfig,
    SkillRadar, SkillRadarConfig,
};
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use vitrine_core::Effect;

/// Every effect the crate ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// [`MatrixRain`]
    MatrixRain,
    /// [`NeuralNetwork`]
    NeuralNetwork,
    /// [`ParticleField`]
    ParticleField,
    /// [`DataPipeline`]
    DataPipeline,
    /// [`GradientBackdrop`]
    GradientBackdrop,
    /// [`SkillRadar`]
    SkillRadar,
}

/// Errors from looking up or configuring an effect.
#[derive(Debug, Error)]
pub enum EffectError {
    /// No effect by that name.
    #[error("unknown effect '{0}' (expected one of: {names})", names = EffectKind::names().join(", "))]
    Unknown(String),

    /// Config JSON did not match the effect's config.
    #[error("invalid config for {kind}: {source}")]
    InvalidConfig {
        /// Effect being configured
        kind: EffectKind,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },
}

impl EffectKind {
    /// All kinds in catalog order.
    pub const ALL: [Self; 6] = [
        Self::MatrixRain,
        Self::NeuralNetwork,
        Self::ParticleField,
        Self::DataPipeline,
        Self::GradientBackdrop,
        Self::SkillRadar,
    ];

    /// Kebab-case name, matching [`Effect::name`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MatrixRain => "matrix-rain",
            Self::NeuralNetwork => "neural-network",
            Self::ParticleField => "particle-field",
            Self::DataPipeline => "data-pipeline",
            Self::GradientBackdrop => "gradient-backdrop",
            Self::SkillRadar => "skill-radar",
        }
    }

    /// One-line description for listings.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::MatrixRain => "falling columns of SQL, big-data and cloud keywords",
            Self::NeuralNetwork => "layered network with pulsing nodes and travelling packets",
            Self::ParticleField => "drifting particles pushed away by the pointer",
            Self::DataPipeline => "sources, transforms and sinks with packets flowing between",
            Self::GradientBackdrop => "gradient swaying between two angles and palettes",
            Self::SkillRadar => "radar chart of skill levels with a grow-in",
        }
    }

    /// Every name, in catalog order.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.name()).collect()
    }

    /// Build with default config.
    #[must_use]
    pub fn build(self) -> Box<dyn Effect> {
        match self {
            Self::MatrixRain => Box::new(MatrixRain::default()),
            Self::NeuralNetwork => Box::new(NeuralNetwork::default()),
            Self::ParticleField => Box::new(ParticleField::default()),
            Self::DataPipeline => Box::new(DataPipeline::default()),
            Self::GradientBackdrop => Box::new(GradientBackdrop::default()),
            Self::SkillRadar => Box::new(SkillRadar::default()),
        }
    }

    /// Build from a JSON config object. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// [`EffectError::InvalidConfig`] if the JSON does not fit the config.
    pub fn build_with_config(self, config: &serde_json::Value) -> Result<Box<dyn Effect>, EffectError> {
        fn parse<T: DeserializeOwned>(kind: EffectKind, value: &serde_json::Value) -> Result<T, EffectError> {
            T::deserialize(value).map_err(|source| EffectError::InvalidConfig { kind, source })
        }

        Ok(match self {
            Self::MatrixRain => Box::new(MatrixRain::new(parse::<MatrixRainConfig>(self, config)?)),
            Self::NeuralNetwork => {
                Box::new(NeuralNetwork::new(parse::<NeuralNetworkConfig>(self, config)?))
            }
            Self::ParticleField => {
                Box::new(ParticleField::new(parse::<ParticleFieldConfig>(self, config)?))
            }
            Self::DataPipeline => {
                Box::new(DataPipeline::new(parse::<DataPipelineConfig>(self, config)?))
            }
            Self::GradientBackdrop => {
                Box::new(GradientBackdrop::new(parse::<GradientBackdropConfig>(self, config)?))
            }
            Self::SkillRadar => Box::new(SkillRadar::new(parse::<SkillRadarConfig>(self, config)?)),
        })
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = EffectError;

    /// Accepts kebab-case, snake_case or CamelCase names, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|k| k.name().replace('-', "") == wanted)
            .ok_or_else(|| EffectError::Unknown(s.to_string()))
    }
}
