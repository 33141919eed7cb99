//! Mount options passed from JavaScript as JSON.

use serde::{Deserialize, Serialize};
use vitrine_core::{DriverConfig, Effect};
use vitrine_effects::{EffectError, EffectKind};

/// Options for [`crate::EffectMount`].
///
/// ```json
/// { "seed": 7, "max_fps": 30, "resize_quiet_ms": 100, "config": { "max_drops": 64 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MountOptions {
    /// Fixed RNG seed. Random when absent.
    pub seed: Option<u64>,
    /// Frame-rate cap.
    pub max_fps: Option<f64>,
    /// Largest tick step in seconds.
    pub max_dt: Option<f64>,
    /// Quiet period before a resize is applied, in milliseconds.
    pub resize_quiet_ms: f64,
    /// Effect-specific config; missing fields take defaults.
    pub config: Option<serde_json::Value>,
}

impl MountOptions {
    /// Parse options. `None`, empty and whitespace-only input give defaults.
    pub fn from_json(json: Option<&str>) -> Result<Self, serde_json::Error> {
        match json.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(text) => serde_json::from_str(text),
        }
    }

    /// Driver config, seeding from `fallback_seed` when no seed was given.
    pub fn driver_config(&self, fallback_seed: u64) -> DriverConfig {
        let defaults = DriverConfig::default();
        DriverConfig {
            max_fps: self.max_fps,
            max_dt: self.max_dt.unwrap_or(defaults.max_dt),
            seed: self.seed.unwrap_or(fallback_seed),
        }
    }

    /// Build the effect with this config.
    pub fn build_effect(&self, kind: EffectKind) -> Result<Box<dyn Effect>, EffectError> {
        match &self.config {
            Some(config) => kind.build_with_config(config),
            None => Ok(kind.build()),
        }
    }
}
