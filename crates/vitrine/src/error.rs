//! Errors raised while mounting an effect in the page.

use thiserror::Error;
use vitrine_core::DriverError;
use vitrine_effects::EffectError;

/// Why an effect could not be mounted.
#[derive(Debug, Error)]
pub enum MountError {
    /// No global `window`.
    #[error("no window available")]
    NoWindow,

    /// The window has no document.
    #[error("no document available")]
    NoDocument,

    /// No element with the given id.
    #[error("canvas '{0}' not found")]
    CanvasNotFound(String),

    /// The element exists but is not a `<canvas>`.
    #[error("element '{0}' is not a canvas")]
    NotACanvas(String),

    /// Options JSON was malformed.
    #[error("invalid mount options: {0}")]
    Options(#[from] serde_json::Error),

    /// Unknown effect or bad effect config.
    #[error(transparent)]
    Effect(#[from] EffectError),

    /// The driver refused to start.
    #[error(transparent)]
    Driver(#[from] DriverError),
}
