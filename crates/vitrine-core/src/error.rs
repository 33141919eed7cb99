//! Error types for the animation driver.

use crate::Size;
use thiserror::Error;

/// Errors from driver and component operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriverError {
    /// The driver was stopped; stopped drivers never restart.
    #[error("driver is stopped")]
    Stopped,

    /// A resize with non-finite or negative dimensions.
    #[error("invalid canvas size: {}x{}", .0.width, .0.height)]
    InvalidSize(Size),
}

/// Result alias for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DriverError::Stopped.to_string(), "driver is stopped");
        assert_eq!(
            DriverError::InvalidSize(Size::new(-1.0, 2.0)).to_string(),
            "invalid canvas size: -1x2"
        );
    }
}
