//! Driver lifecycle states.

use std::fmt;

/// Where an animation driver is in its life.
///
/// `Uninitialized → Running → Stopped`, or `Uninitialized → Stopped` when
/// unmounted before a drawing context was found. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DriverState {
    /// Created, no frame requested yet.
    #[default]
    Uninitialized,
    /// Ticking and rendering every frame.
    Running,
    /// Cancelled. No further frames.
    Stopped,
}

impl DriverState {
    /// Whether `self → next` is a legal transition. Staying put is always
    /// legal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Uninitialized, _)
                | (Self::Running, Self::Running | Self::Stopped)
                | (Self::Stopped, Self::Stopped)
        )
    }

    /// Whether frames are being produced.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Whether the driver reached its terminal state.
    #[must_use]
    pub const fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
