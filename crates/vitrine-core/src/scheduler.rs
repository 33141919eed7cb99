//! Display-refresh scheduling.
//!
//! [`FrameScheduler`] is the seam between the driver and the host's
//! per-frame callback (`requestAnimationFrame` in the browser). The
//! [`ManualScheduler`] is the headless implementation: requests queue up
//! until a test or the preview command pumps them.

use std::collections::BTreeSet;
use std::fmt;

/// Handle for one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequest(pub u64);

impl fmt::Display for FrameRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Host callback scheduling.
pub trait FrameScheduler {
    /// Ask for one callback on the next display refresh.
    fn request_frame(&mut self) -> FrameRequest;

    /// Cancel a previously requested callback. Cancelling an unknown or
    /// already delivered request does nothing.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Scheduler whose frames are delivered by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: BTreeSet<FrameRequest>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests not yet delivered or cancelled.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether a request is still pending.
    #[must_use]
    pub fn is_pending(&self, request: FrameRequest) -> bool {
        self.pending.contains(&request)
    }

    /// Total requests ever made.
    #[must_use]
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total requests cancelled while pending.
    #[must_use]
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Remove and return every pending request, oldest first, as the host
    /// would when the display refreshes.
    pub fn take_due(&mut self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        self.requested += 1;
        let request = FrameRequest(self.next_id);
        self.pending.insert(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending.remove(&request) {
            self.cancelled += 1;
        }
    }
}
