#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::float_cmp)]
//! Headless testing for Vitrine effects.
//!
//! [`FrameHarness`] stands in for the browser: it owns the clock, delivers
//! animation frames, resizes the viewport and records every draw call.
//! [`Snapshot`] compares recorded frames against JSON baselines.
//!
//! ```
//! use vitrine_core::Size;
//! use vitrine_effects::ParticleField;
//! use vitrine_test::FrameHarness;
//!
//! let mut harness = FrameHarness::new(ParticleField::default(), Size::new(800.0, 600.0));
//! harness.mount().unwrap();
//! assert_eq!(harness.pump(10), 10);
//!
//! harness.unmount();
//! assert_eq!(harness.listener_count(), 0);
//! assert_eq!(harness.pending_frames(), 0);
//! ```

mod harness;
mod snapshot;

pub use harness::{FrameHarness, FrameRecord, HarnessComponent};
pub use snapshot::{Comparison, FrameSummary, Snapshot, SnapshotError};
