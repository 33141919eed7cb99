//! The animation driver: tick then render on every display refresh.
//!
//! One driver owns one effect, one optional canvas, and one scheduler. It
//! keeps at most one frame request pending at a time, so a running driver
//! is always exactly one callback away from its next frame.

use crate::canvas::Canvas;
use crate::effect::{Effect, REFERENCE_FRAME_SECS};
use crate::error::{DriverError, Result};
use crate::lifecycle::DriverState;
use crate::rng::{DeterministicRng, DEFAULT_SEED};
use crate::scheduler::{FrameRequest, FrameScheduler};
use crate::{Point, Size};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Driver tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Frame-rate cap. Frames arriving sooner are skipped.
    pub max_fps: Option<f64>,
    /// Largest `dt` passed to `tick`, in seconds. Keeps a backgrounded tab
    /// from teleporting entities when it resumes.
    pub max_dt: f64,
    /// RNG seed for initialize and tick.
    pub seed: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_fps: None,
            max_dt: 0.1,
            seed: DEFAULT_SEED,
        }
    }
}

impl DriverConfig {
    /// Cap the frame rate.
    #[must_use]
    pub fn with_max_fps(mut self, fps: f64) -> Self {
        self.max_fps = Some(fps);
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn min_interval_ms(&self) -> Option<f64> {
        self.max_fps
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .map(|fps| 1000.0 / fps)
    }

    fn nominal_dt(&self) -> f64 {
        self.min_interval_ms()
            .map_or(f64::from(REFERENCE_FRAME_SECS), |ms| ms / 1000.0)
    }
}

/// What a frame callback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Ticked and rendered; next frame requested.
    Rendered,
    /// Skipped by the frame-rate cap; next frame requested.
    Throttled,
    /// Stale request or driver not running; nothing happened.
    Ignored,
}

/// Schedules an effect's tick and render on every display refresh.
#[derive(Debug)]
pub struct AnimationDriver<E, C, S> {
    effect: E,
    canvas: Option<C>,
    scheduler: S,
    state: DriverState,
    pending: Option<FrameRequest>,
    last_frame_ms: Option<f64>,
    frames_rendered: u64,
    initialized: bool,
    rng: DeterministicRng,
    config: DriverConfig,
}

impl<E: Effect, C: Canvas, S: FrameScheduler> AnimationDriver<E, C, S> {
    /// Create a driver. `canvas` is `None` when the host could not provide
    /// a drawing context; such a driver never draws.
    pub fn new(effect: E, canvas: Option<C>, scheduler: S, config: DriverConfig) -> Self {
        Self {
            effect,
            canvas,
            scheduler,
            state: DriverState::Uninitialized,
            pending: None,
            last_frame_ms: None,
            frames_rendered: 0,
            initialized: false,
            rng: DeterministicRng::new(config.seed),
            config,
        }
    }

    /// Begin requesting frames.
    ///
    /// Without a canvas this is a no-op and the driver stays
    /// uninitialized. Starting a running driver does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Stopped`] if the driver was stopped.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            DriverState::Stopped => return Err(DriverError::Stopped),
            DriverState::Running => return Ok(()),
            DriverState::Uninitialized => {}
        }

        let Some(canvas) = self.canvas.as_ref() else {
            debug!(effect = self.effect.name(), "no drawing context, not starting");
            return Ok(());
        };

        if !self.initialized {
            let size = canvas.size();
            self.effect.initialize(size, &mut self.rng);
            self.initialized = true;
        }

        self.state = DriverState::Running;
        self.pending = Some(self.scheduler.request_frame());
        debug!(effect = self.effect.name(), "driver started");
        Ok(())
    }

    /// Handle the host's frame callback for `request` at `timestamp_ms`.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) -> FrameOutcome {
        if !self.state.is_running() || self.pending != Some(request) {
            trace!(%request, state = %self.state, "ignoring frame");
            return FrameOutcome::Ignored;
        }
        self.pending = None;

        if let (Some(min_interval), Some(last)) = (self.config.min_interval_ms(), self.last_frame_ms)
        {
            if timestamp_ms - last < min_interval {
                self.pending = Some(self.scheduler.request_frame());
                return FrameOutcome::Throttled;
            }
        }

        let dt = match self.last_frame_ms {
            Some(last) => (timestamp_ms - last) / 1000.0,
            None => self.config.nominal_dt(),
        };
        let dt = if dt.is_finite() && dt > 0.0 {
            dt.min(self.config.max_dt.max(0.0))
        } else {
            0.0
        };

        self.effect.tick(dt as f32, &mut self.rng);
        if let Some(canvas) = self.canvas.as_mut() {
            self.effect.render(canvas);
        }

        self.frames_rendered += 1;
        if timestamp_ms.is_finite() {
            self.last_frame_ms = Some(timestamp_ms);
        }
        self.pending = Some(self.scheduler.request_frame());
        FrameOutcome::Rendered
    }

    /// Cancel the pending frame and stop for good. Safe to call any number
    /// of times, from any state.
    pub fn stop(&mut self) {
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
        if !self.state.is_stopped() {
            debug!(
                effect = self.effect.name(),
                frames = self.frames_rendered,
                "driver stopped"
            );
            self.state = DriverState::Stopped;
        }
    }

    /// Size the canvas and rebuild the entity pool. Does nothing once
    /// stopped or without a canvas.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidSize`] for non-finite or negative
    /// dimensions; the previous pool is kept.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        if !size.is_valid() {
            return Err(DriverError::InvalidSize(size));
        }
        if self.state.is_stopped() {
            return Ok(());
        }
        let Some(canvas) = self.canvas.as_mut() else {
            return Ok(());
        };

        canvas.resize(size);
        self.effect.initialize(size, &mut self.rng);
        self.initialized = true;
        debug!(
            effect = self.effect.name(),
            width = size.width,
            height = size.height,
            entities = self.effect.entity_count(),
            "pool rebuilt"
        );
        Ok(())
    }

    /// Forward a pointer position to the effect.
    pub fn pointer_moved(&mut self, point: Option<Point>) {
        if !self.state.is_stopped() {
            self.effect.pointer_moved(point);
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The request the driver is waiting on, if any.
    pub fn pending_request(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Frames ticked and rendered so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Whether a drawing context is attached.
    pub fn has_canvas(&self) -> bool {
        self.canvas.is_some()
    }

    /// The effect.
    pub fn effect(&self) -> &E {
        &self.effect
    }

    /// The effect, mutably.
    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    /// The canvas, if any.
    pub fn canvas(&self) -> Option<&C> {
        self.canvas.as_ref()
    }

    /// The canvas, mutably.
    pub fn canvas_mut(&mut self) -> Option<&mut C> {
        self.canvas.as_mut()
    }

    /// The scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The scheduler, mutably.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Driver configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::draw::Paint;
    use crate::scheduler::ManualScheduler;
    use crate::Color;

    /// One dot moving right at 1 px per reference frame.
    #[derive(Debug, Default)]
    struct Dot {
        size: Size,
        x: f32,
        ticks: u32,
        last_dt: f32,
        inits: u32,
    }

    impl Effect for Dot {
        fn name(&self) -> &'static str {
            "dot"
        }

        fn initialize(&mut self, size: Size, _rng: &mut DeterministicRng) {
            self.size = size;
            self.x = 0.0;
            self.inits += 1;
        }

        fn tick(&mut self, dt: f32, _rng: &mut DeterministicRng) {
            self.ticks += 1;
            self.last_dt = dt;
            self.x = crate::wrap_coord(self.x + crate::frame_factor(dt), self.size.width);
        }

        fn render(&self, canvas: &mut dyn Canvas) {
            canvas.fill_circle(Point::new(self.x, 0.0), 1.0, &Paint::Solid(Color::WHITE));
        }

        fn entity_count(&self) -> usize {
            1
        }

        fn capacity(&self) -> usize {
            1
        }

        fn bounds(&self) -> Size {
            self.size
        }

        fn positions(&self) -> Vec<Point> {
            vec![Point::new(self.x, 0.0)]
        }
    }

    type TestDriver = AnimationDriver<Dot, RecordingCanvas, ManualScheduler>;

    fn driver(config: DriverConfig) -> TestDriver {
        AnimationDriver::new(
            Dot::default(),
            Some(RecordingCanvas::with_size(Size::new(100.0, 100.0))),
            ManualScheduler::new(),
            config,
        )
    }

    fn pump(d: &mut TestDriver, ts: f64) -> Option<FrameOutcome> {
        let due = d.scheduler_mut().take_due();
        due.into_iter().map(|r| d.on_frame(r, ts)).last()
    }

    #[test]
    fn test_start_requests_one_frame_and_initializes() {
        let mut d = driver(DriverConfig::default());
        d.start().unwrap();
        assert_eq!(d.state(), DriverState::Running);
        assert_eq!(d.scheduler().pending_count(), 1);
        assert_eq!(d.effect().inits, 1);

        d.start().unwrap();
        assert_eq!(d.scheduler().pending_count(), 1);
    }

    #[test]
    fn test_start_without_canvas_is_noop() {
        let mut d: TestDriver = AnimationDriver::new(
            Dot::default(),
            None,
            ManualScheduler::new(),
            DriverConfig::default(),
        );
        d.start().unwrap();
        assert_eq!(d.state(), DriverState::Uninitialized);
        assert_eq!(d.scheduler().requested(), 0);
        d.stop();
        assert_eq!(d.state(), DriverState::Stopped);
    }

    #[test]
    fn test_frame_ticks_then_renders() {
        let mut d = driver(DriverConfig::default());
        d.start().unwrap();
        assert_eq!(pump(&mut d, 0.0), Some(FrameOutcome::Rendered));
        assert_eq!(d.effect().ticks, 1);
        assert!((d.effect().last_dt - REFERENCE_FRAME_SECS).abs() < 1e-6);
        assert_eq!(d.canvas().unwrap().command_count(), 1);
        assert_eq!(d.scheduler().pending_count(), 1);
        assert_eq!(d.frames_rendered(), 1);
    }

    #[test]
    fn test_dt_clamped_to_max() {
        let mut d = driver(DriverConfig::default());
        d.start().unwrap();
        pump(&mut d, 0.0);
        pump(&mut d, 5_000.0);
        assert!((d.effect().last_dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_timestamp_gives_zero_dt() {
        let mut d = driver(DriverConfig::default());
        d.start().unwrap();
        pump(&mut d, 100.0);
        pump(&mut d, 50.0);
        assert_eq!(d.effect().last_dt, 0.0);
    }

    #[test]
    fn test_stale_request_ignored() {
        let mut d = driver(DriverConfig::default());
        d.start().unwrap();
        let first = d.pending_request().unwrap();
        pump(&mut d, 0.0);
        assert_eq!(d.on_frame(first, 16.0), FrameOutcome::Ignored);
        assert_eq!(d.effect().ticks, 1);
    }

    #[test]
    fn test_stop_is_idempotent_and_cancels() {
        let mut d = driver(DriverConfig::default());
        d.start().unwrap();
        let pending = d.pending_request().unwrap();
        d.stop();
        d.stop();
        assert_eq!(d.state(), DriverState::Stopped);
        assert_eq!(d.scheduler().pending_count(), 0);
        assert_eq!(d.scheduler().cancelled(), 1);
        assert_eq!(d.on_frame(pending, 16.0), FrameOutcome::Ignored);
        assert_eq!(d.start(), Err(DriverError::Stopped));
    }

    #[test]
    fn test_frame_rate_cap() {
        let mut d = driver(DriverConfig::default().with_max_fps(30.0));
        d.start().unwrap();
        assert_eq!(pump(&mut d, 0.0), Some(FrameOutcome::Rendered));
        assert_eq!(pump(&mut d, 16.7), Some(FrameOutcome::Throttled));
        assert_eq!(d.scheduler().pending_count(), 1);
        assert_eq!(pump(&mut d, 33.4), Some(FrameOutcome::Rendered));
        assert_eq!(d.frames_rendered(), 2);
        assert!((d.effect().last_dt - 0.0334).abs() < 1e-4);
    }

    #[test]
    fn test_resize_rebuilds_pool() {
        let mut d = driver(DriverConfig::default());
        d.start().unwrap();
        d.resize(Size::new(300.0, 200.0)).unwrap();
        assert_eq!(d.canvas().unwrap().size(), Size::new(300.0, 200.0));
        assert_eq!(d.effect().bounds(), Size::new(300.0, 200.0));
        assert_eq!(d.effect().inits, 2);
        assert_eq!(d.scheduler().pending_count(), 1);
    }

    #[test]
    fn test_resize_rejects_invalid() {
        let mut d = driver(DriverConfig::default());
        let bad = Size::new(f32::NAN, 10.0);
        assert_eq!(d.resize(bad), Err(DriverError::InvalidSize(bad)));
        assert!(d.resize(Size::new(-1.0, 10.0)).is_err());
    }

    #[test]
    fn test_resize_after_stop_is_noop() {
        let mut d = driver(DriverConfig::default());
        d.start().unwrap();
        d.stop();
        d.resize(Size::new(10.0, 10.0)).unwrap();
        assert_eq!(d.effect().inits, 1);
    }

    #[test]
    fn test_config_serde_defaults() {
        let cfg: DriverConfig = serde_json::from_str(r#"{"max_fps": 30.0}"#).unwrap();
        assert_eq!(cfg.max_fps, Some(30.0));
        assert_eq!(cfg.max_dt, 0.1);
        assert_eq!(cfg.seed, DEFAULT_SEED);
    }
}
