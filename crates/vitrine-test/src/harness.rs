//! Headless frame harness for canvas components.

use vitrine_core::{
    AnimationDriver, CanvasComponent, DrawCommand, DriverConfig, Effect, FrameOutcome, FrameRequest,
    ManualScheduler, RecordingCanvas, Result, SimulatedViewport, Size, Viewport,
};

/// Component type the harness drives.
pub type HarnessComponent<E> =
    CanvasComponent<E, RecordingCanvas, ManualScheduler, SimulatedViewport>;

/// What happened on one delivered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    /// Request that was delivered
    pub request: FrameRequest,
    /// Host timestamp in milliseconds
    pub timestamp_ms: f64,
    /// Driver's response
    pub outcome: FrameOutcome,
    /// Draw calls made during this frame
    pub commands: Vec<DrawCommand>,
}

/// Test harness that plays the host: it owns the clock, delivers frame
/// callbacks from a [`ManualScheduler`], resizes a [`SimulatedViewport`]
/// and records every draw call.
pub struct FrameHarness<E: Effect> {
    component: HarnessComponent<E>,
    clock_ms: f64,
    frame_ms: f64,
    history: Vec<FrameRecord>,
}

impl<E: Effect> FrameHarness<E> {
    /// Harness at 60 Hz with default driver config and no resize debounce.
    pub fn new(effect: E, size: Size) -> Self {
        Self::with_config(effect, size, DriverConfig::default())
    }

    /// Harness with an explicit driver config.
    pub fn with_config(effect: E, size: Size, config: DriverConfig) -> Self {
        Self::build(effect, size, Some(RecordingCanvas::with_size(size)), config, 0.0)
    }

    /// Harness that collapses resizes until `quiet_ms` passes without another.
    pub fn debounced(effect: E, size: Size, quiet_ms: f64) -> Self {
        let canvas = Some(RecordingCanvas::with_size(size));
        Self::build(effect, size, canvas, DriverConfig::default(), quiet_ms)
    }

    /// Harness whose host could not provide a drawing context.
    pub fn without_context(effect: E, size: Size) -> Self {
        Self::build(effect, size, None, DriverConfig::default(), 0.0)
    }

    fn build(
        effect: E,
        size: Size,
        canvas: Option<RecordingCanvas>,
        config: DriverConfig,
        quiet_ms: f64,
    ) -> Self {
        let driver = AnimationDriver::new(effect, canvas, ManualScheduler::new(), config);
        Self {
            component: CanvasComponent::new(driver, SimulatedViewport::new(size), quiet_ms),
            clock_ms: 0.0,
            frame_ms: 1000.0 / 60.0,
            history: Vec::new(),
        }
    }

    /// Milliseconds between delivered frames.
    #[must_use]
    pub fn frame_interval(mut self, ms: f64) -> Self {
        self.frame_ms = ms;
        self
    }

    /// Mount the component.
    ///
    /// # Errors
    ///
    /// Whatever [`CanvasComponent::mount`] reports.
    pub fn mount(&mut self) -> Result<&mut Self> {
        self.component.mount()?;
        Ok(self)
    }

    /// Advance the clock one frame and deliver every pending request.
    pub fn step(&mut self) -> Vec<FrameOutcome> {
        self.clock_ms += self.frame_ms;
        let due = self.component.driver_mut().scheduler_mut().take_due();
        due.into_iter().map(|request| self.deliver(request)).collect()
    }

    /// Run `frames` steps. Returns how many frames rendered.
    pub fn pump(&mut self, frames: usize) -> usize {
        (0..frames)
            .flat_map(|_| self.step())
            .filter(|outcome| *outcome == FrameOutcome::Rendered)
            .count()
    }

    /// Deliver a specific request, pending or not, as a host with a late
    /// or cancelled callback would.
    pub fn fire(&mut self, request: FrameRequest) -> FrameOutcome {
        self.deliver(request)
    }

    fn deliver(&mut self, request: FrameRequest) -> FrameOutcome {
        let outcome = self.component.on_frame(request, self.clock_ms);
        let commands = self
            .component
            .driver_mut()
            .canvas_mut()
            .map(RecordingCanvas::take_commands)
            .unwrap_or_default();
        self.history.push(FrameRecord {
            request,
            timestamp_ms: self.clock_ms,
            outcome,
            commands,
        });
        outcome
    }

    /// Resize the viewport and notify the component.
    ///
    /// # Errors
    ///
    /// [`vitrine_core::DriverError::InvalidSize`] for an unusable size.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        self.component.viewport_mut().set_size(size);
        self.component.on_resize(size, self.clock_ms)
    }

    /// Move the clock without delivering frames.
    pub fn advance_clock(&mut self, ms: f64) {
        self.clock_ms += ms;
    }

    /// Unmount the component.
    pub fn unmount(&mut self) {
        self.component.unmount();
    }

    /// Current clock in milliseconds.
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Every delivered frame so far.
    pub fn history(&self) -> &[FrameRecord] {
        &self.history
    }

    /// The most recent delivered frame.
    pub fn last_frame(&self) -> Option<&FrameRecord> {
        self.history.last()
    }

    /// The most recent frame that actually drew.
    pub fn last_rendered(&self) -> Option<&FrameRecord> {
        self.history
            .iter()
            .rev()
            .find(|f| f.outcome == FrameOutcome::Rendered)
    }

    /// Draw calls across all delivered frames.
    pub fn draw_calls(&self) -> usize {
        self.history.iter().map(|f| f.commands.len()).sum()
    }

    /// Resize listeners currently registered on the viewport.
    pub fn listener_count(&self) -> usize {
        self.component.viewport().listener_count()
    }

    /// Frame requests waiting for delivery.
    pub fn pending_frames(&self) -> usize {
        self.component.driver().scheduler().pending_count()
    }

    /// The pending request, if the driver holds one.
    pub fn pending_request(&self) -> Option<FrameRequest> {
        self.component.driver().pending_request()
    }

    /// The effect under test.
    pub fn effect(&self) -> &E {
        self.component.driver().effect()
    }

    /// The component under test.
    pub fn component(&self) -> &HarnessComponent<E> {
        &self.component
    }

    /// The component under test, mutably.
    pub fn component_mut(&mut self) -> &mut HarnessComponent<E> {
        &mut self.component
    }
}
