//! Mount/unmount lifecycle tying a driver to a viewport.

use crate::canvas::Canvas;
use crate::driver::{AnimationDriver, FrameOutcome};
use crate::effect::Effect;
use crate::error::{DriverError, Result};
use crate::scheduler::{FrameRequest, FrameScheduler};
use crate::viewport::{ListenerId, ResizeDebouncer, Viewport};
use crate::{Point, Size};
use tracing::{debug, warn};

/// A canvas effect bound to the host viewport.
///
/// Mount registers exactly one resize listener and starts the driver;
/// unmount stops the driver and removes that same listener. Dropping a
/// mounted component unmounts it.
pub struct CanvasComponent<E, C, S, V>
where
    E: Effect,
    C: Canvas,
    S: FrameScheduler,
    V: Viewport,
{
    driver: AnimationDriver<E, C, S>,
    viewport: V,
    listener: Option<ListenerId>,
    debouncer: ResizeDebouncer,
    mounted: bool,
    unmounted: bool,
}

impl<E, C, S, V> CanvasComponent<E, C, S, V>
where
    E: Effect,
    C: Canvas,
    S: FrameScheduler,
    V: Viewport,
{
    /// Wrap a driver. Resize bursts are collapsed until `resize_quiet_ms`
    /// passes without another event; zero applies each resize at once.
    pub fn new(driver: AnimationDriver<E, C, S>, viewport: V, resize_quiet_ms: f64) -> Self {
        Self {
            driver,
            viewport,
            listener: None,
            debouncer: ResizeDebouncer::new(resize_quiet_ms),
            mounted: false,
            unmounted: false,
        }
    }

    /// Size the canvas to the viewport, build the pool and start
    /// animating. Mounting twice does nothing. Without a drawing context
    /// nothing is registered or drawn.
    ///
    /// # Errors
    ///
    /// [`DriverError::Stopped`] after unmount, [`DriverError::InvalidSize`]
    /// if the viewport reports an unusable size.
    pub fn mount(&mut self) -> Result<()> {
        if self.unmounted {
            return Err(DriverError::Stopped);
        }
        if self.mounted {
            return Ok(());
        }
        self.mounted = true;

        if !self.driver.has_canvas() {
            debug!(effect = self.driver.effect().name(), "mount without drawing context");
            return Ok(());
        }

        self.driver.resize(self.viewport.size())?;
        self.listener = Some(self.viewport.subscribe());
        self.driver.start()?;
        debug!(effect = self.driver.effect().name(), "mounted");
        Ok(())
    }

    /// Resize notification from the viewport at `now_ms`.
    ///
    /// # Errors
    ///
    /// [`DriverError::InvalidSize`] for an unusable size; the current pool
    /// is kept.
    pub fn on_resize(&mut self, size: Size, now_ms: f64) -> Result<()> {
        if self.listener.is_none() {
            return Ok(());
        }
        match self.debouncer.push(size, now_ms) {
            Some(size) => self.driver.resize(size),
            None => Ok(()),
        }
    }

    /// Frame callback from the scheduler. Applies a settled resize first.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) -> FrameOutcome {
        if let Some(size) = self.debouncer.poll(timestamp_ms) {
            if let Err(err) = self.driver.resize(size) {
                warn!(%err, "dropping debounced resize");
            }
        }
        self.driver.on_frame(request, timestamp_ms)
    }

    /// Forward a pointer position to the effect.
    pub fn pointer_moved(&mut self, point: Option<Point>) {
        self.driver.pointer_moved(point);
    }

    /// Stop the driver and release the resize listener. Idempotent.
    pub fn unmount(&mut self) {
        self.driver.stop();
        if let Some(id) = self.listener.take() {
            self.viewport.unsubscribe(id);
        }
        self.debouncer.clear();
        if !self.unmounted {
            debug!(effect = self.driver.effect().name(), "unmounted");
            self.unmounted = true;
        }
    }

    /// Whether `mount` ran and `unmount` has not.
    pub fn is_mounted(&self) -> bool {
        self.mounted && !self.unmounted
    }

    /// The listener registered at mount.
    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    /// The driver.
    pub fn driver(&self) -> &AnimationDriver<E, C, S> {
        &self.driver
    }

    /// The driver, mutably.
    pub fn driver_mut(&mut self) -> &mut AnimationDriver<E, C, S> {
        &mut self.driver
    }

    /// The viewport.
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// The viewport, mutably.
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }
}

impl<E, C, S, V> Drop for CanvasComponent<E, C, S, V>
where
    E: Effect,
    C: Canvas,
    S: FrameScheduler,
    V: Viewport,
{
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::driver::DriverConfig;
    use crate::lifecycle::DriverState;
    use crate::rng::DeterministicRng;
    use crate::scheduler::ManualScheduler;
    use crate::viewport::SimulatedViewport;

    #[derive(Default)]
    struct Blank {
        size: Size,
        inits: u32,
    }

    impl Effect for Blank {
        fn name(&self) -> &'static str {
            "blank"
        }
        fn initialize(&mut self, size: Size, _rng: &mut DeterministicRng) {
            self.size = size;
            self.inits += 1;
        }
        fn tick(&mut self, _dt: f32, _rng: &mut DeterministicRng) {}
        fn render(&self, canvas: &mut dyn Canvas) {
            canvas.clear();
        }
        fn entity_count(&self) -> usize {
            0
        }
        fn capacity(&self) -> usize {
            0
        }
        fn bounds(&self) -> Size {
            self.size
        }
        fn positions(&self) -> Vec<Point> {
            Vec::new()
        }
    }

    type Comp = CanvasComponent<Blank, RecordingCanvas, ManualScheduler, SimulatedViewport>;

    fn component(canvas: Option<RecordingCanvas>, quiet_ms: f64) -> Comp {
        let driver = AnimationDriver::new(
            Blank::default(),
            canvas,
            ManualScheduler::new(),
            DriverConfig::default(),
        );
        CanvasComponent::new(
            driver,
            SimulatedViewport::new(Size::new(640.0, 480.0)),
            quiet_ms,
        )
    }

    #[test]
    fn test_mount_registers_one_listener() {
        let mut c = component(Some(RecordingCanvas::new()), 0.0);
        c.mount().unwrap();
        c.mount().unwrap();
        assert_eq!(c.viewport().listener_count(), 1);
        assert_eq!(c.driver().state(), DriverState::Running);
        assert_eq!(c.driver().canvas().unwrap().size(), Size::new(640.0, 480.0));
        assert_eq!(c.driver().effect().inits, 1);
        assert!(c.is_mounted());
    }

    #[test]
    fn test_mount_without_canvas_registers_nothing() {
        let mut c = component(None, 0.0);
        c.mount().unwrap();
        assert_eq!(c.viewport().listener_count(), 0);
        assert_eq!(c.driver().scheduler().requested(), 0);
        c.unmount();
        assert_eq!(c.driver().state(), DriverState::Stopped);
    }

    #[test]
    fn test_unmount_removes_listener_and_is_idempotent() {
        let mut c = component(Some(RecordingCanvas::new()), 0.0);
        c.mount().unwrap();
        c.unmount();
        c.unmount();
        assert_eq!(c.viewport().listener_count(), 0);
        assert_eq!(c.driver().scheduler().pending_count(), 0);
        assert!(!c.is_mounted());
        assert_eq!(c.mount(), Err(DriverError::Stopped));
    }

    #[test]
    fn test_resize_debounced_until_frame() {
        let mut c = component(Some(RecordingCanvas::new()), 100.0);
        c.mount().unwrap();
        c.on_resize(Size::new(100.0, 100.0), 0.0).unwrap();
        c.on_resize(Size::new(200.0, 100.0), 10.0).unwrap();
        assert_eq!(c.driver().effect().inits, 1);

        let r = c.driver_mut().scheduler_mut().take_due()[0];
        c.on_frame(r, 50.0);
        assert_eq!(c.driver().effect().inits, 1);

        let r = c.driver_mut().scheduler_mut().take_due()[0];
        c.on_frame(r, 120.0);
        assert_eq!(c.driver().effect().inits, 2);
        assert_eq!(c.driver().effect().bounds(), Size::new(200.0, 100.0));
    }

    #[test]
    fn test_resize_before_mount_ignored() {
        let mut c = component(Some(RecordingCanvas::new()), 0.0);
        c.on_resize(Size::new(1.0, 1.0), 0.0).unwrap();
        assert_eq!(c.driver().effect().inits, 0);
    }
}
