//! Viewport size and resize notifications.

use crate::Size;

/// Handle for a registered resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The host window a canvas is sized against.
pub trait Viewport {
    /// Current inner size in CSS pixels.
    fn size(&self) -> Size;

    /// Register the resize listener. Each call registers a new one.
    fn subscribe(&mut self) -> ListenerId;

    /// Remove a listener. Returns false if it was not registered.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;

    /// Listeners currently registered.
    fn listener_count(&self) -> usize;
}

/// In-memory viewport for tests and headless runs.
#[derive(Debug, Default)]
pub struct SimulatedViewport {
    size: Size,
    next_id: u64,
    listeners: Vec<ListenerId>,
}

impl SimulatedViewport {
    /// Viewport of the given size with no listeners.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Change the size. Callers deliver the notification themselves.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Registered listener handles.
    #[must_use]
    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }
}

impl Viewport for SimulatedViewport {
    fn size(&self) -> Size {
        self.size
    }

    fn subscribe(&mut self) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push(id);
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| *l != id);
        self.listeners.len() != before
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Trailing-edge debounce for resize bursts.
///
/// Only the last size of a burst is applied, once `quiet_ms` passes without
/// another event. A zero quiet period applies every size immediately.
#[derive(Debug, Clone, Default)]
pub struct ResizeDebouncer {
    quiet_ms: f64,
    pending: Option<(Size, f64)>,
}

impl ResizeDebouncer {
    /// Debouncer with a quiet period in milliseconds.
    #[must_use]
    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet_ms: if quiet_ms.is_finite() { quiet_ms.max(0.0) } else { 0.0 },
            pending: None,
        }
    }

    /// Quiet period in milliseconds.
    #[must_use]
    pub fn quiet_ms(&self) -> f64 {
        self.quiet_ms
    }

    /// Record a resize event. Returns the size to apply now, if any.
    pub fn push(&mut self, size: Size, now_ms: f64) -> Option<Size> {
        if self.quiet_ms <= 0.0 {
            self.pending = None;
            return Some(size);
        }
        self.pending = Some((size, now_ms + self.quiet_ms));
        None
    }

    /// Size whose quiet period has elapsed by `now_ms`.
    pub fn poll(&mut self, now_ms: f64) -> Option<Size> {
        match self.pending {
            Some((size, deadline)) if now_ms >= deadline => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }

    /// Whether a resize is waiting out its quiet period.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget any pending resize.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_unsubscribe() {
        let mut vp = SimulatedViewport::new(Size::new(800.0, 600.0));
        let a = vp.subscribe();
        let b = vp.subscribe();
        assert_eq!(vp.listener_count(), 2);
        assert!(vp.unsubscribe(a));
        assert!(!vp.unsubscribe(a));
        assert_eq!(vp.listeners(), &[b]);
    }

    #[test]
    fn test_set_size() {
        let mut vp = SimulatedViewport::default();
        vp.set_size(Size::new(10.0, 20.0));
        assert_eq!(vp.size(), Size::new(10.0, 20.0));
    }

    #[test]
    fn test_debouncer_immediate() {
        let mut d = ResizeDebouncer::new(0.0);
        let s = Size::new(1.0, 1.0);
        assert_eq!(d.push(s, 0.0), Some(s));
        assert!(!d.has_pending());
    }

    #[test]
    fn test_debouncer_trailing_edge() {
        let mut d = ResizeDebouncer::new(100.0);
        assert_eq!(d.push(Size::new(1.0, 1.0), 0.0), None);
        assert_eq!(d.push(Size::new(2.0, 2.0), 50.0), None);
        assert_eq!(d.poll(120.0), None);
        assert_eq!(d.poll(150.0), Some(Size::new(2.0, 2.0)));
        assert_eq!(d.poll(500.0), None);
    }

    #[test]
    fn test_debouncer_sanitizes_quiet_period() {
        assert_eq!(ResizeDebouncer::new(-5.0).quiet_ms(), 0.0);
        assert_eq!(ResizeDebouncer::new(f64::NAN).quiet_ms(), 0.0);
    }
}
