//! The effect contract and the entity pool effects keep their state in.

use crate::canvas::Canvas;
use crate::rng::DeterministicRng;
use crate::{Point, Size};

/// Duration of the reference frame motion constants are expressed in.
pub const REFERENCE_FRAME_SECS: f32 = 1.0 / 60.0;

/// Convert a frame delta in seconds to reference frames.
///
/// Non-finite and negative deltas count as zero, so a bad timestamp freezes
/// motion for one frame instead of throwing entities off the canvas.
#[must_use]
pub fn frame_factor(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt / REFERENCE_FRAME_SECS
    } else {
        0.0
    }
}

/// A self-contained canvas animation.
///
/// The driver calls [`Effect::initialize`] at mount and on every resize,
/// then [`Effect::tick`] followed by [`Effect::render`] once per frame.
pub trait Effect {
    /// Catalog name, e.g. `"matrix-rain"`.
    fn name(&self) -> &'static str;

    /// (Re)build the entity pool for a canvas of `size`. Replaces any
    /// previous pool.
    fn initialize(&mut self, size: Size, rng: &mut DeterministicRng);

    /// Advance one frame of `dt` seconds. Must not panic; positions are
    /// wrapped or clamped into the canvas.
    fn tick(&mut self, dt: f32, rng: &mut DeterministicRng);

    /// Draw the current state.
    fn render(&self, canvas: &mut dyn Canvas);

    /// Pointer position over the canvas, `None` when it leaves.
    fn pointer_moved(&mut self, _point: Option<Point>) {}

    /// Live entity count.
    fn entity_count(&self) -> usize;

    /// Upper bound on [`Effect::entity_count`] for any canvas size.
    fn capacity(&self) -> usize;

    /// Canvas size the pool was built for.
    fn bounds(&self) -> Size;

    /// Anchor position of every live entity.
    fn positions(&self) -> Vec<Point>;
}

impl<E: Effect + ?Sized> Effect for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn initialize(&mut self, size: Size, rng: &mut DeterministicRng) {
        (**self).initialize(size, rng);
    }

    fn tick(&mut self, dt: f32, rng: &mut DeterministicRng) {
        (**self).tick(dt, rng);
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        (**self).render(canvas);
    }

    fn pointer_moved(&mut self, point: Option<Point>) {
        (**self).pointer_moved(point);
    }

    fn entity_count(&self) -> usize {
        (**self).entity_count()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn bounds(&self) -> Size {
        (**self).bounds()
    }

    fn positions(&self) -> Vec<Point> {
        (**self).positions()
    }
}

/// Bounded, generation-stamped storage for one effect's entities.
///
/// Indices are stable only within a generation; [`EntityPool::reset`]
/// discards every entity and starts a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPool<T> {
    items: Vec<T>,
    capacity: usize,
    generation: u64,
}

impl<T> EntityPool<T> {
    /// Empty pool holding at most `capacity` entities.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity.min(1024)),
            capacity,
            generation: 0,
        }
    }

    /// Maximum number of entities.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of times the pool has been reset.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Live entity count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no entities are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when no more entities fit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Drop every entity and start a new generation.
    pub fn reset(&mut self) {
        self.items.clear();
        self.generation += 1;
    }

    /// Reset, then fill with `count` entities (capped) built by `make`.
    pub fn refill(&mut self, count: usize, mut make: impl FnMut(usize) -> T) {
        self.reset();
        for i in 0..count.min(self.capacity) {
            self.items.push(make(i));
        }
    }

    /// Add an entity. Returns it back when the pool is full.
    ///
    /// # Errors
    ///
    /// Returns `Err(item)` if the pool is at capacity.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            Err(item)
        } else {
            self.items.push(item);
            Ok(())
        }
    }

    /// Keep only entities matching the predicate.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    /// Entity at `index` in this generation.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Entity at `index`, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Iterate entities.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterate entities mutably.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Entities as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<'a, T> IntoIterator for &'a EntityPool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
