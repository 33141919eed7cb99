//! Easing curves and tweens.
//!
//! A [`Tween`] maps elapsed time to a value between `from` and `to` through an
//! [`Easing`] curve. A [`Timeline`] plays a tween forward, optionally
//! repeating and reversing (yoyo) each cycle. Effects own their timelines and
//! advance them from `tick`; nothing here is global.

use crate::{Color, Point};
use serde::{Deserialize, Serialize};

// =============================================================================
// Easing Functions
// =============================================================================

/// Standard easing functions for animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation (no easing)
    #[default]
    Linear,
    /// Quadratic ease in (slow start)
    EaseIn,
    /// Quadratic ease out (slow end)
    EaseOut,
    /// Quadratic ease in and out, "power2.inOut"
    EaseInOut,
    /// Cubic ease in
    CubicIn,
    /// Cubic ease out, "power3.out"
    CubicOut,
    /// Cubic ease in and out
    CubicInOut,
    /// Exponential ease out
    ExpoOut,
    /// Elastic bounce at end
    ElasticOut,
    /// Bounce at end
    BounceOut,
    /// Back ease out (overshoots then returns)
    BackOut,
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(2) / 2.0
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(3) / 2.0
                }
            }
            Self::ExpoOut => {
                if (t - 1.0).abs() < f64::EPSILON {
                    1.0
                } else {
                    1.0 - (-10.0 * t).exp2()
                }
            }
            Self::ElasticOut => Self::elastic_out(t),
            Self::BounceOut => Self::bounce_out(t),
            Self::BackOut => Self::back_out(t),
        }
    }

    fn elastic_out(t: f64) -> f64 {
        if t == 0.0 || (t - 1.0).abs() < f64::EPSILON {
            t
        } else {
            let c4 = (2.0 * std::f64::consts::PI) / 3.0;
            (-10.0 * t).exp2().mul_add((t.mul_add(10.0, -0.75) * c4).sin(), 1.0)
        }
    }

    fn bounce_out(t: f64) -> f64 {
        const N1: f64 = 7.5625;
        const D1: f64 = 2.75;

        if t < 1.0 / D1 {
            N1 * t * t
        } else if t < 2.0 / D1 {
            let t = t - 1.5 / D1;
            (N1 * t).mul_add(t, 0.75)
        } else if t < 2.5 / D1 {
            let t = t - 2.25 / D1;
            (N1 * t).mul_add(t, 0.9375)
        } else {
            let t = t - 2.625 / D1;
            (N1 * t).mul_add(t, 0.984_375)
        }
    }

    fn back_out(t: f64) -> f64 {
        const C1: f64 = 1.70158;
        const C3: f64 = C1 + 1.0;
        C1.mul_add((t - 1.0).powi(2), C3.mul_add((t - 1.0).powi(3), 1.0))
    }
}

// =============================================================================
// Interpolate Trait
// =============================================================================

/// Trait for types that can be interpolated.
pub trait Interpolate: Clone {
    /// Interpolate between two values; `t` may overshoot [0, 1] for
    /// elastic and back curves.
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        (to - from).mul_add(t, *from)
    }
}

impl Interpolate for f32 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        (*to - *from).mul_add(t as Self, *from)
    }
}

impl Interpolate for Point {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        Self::new(
            f32::interpolate(&from.x, &to.x, t),
            f32::interpolate(&from.y, &to.y, t),
        )
    }
}

impl Interpolate for Color {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        from.lerp(to, t as f32)
    }
}

// =============================================================================
// Tween
// =============================================================================

/// `(from, to, duration, easing) → value over time`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T: Interpolate> {
    /// Start value
    pub from: T,
    /// End value
    pub to: T,
    /// Duration in seconds
    pub duration: f64,
    /// Easing curve
    pub easing: Easing,
}

impl<T: Interpolate> Tween<T> {
    /// Create a tween with `EaseInOut` easing.
    #[must_use]
    pub fn new(from: T, to: T, duration: f64) -> Self {
        Self {
            from,
            to,
            duration,
            easing: Easing::EaseInOut,
        }
    }

    /// Set easing function.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized progress for an elapsed time. Zero or invalid duration
    /// counts as already finished.
    #[must_use]
    pub fn progress(&self, elapsed: f64) -> f64 {
        if self.duration > 0.0 && self.duration.is_finite() {
            if elapsed.is_nan() {
                0.0
            } else {
                (elapsed / self.duration).clamp(0.0, 1.0)
            }
        } else {
            1.0
        }
    }

    /// Value after `elapsed` seconds.
    #[must_use]
    pub fn value_at(&self, elapsed: f64) -> T {
        let eased = self.easing.apply(self.progress(elapsed));
        T::interpolate(&self.from, &self.to, eased)
    }
}

// =============================================================================
// Timeline
// =============================================================================

/// How many times a timeline plays its tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    /// Play once
    #[default]
    Once,
    /// Play `n` additional times after the first
    Times(u32),
    /// Play forever
    Infinite,
}

/// A tween played over time with repeat and yoyo.
#[derive(Debug, Clone)]
pub struct Timeline<T: Interpolate> {
    tween: Tween<T>,
    repeat: Repeat,
    yoyo: bool,
    elapsed: f64,
}

impl<T: Interpolate> Timeline<T> {
    /// Play `tween` once.
    #[must_use]
    pub fn new(tween: Tween<T>) -> Self {
        Self {
            tween,
            repeat: Repeat::Once,
            yoyo: false,
            elapsed: 0.0,
        }
    }

    /// Set the repeat mode.
    #[must_use]
    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Reverse direction on every other cycle.
    #[must_use]
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Total seconds played so far.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advance by `dt` seconds. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
            if let Some(total) = self.total_duration() {
                self.elapsed = self.elapsed.min(total);
            }
        }
    }

    /// Rewind to the start.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Whether the final cycle has finished. Infinite timelines never do.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_duration()
            .is_some_and(|total| self.elapsed >= total)
    }

    fn cycles(&self) -> Option<u64> {
        match self.repeat {
            Repeat::Once => Some(1),
            Repeat::Times(n) => Some(u64::from(n) + 1),
            Repeat::Infinite => None,
        }
    }

    fn total_duration(&self) -> Option<f64> {
        let duration = self.tween.duration.max(0.0);
        self.cycles().map(|c| c as f64 * duration)
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> T {
        let duration = self.tween.duration;
        if !(duration > 0.0 && duration.is_finite()) {
            return self.tween.value_at(duration);
        }

        let mut cycle = (self.elapsed / duration).floor() as u64;
        let mut local = self.elapsed - cycle as f64 * duration;
        if let Some(cycles) = self.cycles() {
            if cycle >= cycles {
                cycle = cycles - 1;
                local = duration;
            }
        }

        let reversed = self.yoyo && cycle % 2 == 1;
        if reversed {
            self.tween.value_at(duration - local)
        } else {
            self.tween.value_at(local)
        }
    }
}
