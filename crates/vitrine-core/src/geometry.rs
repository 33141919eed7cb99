//! Geometric primitives: Point, Size, Rect.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point with x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation between two points.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Point on a quadratic Bézier curve from `self` to `to` through `control`.
    #[must_use]
    pub fn quad_bezier(&self, control: &Self, to: &Self, t: f32) -> Self {
        let a = self.lerp(control, t);
        let b = control.lerp(to, t);
        a.lerp(&b, t)
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D size with width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size of a pixel buffer.
    #[must_use]
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// Calculate area.
    #[must_use]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when either dimension is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// True when both dimensions are finite and non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }

    /// Scale size by a factor.
    #[must_use]
    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Wrap a point toroidally into `[0, width] × [0, height]`.
    #[must_use]
    pub fn wrap(&self, point: Point) -> Point {
        Point::new(wrap_coord(point.x, self.width), wrap_coord(point.y, self.height))
    }

    /// Clamp a point into `[0, width] × [0, height]`.
    #[must_use]
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            clamp_coord(point.x, self.width),
            clamp_coord(point.y, self.height),
        )
    }

    /// Whether a point lies inside `[0, width] × [0, height]`.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        (0.0..=self.width.max(0.0)).contains(&point.x)
            && (0.0..=self.height.max(0.0)).contains(&point.y)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Wrap a coordinate into `[0, max]`. Non-finite input lands on 0.
#[must_use]
pub fn wrap_coord(value: f32, max: f32) -> f32 {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    if (0.0..=max).contains(&value) {
        return value;
    }
    value.rem_euclid(max).clamp(0.0, max)
}

/// Clamp a coordinate into `[0, max]`. Non-finite input lands on 0.
#[must_use]
pub fn clamp_coord(value: f32, max: f32) -> f32 {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    value.clamp(0.0, max)
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: f32,
    /// Y position of top-left corner
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create from size at origin.
    #[must_use]
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Get the size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Midpoint of the left edge.
    #[must_use]
    pub fn left_mid(&self) -> Point {
        Point::new(self.x, self.y + self.height / 2.0)
    }

    /// Midpoint of the right edge.
    #[must_use]
    pub fn right_mid(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the rectangle (inclusive).
    #[must_use]
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Create a new rectangle grown by the given amount on all sides.
    #[must_use]
    pub fn outset(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }

    /// Shift the rectangle so it lies inside `bounds` where possible.
    #[must_use]
    pub fn clamped_into(&self, bounds: Size) -> Self {
        let x = self.x.min(bounds.width - self.width).max(0.0);
        let y = self.y.min(bounds.height - self.height).max(0.0);
        Self::new(x, y, self.width, self.height)
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}
