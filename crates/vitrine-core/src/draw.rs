//! Draw commands for 2D rendering.
//!
//! Every effect reduces to these primitives. A [`crate::RecordingCanvas`]
//! captures them for tests and headless previews; browser surfaces issue
//! the equivalent Canvas2D calls directly.

use crate::{Color, Point, Rect};
use serde::{Deserialize, Serialize};

/// A color stop inside a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Offset along the gradient [0.0, 1.0]
    pub offset: f32,
    /// Color at the offset
    pub color: Color,
}

impl GradientStop {
    /// Create a new stop, clamping the offset.
    #[must_use]
    pub fn new(offset: f32, color: Color) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// How a shape is filled or stroked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    /// A single color
    Solid(Color),
    /// Linear gradient between two points
    Linear {
        /// Gradient start
        start: Point,
        /// Gradient end
        end: Point,
        /// Color stops
        stops: Vec<GradientStop>,
    },
    /// Radial gradient between two concentric circles
    Radial {
        /// Center of both circles
        center: Point,
        /// Inner radius
        inner_radius: f32,
        /// Outer radius
        outer_radius: f32,
        /// Color stops
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// Two-stop linear gradient.
    #[must_use]
    pub fn linear(start: Point, end: Point, from: Color, to: Color) -> Self {
        Self::Linear {
            start,
            end,
            stops: vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
        }
    }

    /// Two-stop radial gradient from the center outward.
    #[must_use]
    pub fn radial(center: Point, radius: f32, inner: Color, outer: Color) -> Self {
        Self::Radial {
            center,
            inner_radius: 0.0,
            outer_radius: radius.max(0.0),
            stops: vec![GradientStop::new(0.0, inner), GradientStop::new(1.0, outer)],
        }
    }

    /// The color a solid paint uses, or the first stop of a gradient.
    #[must_use]
    pub fn primary_color(&self) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => {
                stops.first().map_or(Color::TRANSPARENT, |s| s.color)
            }
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

/// Horizontal text alignment relative to the draw position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    /// Text starts at the position
    #[default]
    Left,
    /// Text is centered on the position
    Center,
    /// Text ends at the position
    Right,
}

impl TextAlign {
    /// Canvas2D `textAlign` keyword.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Text style for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Font family list as CSS
    pub family: String,
    /// Text color
    pub color: Color,
    /// Alignment
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::monospace(12.0, Color::WHITE)
    }
}

impl TextStyle {
    /// Courier-style monospace text, the face all effect overlays use.
    #[must_use]
    pub fn monospace(size: f32, color: Color) -> Self {
        Self {
            size,
            family: "'Courier New', monospace".to_string(),
            color,
            align: TextAlign::Left,
        }
    }

    /// Set the alignment.
    #[must_use]
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Canvas2D `font` shorthand.
    #[must_use]
    pub fn css_font(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

/// A single recorded draw operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Erase a region to transparent
    Clear {
        /// Cleared region
        bounds: Rect,
    },
    /// Fill a rectangle
    FillRect {
        /// Rectangle bounds
        bounds: Rect,
        /// Fill
        paint: Paint,
    },
    /// Stroke a rectangle outline
    StrokeRect {
        /// Rectangle bounds
        bounds: Rect,
        /// Stroke color
        color: Color,
        /// Stroke width
        width: f32,
    },
    /// Fill a circle
    Circle {
        /// Center
        center: Point,
        /// Radius
        radius: f32,
        /// Fill
        paint: Paint,
    },
    /// Stroke a circular arc (angles in radians, clockwise from +x)
    Arc {
        /// Center
        center: Point,
        /// Radius
        radius: f32,
        /// Start angle
        start_angle: f32,
        /// End angle
        end_angle: f32,
        /// Stroke color
        color: Color,
        /// Stroke width
        width: f32,
    },
    /// Stroke a straight line
    Line {
        /// Start point
        from: Point,
        /// End point
        to: Point,
        /// Stroke paint
        paint: Paint,
        /// Stroke width
        width: f32,
    },
    /// Stroke a quadratic curve
    QuadCurve {
        /// Start point
        from: Point,
        /// Control point
        control: Point,
        /// End point
        to: Point,
        /// Stroke paint
        paint: Paint,
        /// Stroke width
        width: f32,
    },
    /// Closed polygon with optional fill and outline
    Polygon {
        /// Vertices
        points: Vec<Point>,
        /// Fill color
        fill: Option<Color>,
        /// Outline color and width
        stroke: Option<(Color, f32)>,
    },
    /// Draw text
    Text {
        /// Text content
        content: String,
        /// Anchor position (baseline)
        position: Point,
        /// Style
        style: TextStyle,
    },
}

impl DrawCommand {
    /// Create a filled rectangle command.
    #[must_use]
    pub fn filled_rect(bounds: Rect, color: Color) -> Self {
        Self::FillRect {
            bounds,
            paint: Paint::Solid(color),
        }
    }

    /// Create a filled circle command.
    #[must_use]
    pub fn filled_circle(center: Point, radius: f32, color: Color) -> Self {
        Self::Circle {
            center,
            radius,
            paint: Paint::Solid(color),
        }
    }

    /// Short kind name, used in preview summaries.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Clear { .. } => "clear",
            Self::FillRect { .. } => "fill_rect",
            Self::StrokeRect { .. } => "stroke_rect",
            Self::Circle { .. } => "circle",
            Self::Arc { .. } => "arc",
            Self::Line { .. } => "line",
            Self::QuadCurve { .. } => "quad_curve",
            Self::Polygon { .. } => "polygon",
            Self::Text { .. } => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_stop_clamps_offset() {
        assert_eq!(GradientStop::new(1.5, Color::WHITE).offset, 1.0);
        assert_eq!(GradientStop::new(-0.5, Color::WHITE).offset, 0.0);
    }

    #[test]
    fn test_paint_primary_color() {
        assert_eq!(Paint::Solid(Color::WHITE).primary_color(), Color::WHITE);
        let g = Paint::linear(Point::ORIGIN, Point::new(1.0, 0.0), Color::BLACK, Color::WHITE);
        assert_eq!(g.primary_color(), Color::BLACK);
        let empty = Paint::Linear {
            start: Point::ORIGIN,
            end: Point::ORIGIN,
            stops: Vec::new(),
        };
        assert_eq!(empty.primary_color(), Color::TRANSPARENT);
    }

    #[test]
    fn test_radial_negative_radius() {
        match Paint::radial(Point::ORIGIN, -3.0, Color::WHITE, Color::BLACK) {
            Paint::Radial { outer_radius, .. } => assert_eq!(outer_radius, 0.0),
            other => panic!("expected radial, got {other:?}"),
        }
    }

    #[test]
    fn test_text_style_css_font() {
        let style = TextStyle::monospace(16.0, Color::WHITE);
        assert_eq!(style.css_font(), "16px 'Courier New', monospace");
        assert_eq!(style.align(TextAlign::Center).align.as_css(), "center");
    }

    #[test]
    fn test_draw_command_json_roundtrip() {
        let cmd = DrawCommand::filled_circle(Point::new(50.0, 50.0), 25.0, Color::WHITE);
        let json = serde_json::to_string(&cmd).expect("serialize");
        let parsed: DrawCommand = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, cmd);
        assert_eq!(parsed.kind(), "circle");
    }
}
