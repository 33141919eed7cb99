//! The drawing surface trait and a recording implementation.

use crate::draw::{DrawCommand, Paint, TextStyle};
use crate::{Color, Point, Rect, Size};

/// Immediate-mode 2D drawing surface an effect renders into.
///
/// Mirrors the subset of the Canvas2D API the effects use. Implementations
/// own their pixel size; [`Canvas::resize`] is how the canvas sizer binds it
/// to the viewport.
pub trait Canvas {
    /// Current pixel size.
    fn size(&self) -> Size;

    /// Resize the backing surface.
    fn resize(&mut self, size: Size);

    /// Erase the whole surface to transparent.
    fn clear(&mut self);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint);

    /// Stroke a circular arc.
    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
        width: f32,
    );

    /// Stroke a straight line.
    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint, width: f32);

    /// Stroke a quadratic curve.
    fn draw_quad_curve(&mut self, from: Point, control: Point, to: Point, paint: &Paint, width: f32);

    /// Draw a closed polygon.
    fn draw_polygon(&mut self, points: &[Point], fill: Option<Color>, stroke: Option<(Color, f32)>);

    /// Draw text.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Cover the surface with a translucent color, leaving motion trails.
    fn fade(&mut self, color: Color) {
        let bounds = Rect::from_size(self.size());
        self.fill_rect(bounds, &Paint::Solid(color));
    }
}

/// A Canvas implementation that records draw operations as `DrawCommand`s.
///
/// Used by tests, by the headless preview, and anywhere draw output needs
/// to be inspected or serialized.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    size: Size,
    commands: Vec<DrawCommand>,
    total_calls: u64,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recording canvas with an initial size.
    #[must_use]
    pub fn with_size(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Get the recorded draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of the recorded commands, clearing the buffer.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of commands currently buffered.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Number of draw calls made over the canvas lifetime, including taken ones.
    #[must_use]
    pub fn total_calls(&self) -> u64 {
        self.total_calls
    }

    /// Check if no commands are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn record(&mut self, command: DrawCommand) {
        self.total_calls += 1;
        self.commands.push(command);
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn clear(&mut self) {
        self.record(DrawCommand::Clear {
            bounds: Rect::from_size(self.size),
        });
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.record(DrawCommand::FillRect {
            bounds: rect,
            paint: paint.clone(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.record(DrawCommand::StrokeRect {
            bounds: rect,
            color,
            width,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        self.record(DrawCommand::Circle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
        width: f32,
    ) {
        self.record(DrawCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            color,
            width,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint, width: f32) {
        self.record(DrawCommand::Line {
            from,
            to,
            paint: paint.clone(),
            width,
        });
    }

    fn draw_quad_curve(&mut self, from: Point, control: Point, to: Point, paint: &Paint, width: f32) {
        self.record(DrawCommand::QuadCurve {
            from,
            control,
            to,
            paint: paint.clone(),
            width,
        });
    }

    fn draw_polygon(&mut self, points: &[Point], fill: Option<Color>, stroke: Option<(Color, f32)>) {
        self.record(DrawCommand::Polygon {
            points: points.to_vec(),
            fill,
            stroke,
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.record(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
        });
    }
}
