//! Full-canvas gradient that sways between two angles and color pairs.

use serde::{Deserialize, Serialize};
use vitrine_core::{
    Canvas, Color, DeterministicRng, Easing, Effect, Paint, Point, Rect, Repeat, Size, Timeline,
    Tween,
};

/// One end of the sway: a CSS-style linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    /// CSS angle in degrees: 0 points up, 90 points right.
    pub angle_deg: f32,
    /// Color at the start of the gradient line
    pub from: Color,
    /// Color at the end of the gradient line
    pub to: Color,
}

impl GradientSpec {
    /// Interpolate angle and both colors.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            angle_deg: (other.angle_deg - self.angle_deg).mul_add(t, self.angle_deg),
            from: self.from.lerp(&other.from, t),
            to: self.to.lerp(&other.to, t),
        }
    }

    /// Gradient line across `rect`, following CSS `linear-gradient` sizing:
    /// the line passes through the center and its ends touch the corners.
    #[must_use]
    pub fn line(&self, rect: Rect) -> (Point, Point) {
        let angle = self.angle_deg.to_radians();
        let (sin, cos) = angle.sin_cos();
        let half = (rect.width * sin.abs() + rect.height * cos.abs()) / 2.0;
        let center = rect.center();
        let offset = Point::new(sin * half, -cos * half);
        (center - offset, center + offset)
    }
}

/// Gradient backdrop tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientBackdropConfig {
    /// Gradient at the start of each cycle
    pub start: GradientSpec,
    /// Gradient at the end of each cycle
    pub end: GradientSpec,
    /// Seconds per cycle
    pub duration: f64,
    /// Easing of each cycle
    pub easing: Easing,
    /// Overall opacity
    pub opacity: f32,
}

impl Default for GradientBackdropConfig {
    fn default() -> Self {
        Self {
            start: GradientSpec {
                angle_deg: 45.0,
                from: Color::rgba8(0x66, 0x7e, 0xea, 1.0),
                to: Color::rgba8(0x76, 0x4b, 0xa2, 1.0),
            },
            end: GradientSpec {
                angle_deg: 135.0,
                from: Color::rgba8(0xf0, 0x93, 0xfb, 1.0),
                to: Color::rgba8(0xf5, 0x57, 0x6c, 1.0),
            },
            duration: 4.0,
            easing: Easing::EaseInOut,
            opacity: 0.1,
        }
    }
}

/// Slowly swaying gradient.
#[derive(Debug, Clone)]
pub struct GradientBackdrop {
    config: GradientBackdropConfig,
    size: Size,
    timeline: Timeline<f64>,
}

impl Default for GradientBackdrop {
    fn default() -> Self {
        Self::new(GradientBackdropConfig::default())
    }
}

impl GradientBackdrop {
    /// Create with the given config.
    #[must_use]
    pub fn new(config: GradientBackdropConfig) -> Self {
        let timeline = Timeline::new(Tween::new(0.0, 1.0, config.duration).with_easing(config.easing))
            .repeat(Repeat::Infinite)
            .yoyo(true);
        Self {
            config,
            size: Size::ZERO,
            timeline,
        }
    }

    /// Active config.
    #[must_use]
    pub fn config(&self) -> &GradientBackdropConfig {
        &self.config
    }

    /// Gradient for the current point of the cycle.
    #[must_use]
    pub fn current(&self) -> GradientSpec {
        let t = self.timeline.value() as f32;
        self.config.start.lerp(&self.config.end, t)
    }
}

impl Effect for GradientBackdrop {
    fn name(&self) -> &'static str {
        "gradient-backdrop"
    }

    fn initialize(&mut self, size: Size, _rng: &mut DeterministicRng) {
        // The sway keeps its phase across resizes.
        self.size = size;
    }

    fn tick(&mut self, dt: f32, _rng: &mut DeterministicRng) {
        self.timeline.advance(f64::from(dt));
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear();
        let rect = Rect::from_size(self.size);
        let spec = self.current();
        let (start, end) = spec.line(rect);
        let opacity = self.config.opacity;
        let paint = Paint::linear(start, end, spec.from.fade(opacity), spec.to.fade(opacity));
        canvas.fill_rect(rect, &paint);
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
        vec![Rect::from_size(self.size).center()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{DrawCommand, RecordingCanvas};

    #[test]
    fn test_gradient_line_45_degrees() {
        let spec = GradientBackdropConfig::default().start;
        let (start, end) = spec.line(Rect::new(0.0, 0.0, 100.0, 100.0));
        // 45° runs from bottom-left to top-right.
        assert!((start.x - 0.0).abs() < 1e-3 && (start.y - 100.0).abs() < 1e-3);
        assert!((end.x - 100.0).abs() < 1e-3 && end.y.abs() < 1e-3);
    }

    #[test]
    fn test_gradient_line_90_degrees() {
        let spec = GradientSpec {
            angle_deg: 90.0,
            from: Color::BLACK,
            to: Color::WHITE,
        };
        let (start, end) = spec.line(Rect::new(0.0, 0.0, 200.0, 50.0));
        assert!((start.x - 0.0).abs() < 1e-3 && (start.y - 25.0).abs() < 1e-3);
        assert!((end.x - 200.0).abs() < 1e-3 && (end.y - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_sway_reaches_end_and_returns() {
        let mut bg = GradientBackdrop::default();
        let mut rng = DeterministicRng::new(1);
        bg.initialize(Size::new(800.0, 600.0), &mut rng);
        assert_eq!(bg.current().angle_deg, 45.0);

        bg.tick(4.0, &mut rng);
        assert!((bg.current().angle_deg - 135.0).abs() < 1e-3);

        bg.tick(2.0, &mut rng);
        assert!((bg.current().angle_deg - 90.0).abs() < 1e-3);

        bg.tick(2.0, &mut rng);
        assert!((bg.current().angle_deg - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_render_fills_canvas() {
        let mut bg = GradientBackdrop::default();
        bg.initialize(Size::new(320.0, 240.0), &mut DeterministicRng::new(1));
        let mut canvas = RecordingCanvas::with_size(Size::new(320.0, 240.0));
        bg.render(&mut canvas);
        assert_eq!(canvas.command_count(), 2);
        match &canvas.commands()[1] {
            DrawCommand::FillRect { bounds, paint } => {
                assert_eq!(*bounds, Rect::new(0.0, 0.0, 320.0, 240.0));
                assert!((paint.primary_color().a - 0.1).abs() < 1e-6);
            }
            other => panic!("expected gradient fill, got {other:?}"),
        }
    }
}
