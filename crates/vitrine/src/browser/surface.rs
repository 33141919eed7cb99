//! Canvas2D drawing surface.

use vitrine_core::{Canvas, Color, Paint, Point, Rect, Size, TextStyle};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`Canvas`] that draws straight into an HTML5 canvas' 2D context.
pub struct Canvas2DSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2DSurface {
    /// Wrap a canvas element. `None` when the browser has no 2D context
    /// for it.
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    /// The underlying element.
    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn set_fill(&self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            gradient => {
                if let Some(g) = self.gradient(gradient) {
                    self.ctx.set_fill_style_canvas_gradient(&g);
                }
            }
        }
    }

    fn set_stroke(&self, paint: &Paint, width: f32) {
        match paint {
            Paint::Solid(color) => self.ctx.set_stroke_style_str(&color.to_css()),
            gradient => {
                if let Some(g) = self.gradient(gradient) {
                    self.ctx.set_stroke_style_canvas_gradient(&g);
                }
            }
        }
        self.ctx.set_line_width(f64::from(width));
    }

    fn gradient(&self, paint: &Paint) -> Option<web_sys::CanvasGradient> {
        let (gradient, stops) = match paint {
            Paint::Solid(_) => return None,
            Paint::Linear { start, end, stops } => (
                self.ctx.create_linear_gradient(
                    f64::from(start.x),
                    f64::from(start.y),
                    f64::from(end.x),
                    f64::from(end.y),
                ),
                stops,
            ),
            Paint::Radial {
                center,
                inner_radius,
                outer_radius,
                stops,
            } => (
                self.ctx
                    .create_radial_gradient(
                        f64::from(center.x),
                        f64::from(center.y),
                        f64::from(*inner_radius),
                        f64::from(center.x),
                        f64::from(center.y),
                        f64::from(*outer_radius),
                    )
                    .ok()?,
                stops,
            ),
        };
        for stop in stops {
            gradient.add_color_stop(stop.offset, &stop.color.to_css()).ok()?;
        }
        Some(gradient)
    }

    fn trace_points(&self, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(first.x), f64::from(first.y));
        for p in rest {
            self.ctx.line_to(f64::from(p.x), f64::from(p.y));
        }
    }
}

impl Canvas for Canvas2DSurface {
    fn size(&self) -> Size {
        Size::from_pixels(self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, size: Size) {
        self.canvas.set_width(size.width.max(0.0) as u32);
        self.canvas.set_height(size.height.max(0.0) as u32);
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx
            .clear_rect(0.0, 0.0, f64::from(size.width), f64::from(size.height));
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.set_fill(paint);
        self.ctx.fill_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.set_stroke(&Paint::Solid(color), width);
        self.ctx.stroke_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        self.ctx.begin_path();
        self.ctx
            .arc(
                f64::from(center.x),
                f64::from(center.y),
                f64::from(radius.max(0.0)),
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
        self.set_fill(paint);
        self.ctx.fill();
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
        self.ctx.begin_path();
        self.ctx
            .arc(
                f64::from(center.x),
                f64::from(center.y),
                f64::from(radius.max(0.0)),
                f64::from(start_angle),
                f64::from(end_angle),
            )
            .ok();
        self.set_stroke(&Paint::Solid(color), width);
        self.ctx.stroke();
    }

    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint, width: f32) {
        self.trace_points(&[from, to]);
        self.set_stroke(paint, width);
        self.ctx.stroke();
    }

    fn draw_quad_curve(&mut self, from: Point, control: Point, to: Point, paint: &Paint, width: f32) {
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(from.x), f64::from(from.y));
        self.ctx.quadratic_curve_to(
            f64::from(control.x),
            f64::from(control.y),
            f64::from(to.x),
            f64::from(to.y),
        );
        self.set_stroke(paint, width);
        self.ctx.stroke();
    }

    fn draw_polygon(&mut self, points: &[Point], fill: Option<Color>, stroke: Option<(Color, f32)>) {
        if points.len() < 2 {
            return;
        }
        self.trace_points(points);
        self.ctx.close_path();
        if let Some(color) = fill {
            self.set_fill(&Paint::Solid(color));
            self.ctx.fill();
        }
        if let Some((color, width)) = stroke {
            self.set_stroke(&Paint::Solid(color), width);
            self.ctx.stroke();
        }
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.ctx.set_font(&style.css_font());
        self.ctx.set_text_align(style.align.as_css());
        self.ctx.set_fill_style_str(&style.color.to_css());
        self.ctx
            .fill_text(text, f64::from(position.x), f64::from(position.y))
            .ok();
    }
}
