//! Skill radar: a polar chart of skill levels that grows in on mount.

use crate::palette::{hex_alpha, CYAN};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use vitrine_core::{
    Canvas, Color, DeterministicRng, Easing, Effect, EntityPool, Point, Rect, Size, TextAlign,
    TextStyle, Timeline, Tween,
};

/// A named skill with a level from 0 to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Display name
    pub name: String,
    /// Level, 0-100
    pub level: f32,
}

impl Skill {
    /// Create a skill, clamping the level.
    #[must_use]
    pub fn new(name: impl Into<String>, level: f32) -> Self {
        let level = if level.is_finite() { level.clamp(0.0, 100.0) } else { 0.0 };
        Self {
            name: name.into(),
            level,
        }
    }
}

/// Skill radar tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillRadarConfig {
    /// Skills, one axis each, clockwise from the top.
    pub skills: Vec<Skill>,
    /// Accent color for points and the polygon.
    pub color: Color,
    /// Concentric grid rings.
    pub rings: u32,
    /// Space kept between the chart and the canvas edge for labels.
    pub margin: f32,
    /// Seconds for the chart to grow in.
    pub grow_duration: f64,
    /// Most axes drawn.
    pub max_skills: usize,
}

impl Default for SkillRadarConfig {
    fn default() -> Self {
        Self {
            skills: vec![
                Skill::new("Python", 95.0),
                Skill::new("SQL", 92.0),
                Skill::new("Apache Spark", 90.0),
                Skill::new("Apache Kafka", 85.0),
                Skill::new("Airflow", 88.0),
                Skill::new("AWS", 80.0),
            ],
            color: CYAN,
            rings: 5,
            margin: 40.0,
            grow_duration: 1.0,
            max_skills: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Axis {
    name: String,
    level: f32,
    angle: f32,
}

/// Radar chart of skill levels.
#[derive(Debug, Clone)]
pub struct SkillRadar {
    config: SkillRadarConfig,
    size: Size,
    center: Point,
    radius: f32,
    grow: Timeline<f64>,
    axes: EntityPool<Axis>,
}

impl Default for SkillRadar {
    fn default() -> Self {
        Self::new(SkillRadarConfig::default())
    }
}

impl SkillRadar {
    /// Create with the given config.
    #[must_use]
    pub fn new(config: SkillRadarConfig) -> Self {
        let grow = Timeline::new(
            Tween::new(0.0, 1.0, config.grow_duration).with_easing(Easing::CubicOut),
        );
        let axes = EntityPool::with_capacity(config.max_skills);
        Self {
            config,
            size: Size::ZERO,
            center: Point::ORIGIN,
            radius: 0.0,
            grow,
            axes,
        }
    }

    /// Active config.
    #[must_use]
    pub fn config(&self) -> &SkillRadarConfig {
        &self.config
    }

    /// Outer ring radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Whether the grow-in finished.
    #[must_use]
    pub fn is_grown(&self) -> bool {
        self.grow.is_complete()
    }

    fn polar(&self, angle: f32, distance: f32) -> Point {
        Point::new(
            angle.cos().mul_add(distance, self.center.x),
            angle.sin().mul_add(distance, self.center.y),
        )
    }

    fn point_for(&self, axis: &Axis) -> Point {
        let grown = self.grow.value() as f32;
        self.polar(axis.angle, self.radius * axis.level / 100.0 * grown)
    }
}

impl Effect for SkillRadar {
    fn name(&self) -> &'static str {
        "skill-radar"
    }

    fn initialize(&mut self, size: Size, _rng: &mut DeterministicRng) {
        self.size = size;
        self.center = Rect::from_size(size).center();
        self.radius = (self.center.x.min(self.center.y) - self.config.margin).max(0.0);
        self.grow.reset();

        let skills = &self.config.skills;
        let step = TAU / skills.len().max(1) as f32;
        self.axes.refill(skills.len(), |i| Axis {
            name: skills[i].name.clone(),
            level: if skills[i].level.is_finite() { skills[i].level.clamp(0.0, 100.0) } else { 0.0 },
            angle: (i as f32).mul_add(step, -FRAC_PI_2),
        });
    }

    fn tick(&mut self, dt: f32, _rng: &mut DeterministicRng) {
        self.grow.advance(f64::from(dt));
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear();

        let rings = self.config.rings.max(1);
        for i in 1..=rings {
            let r = self.radius * i as f32 / rings as f32;
            canvas.stroke_arc(self.center, r, 0.0, TAU, CYAN.with_alpha(0.2 / i as f32), 1.0);
        }
        if self.axes.is_empty() {
            return;
        }

        let accent = self.config.color;
        let label_style = TextStyle::monospace(12.0, Color::WHITE.with_alpha(0.8));
        let level_style = TextStyle::monospace(10.0, accent).align(TextAlign::Center);

        for axis in &self.axes {
            let end = self.polar(axis.angle, self.radius);
            canvas.draw_line(self.center, end, &CYAN.with_alpha(0.3).into(), 1.0);

            let point = self.point_for(axis);
            canvas.fill_circle(point, 5.0, &accent.into());

            let label_at = self.polar(axis.angle, self.radius + 20.0);
            let align = if axis.angle > FRAC_PI_2 && axis.angle < 3.0 * PI / 2.0 {
                TextAlign::Right
            } else {
                TextAlign::Left
            };
            canvas.draw_text(&axis.name, label_at, &label_style.clone().align(align));
            canvas.draw_text(
                &format!("{}%", axis.level.round()),
                Point::new(point.x, point.y - 10.0),
                &level_style,
            );
        }

        if self.axes.len() > 2 {
            let points: Vec<Point> = self.axes.iter().map(|a| self.point_for(a)).collect();
            canvas.draw_polygon(
                &points,
                Some(accent.with_alpha(hex_alpha(0x20))),
                Some((accent.with_alpha(hex_alpha(0x60)), 2.0)),
            );
        }
    }

    fn entity_count(&self) -> usize {
        self.axes.len()
    }

    fn capacity(&self) -> usize {
        self.axes.capacity()
    }

    fn bounds(&self) -> Size {
        self.size
    }

    fn positions(&self) -> Vec<Point> {
        self.axes.iter().map(|a| self.point_for(a)).collect()
    }
}
