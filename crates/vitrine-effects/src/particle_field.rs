//! Drifting particle field that shies away from the pointer.

use crate::palette::SKY;
use serde::{Deserialize, Serialize};
use vitrine_core::{
    frame_factor, Canvas, Color, DeterministicRng, Effect, EntityPool, Point, Size,
};

/// Particle field tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFieldConfig {
    /// Canvas area per particle, in px².
    pub area_per_particle: f32,
    /// Fewest particles on any non-empty canvas.
    pub min_particles: usize,
    /// Most particles on any canvas.
    pub max_particles: usize,
    /// Speed limit, px per reference frame.
    pub max_speed: f32,
    /// Pointer influence radius.
    pub repel_radius: f32,
    /// Impulse at the pointer, falling off linearly to zero at the radius.
    pub repel_strength: f32,
    /// Particle color.
    pub color: Color,
}

impl Default for ParticleFieldConfig {
    fn default() -> Self {
        Self {
            area_per_particle: 20_000.0,
            min_particles: 10,
            max_particles: 150,
            max_speed: 2.0,
            repel_radius: 100.0,
            repel_strength: 0.01,
            color: SKY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Particle {
    pos: Point,
    vel: Point,
    size: f32,
    opacity: f32,
}

/// Field of slowly drifting dots.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: ParticleFieldConfig,
    size: Size,
    particles: EntityPool<Particle>,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(ParticleFieldConfig::default())
    }
}

impl ParticleField {
    /// Create with the given config.
    #[must_use]
    pub fn new(config: ParticleFieldConfig) -> Self {
        let particles = EntityPool::with_capacity(config.max_particles);
        Self {
            config,
            size: Size::ZERO,
            particles,
        }
    }

    /// Active config.
    #[must_use]
    pub fn config(&self) -> &ParticleFieldConfig {
        &self.config
    }

    /// Particle count for a canvas of `size`.
    #[must_use]
    pub fn count_for(&self, size: Size) -> usize {
        if size.is_empty() {
            return 0;
        }
        let per = self.config.area_per_particle.max(1.0);
        let count = (size.area() / per).floor() as usize;
        count
            .max(self.config.min_particles)
            .min(self.config.max_particles)
    }

    /// Current velocities, for inspection.
    #[must_use]
    pub fn velocities(&self) -> Vec<Point> {
        self.particles.iter().map(|p| p.vel).collect()
    }
}

fn limit_speed(vel: Point, max: f32) -> Point {
    let speed = vel.distance(&Point::ORIGIN);
    if !speed.is_finite() {
        Point::ORIGIN
    } else if speed > max {
        Point::new(vel.x / speed * max, vel.y / speed * max)
    } else {
        vel
    }
}

impl Effect for ParticleField {
    fn name(&self) -> &'static str {
        "particle-field"
    }

    fn initialize(&mut self, size: Size, rng: &mut DeterministicRng) {
        self.size = size;
        let count = self.count_for(size);
        self.particles.refill(count, |_| Particle {
            pos: Point::new(rng.range(0.0, size.width), rng.range(0.0, size.height)),
            vel: Point::new(rng.range(-0.25, 0.25), rng.range(-0.25, 0.25)),
            size: rng.range(1.0, 5.0),
            opacity: rng.range(0.1, 0.6),
        });
    }

    fn tick(&mut self, dt: f32, _rng: &mut DeterministicRng) {
        let k = frame_factor(dt);
        let size = self.size;
        for p in self.particles.iter_mut() {
            let next = Point::new(p.vel.x.mul_add(k, p.pos.x), p.vel.y.mul_add(k, p.pos.y));
            p.pos = size.wrap(next);
        }
    }

    fn pointer_moved(&mut self, point: Option<Point>) {
        let Some(pointer) = point.filter(Point::is_finite) else {
            return;
        };
        let radius = self.config.repel_radius;
        let strength = self.config.repel_strength;
        let max_speed = self.config.max_speed;

        for p in self.particles.iter_mut() {
            let d = pointer - p.pos;
            let distance = d.distance(&Point::ORIGIN);
            if distance > 0.0 && distance < radius {
                let force = (radius - distance) / radius * strength;
                p.vel = Point::new(
                    (d.x / distance).mul_add(-force, p.vel.x),
                    (d.y / distance).mul_add(-force, p.vel.y),
                );
                p.vel = limit_speed(p.vel, max_speed);
            }
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear();
        for p in &self.particles {
            let color = self.config.color.with_alpha(p.opacity);
            canvas.fill_circle(p.pos, p.size / 2.0, &color.into());
        }
    }

    fn entity_count(&self) -> usize {
        self.particles.len()
    }

    fn capacity(&self) -> usize {
        self.particles.capacity()
    }

    fn bounds(&self) -> Size {
        self.size
    }

    fn positions(&self) -> Vec<Point> {
        self.particles.iter().map(|p| p.pos).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::RecordingCanvas;

    fn field(width: f32, height: f32) -> ParticleField {
        let mut f = ParticleField::default();
        f.initialize(Size::new(width, height), &mut DeterministicRng::new(11));
        f
    }

    #[test]
    fn test_count_scales_with_area() {
        assert_eq!(field(1000.0, 1000.0).entity_count(), 50);
        assert_eq!(field(100.0, 100.0).entity_count(), 10);
        assert_eq!(field(10_000.0, 10_000.0).entity_count(), 150);
        assert_eq!(field(0.0, 100.0).entity_count(), 0);
    }

    #[test]
    fn test_particles_wrap() {
        let mut f = field(200.0, 200.0);
        let mut rng = DeterministicRng::new(1);
        for _ in 0..10_000 {
            f.tick(0.05, &mut rng);
        }
        let size = f.bounds();
        assert!(f.positions().iter().all(|p| size.contains(*p)));
    }

    #[test]
    fn test_pointer_pushes_away() {
        let mut f = field(400.0, 400.0);
        let target = f.positions()[0];
        let before = f.velocities()[0];
        f.pointer_moved(Some(Point::new(target.x + 10.0, target.y)));
        let after = f.velocities()[0];
        assert!(after.x < before.x);
    }

    #[test]
    fn test_pointer_far_away_does_nothing() {
        let mut f = field(400.0, 400.0);
        let before = f.velocities();
        f.pointer_moved(Some(Point::new(10_000.0, 10_000.0)));
        f.pointer_moved(None);
        f.pointer_moved(Some(Point::new(f32::NAN, 0.0)));
        assert_eq!(f.velocities(), before);
    }

    #[test]
    fn test_speed_is_limited() {
        let mut f = ParticleField::new(ParticleFieldConfig {
            repel_strength: 50.0,
            ..ParticleFieldConfig::default()
        });
        f.initialize(Size::new(400.0, 400.0), &mut DeterministicRng::new(2));
        for p in f.positions() {
            f.pointer_moved(Some(Point::new(p.x + 1.0, p.y + 1.0)));
        }
        for v in f.velocities() {
            assert!(v.distance(&Point::ORIGIN) <= 2.0 + 1e-4);
        }
    }

    #[test]
    fn test_render_one_circle_per_particle() {
        let f = field(1000.0, 1000.0);
        let mut canvas = RecordingCanvas::new();
        f.render(&mut canvas);
        assert_eq!(canvas.command_count(), 1 + f.entity_count());
    }
}
