//! Matrix rain: columns of data-engineering glyphs falling down the screen.

use crate::palette::{CYAN, GREEN, PINK, PURPLE};
use serde::{Deserialize, Serialize};
use vitrine_core::rng::hash64;
use vitrine_core::{
    frame_factor, wrap_coord, Canvas, Color, DeterministicRng, Effect, EntityPool, Point, Size,
    TextAlign, TextStyle,
};

/// Everything a drop can show.
pub const GLYPHS: &[&str] = &[
    "0", "1", "SELECT", "FROM", "WHERE", "JOIN", "INSERT", "UPDATE", "DELETE", "KAFKA", "SPARK",
    "HADOOP", "PYTHON", "SQL", "ETL", "API", "JSON", "CSV", "AWS", "AZURE", "GCP", "DOCKER", "K8S",
    "FLINK", "STORM", "AIRFLOW", "REDIS", "MONGO", "POSTGRES", "ELASTIC", "KIBANA", "GRAFANA", "{",
    "}", "[", "]", "(", ")", "<", ">", "/", "\\", "|", "-", "_", "=", "DATA", "PIPELINE", "STREAM",
    "BATCH", "REAL-TIME", "ANALYTICS",
];

const SQL: &[&str] = &["SELECT", "FROM", "WHERE", "JOIN", "INSERT", "UPDATE", "DELETE"];
const BIG_DATA: &[&str] = &["KAFKA", "SPARK", "HADOOP", "FLINK", "STORM"];
const CLOUD: &[&str] = &["AWS", "AZURE", "GCP", "DOCKER", "K8S"];

/// Glyph color by category. Short glyphs (three characters or fewer)
/// are always green.
#[must_use]
pub fn glyph_color(glyph: &str) -> Color {
    if glyph.len() <= 3 || SQL.contains(&glyph) {
        GREEN
    } else if BIG_DATA.contains(&glyph) {
        CYAN
    } else if CLOUD.contains(&glyph) {
        PURPLE
    } else {
        PINK
    }
}

/// Font size for a glyph: keywords are drawn smaller.
#[must_use]
pub fn glyph_size(glyph: &str) -> f32 {
    if glyph.len() > 3 {
        10.0
    } else {
        16.0
    }
}

/// Matrix rain tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixRainConfig {
    /// Horizontal spacing of drop columns.
    pub column_width: f32,
    /// Upper bound on drops regardless of width.
    pub max_drops: usize,
    /// Vertical spacing of glyphs within a drop.
    pub glyph_spacing: f32,
    /// Alpha of the black fade laid over each frame.
    pub fade_alpha: f32,
    /// Slowest fall speed, px per reference frame.
    pub min_speed: f32,
    /// Fastest fall speed (exclusive).
    pub max_speed: f32,
    /// Shortest drop, in glyphs.
    pub min_length: f32,
    /// Longest drop (exclusive).
    pub max_length: f32,
}

impl Default for MatrixRainConfig {
    fn default() -> Self {
        Self {
            column_width: 30.0,
            max_drops: 256,
            glyph_spacing: 20.0,
            fade_alpha: 0.05,
            min_speed: 1.0,
            max_speed: 4.0,
            min_length: 10.0,
            max_length: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RainDrop {
    /// Column x.
    x: f32,
    /// Head y; the tail trails above it.
    y: f32,
    speed: f32,
    length: u32,
    opacity: f32,
    key: u64,
}

/// Falling glyph columns.
#[derive(Debug, Clone)]
pub struct MatrixRain {
    config: MatrixRainConfig,
    size: Size,
    columns: usize,
    frame: u64,
    drops: EntityPool<RainDrop>,
}

impl Default for MatrixRain {
    fn default() -> Self {
        Self::new(MatrixRainConfig::default())
    }
}

impl MatrixRain {
    /// Create with the given config. The pool is empty until initialized.
    #[must_use]
    pub fn new(config: MatrixRainConfig) -> Self {
        let drops = EntityPool::with_capacity(config.max_drops);
        Self {
            config,
            size: Size::ZERO,
            columns: 0,
            frame: 0,
            drops,
        }
    }

    /// Active config.
    #[must_use]
    pub fn config(&self) -> &MatrixRainConfig {
        &self.config
    }

    fn column_x(&self, column: usize) -> f32 {
        wrap_coord(column as f32 * self.config.column_width.max(1.0), self.size.width)
    }

    fn glyph(&self, drop: &RainDrop, index: u32) -> &'static str {
        let key = drop.key ^ (u64::from(index) << 32) ^ self.frame.wrapping_mul(0x2545_f491);
        GLYPHS[(hash64(key) % GLYPHS.len() as u64) as usize]
    }
}

impl Effect for MatrixRain {
    fn name(&self) -> &'static str {
        "matrix-rain"
    }

    fn initialize(&mut self, size: Size, rng: &mut DeterministicRng) {
        self.size = size;
        self.frame = 0;
        let spacing = self.config.column_width.max(1.0);
        self.columns = (size.width / spacing).floor().max(0.0) as usize;

        let cfg = self.config.clone();
        self.drops.refill(self.columns, |i| RainDrop {
            x: wrap_coord(i as f32 * spacing, size.width),
            y: rng.range(0.0, size.height.max(0.0)),
            speed: rng.range(cfg.min_speed, cfg.max_speed),
            length: rng.range(cfg.min_length, cfg.max_length).max(1.0) as u32,
            opacity: rng.range(0.2, 1.0),
            key: rng.next_u64(),
        });
    }

    fn tick(&mut self, dt: f32, rng: &mut DeterministicRng) {
        let k = frame_factor(dt);
        self.frame = self.frame.wrapping_add(1);
        let height = self.size.height;
        let columns = self.columns;
        let (min_speed, max_speed) = (self.config.min_speed, self.config.max_speed);

        let mut respawn = Vec::new();
        for (i, drop) in self.drops.iter_mut().enumerate() {
            let y = drop.y + drop.speed * k;
            if y > height || !y.is_finite() {
                drop.y = 0.0;
                drop.speed = rng.range(min_speed, max_speed);
                respawn.push(i);
            } else {
                drop.y = y.max(0.0);
            }
        }

        for i in respawn {
            let x = self.column_x(rng.index(columns));
            if let Some(drop) = self.drops.get_mut(i) {
                drop.x = x;
            }
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.fade(Color::BLACK.with_alpha(self.config.fade_alpha));
        let height = self.size.height;

        for drop in &self.drops {
            for i in 0..drop.length {
                let y = drop.y - i as f32 * self.config.glyph_spacing;
                if y < 0.0 || y > height {
                    continue;
                }
                let alpha = drop.opacity * (1.0 - i as f32 / drop.length as f32);
                let glyph = self.glyph(drop, i);
                let color = glyph_color(glyph).with_alpha(alpha);
                let style = TextStyle::monospace(glyph_size(glyph), color).align(TextAlign::Center);
                canvas.draw_text(glyph, Point::new(drop.x, y), &style);
            }
        }
    }

    fn entity_count(&self) -> usize {
        self.drops.len()
    }

    fn capacity(&self) -> usize {
        self.drops.capacity()
    }

    fn bounds(&self) -> Size {
        self.size
    }

    fn positions(&self) -> Vec<Point> {
        self.drops.iter().map(|d| Point::new(d.x, d.y)).collect()
    }
}
