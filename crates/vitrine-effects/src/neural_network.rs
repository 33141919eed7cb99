//! Neural network: layered nodes with pulsing cores and packets running
//! along active connections.

use crate::palette::{hex_alpha, CYAN, GOLD, NEON, PURPLE};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use vitrine_core::{
    frame_factor, Canvas, Color, DeterministicRng, Effect, EntityPool, Paint, Point, Size,
    TextAlign, TextStyle,
};

/// Neural network tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuralNetworkConfig {
    /// Node count per layer, left to right.
    pub layers: Vec<usize>,
    /// Vertical distance between nodes of a layer.
    pub node_spacing: f32,
    /// Chance that two nodes of adjacent layers are connected.
    pub connection_probability: f32,
    /// Chance per reference frame that a connection flips active.
    pub toggle_probability: f32,
    /// Upper bound on nodes across all layers.
    pub max_nodes: usize,
    /// Captions drawn above the layers.
    pub labels: Vec<String>,
}

impl Default for NeuralNetworkConfig {
    fn default() -> Self {
        Self {
            layers: vec![6, 8, 6, 4],
            node_spacing: 80.0,
            connection_probability: 0.7,
            toggle_probability: 0.01,
            max_nodes: 64,
            labels: ["INPUT", "PROCESSING", "ANALYSIS", "OUTPUT"]
                .map(String::from)
                .to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    pos: Point,
    radius: f32,
    color: Color,
    pulse: f32,
    fan_out: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct Connection {
    from: usize,
    to: usize,
    strength: f32,
    active: bool,
}

/// Layered network animation.
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    config: NeuralNetworkConfig,
    size: Size,
    time: f32,
    nodes: EntityPool<Node>,
    connections: Vec<Connection>,
}

impl Default for NeuralNetwork {
    fn default() -> Self {
        Self::new(NeuralNetworkConfig::default())
    }
}

impl NeuralNetwork {
    /// Create with the given config.
    #[must_use]
    pub fn new(config: NeuralNetworkConfig) -> Self {
        let nodes = EntityPool::with_capacity(config.max_nodes);
        Self {
            config,
            size: Size::ZERO,
            time: 0.0,
            nodes,
            connections: Vec::new(),
        }
    }

    /// Active config.
    #[must_use]
    pub fn config(&self) -> &NeuralNetworkConfig {
        &self.config
    }

    /// Number of connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of connections currently carrying packets.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        self.connections.iter().filter(|c| c.active).count()
    }

    fn layer_x(&self, layer: usize, layers: usize) -> f32 {
        (layer + 1) as f32 * self.size.width / (layers + 1) as f32
    }

    fn draw_connection(&self, canvas: &mut dyn Canvas, index: usize, conn: &Connection) {
        let (Some(from), Some(to)) = (self.nodes.get(conn.from), self.nodes.get(conn.to)) else {
            return;
        };
        let alpha = if conn.active { 0.6 } else { 0.2 };
        let paint = Paint::linear(from.pos, to.pos, CYAN.with_alpha(alpha), PURPLE.with_alpha(alpha));
        canvas.draw_line(from.pos, to.pos, &paint, conn.strength.mul_add(3.0, 1.0));

        if !conn.active {
            return;
        }
        let progress = ((self.time * 2.0 + index as f32 * 0.5).sin() + 1.0) / 2.0;
        canvas.fill_circle(from.pos.lerp(&to.pos, progress), 3.0, &GOLD.with_alpha(0.8).into());
        for i in 1..=5u8 {
            let i = f32::from(i);
            let trail = (progress - i * 0.05).max(0.0);
            canvas.fill_circle(
                from.pos.lerp(&to.pos, trail),
                i.mul_add(-0.4, 3.0),
                &GOLD.with_alpha(0.8 / i).into(),
            );
        }
    }

    fn draw_node(&self, canvas: &mut dyn Canvas, index: usize, node: &Node) {
        let radius = node.radius * node.pulse.sin().mul_add(0.2, 1.0);

        let glow = Paint::radial(
            node.pos,
            radius * 2.0,
            node.color.with_alpha(hex_alpha(0x40)),
            node.color.with_alpha(0.0),
        );
        canvas.fill_circle(node.pos, radius * 2.0, &glow);
        canvas.fill_circle(node.pos, radius, &node.color.into());
        canvas.fill_circle(
            node.pos,
            radius * 0.6,
            &Color::WHITE.with_alpha(hex_alpha(0x40)).into(),
        );

        if node.fan_out > 0 {
            let activity = (self.time + index as f32).sin().mul_add(0.5, 0.5);
            canvas.stroke_arc(
                node.pos,
                radius + 8.0,
                0.0,
                TAU * activity,
                node.color.with_alpha(hex_alpha(0x60)),
                2.0,
            );
        }
    }
}

impl Effect for NeuralNetwork {
    fn name(&self) -> &'static str {
        "neural-network"
    }

    fn initialize(&mut self, size: Size, rng: &mut DeterministicRng) {
        self.size = size;
        self.time = 0.0;
        self.nodes.reset();
        self.connections.clear();

        let layers = self.config.layers.len();
        let spacing = self.config.node_spacing;
        let mut layer_ranges = Vec::with_capacity(layers);

        for (layer, &count) in self.config.layers.iter().enumerate() {
            let start = self.nodes.len();
            let x = self.layer_x(layer, layers);
            let top = (count.saturating_sub(1) as f32).mul_add(-spacing, size.height) / 2.0;
            for i in 0..count {
                let pos = size.clamp(Point::new(x, (i as f32).mul_add(spacing, top)));
                let node = Node {
                    pos,
                    radius: rng.range(12.0, 20.0),
                    color: rng.pick(&NEON).copied().unwrap_or(CYAN),
                    pulse: rng.next_f32(),
                    fan_out: 0,
                };
                if self.nodes.push(node).is_err() {
                    break;
                }
            }
            layer_ranges.push(start..self.nodes.len());
        }

        let p = self.config.connection_probability;
        for pair in layer_ranges.windows(2) {
            for from in pair[0].clone() {
                for to in pair[1].clone() {
                    if rng.chance(p) {
                        self.connections.push(Connection {
                            from,
                            to,
                            strength: rng.next_f32(),
                            active: rng.chance(0.5),
                        });
                        if let Some(node) = self.nodes.get_mut(from) {
                            node.fan_out += 1;
                        }
                    }
                }
            }
        }
    }

    fn tick(&mut self, dt: f32, rng: &mut DeterministicRng) {
        let k = frame_factor(dt);
        self.time += 0.02 * k;

        let toggle = (self.config.toggle_probability * k).min(1.0);
        for conn in &mut self.connections {
            if rng.chance(toggle) {
                conn.active = !conn.active;
            }
        }
        for node in self.nodes.iter_mut() {
            node.pulse = (node.pulse + 0.05 * k) % TAU;
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.fade(Color::BLACK.with_alpha(0.05));

        for (index, conn) in self.connections.iter().enumerate() {
            self.draw_connection(canvas, index, conn);
        }
        for (index, node) in self.nodes.iter().enumerate() {
            self.draw_node(canvas, index, node);
        }

        let style = TextStyle::monospace(12.0, Color::WHITE.with_alpha(0.7)).align(TextAlign::Center);
        let count = self.config.labels.len();
        for (i, label) in self.config.labels.iter().enumerate() {
            canvas.draw_text(label, Point::new(self.layer_x(i, count), 30.0), &style);
        }
    }

    fn entity_count(&self) -> usize {
        self.nodes.len()
    }

    fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    fn bounds(&self) -> Size {
        self.size
    }

    fn positions(&self) -> Vec<Point> {
        self.nodes.iter().map(|n| n.pos).collect()
    }
}
