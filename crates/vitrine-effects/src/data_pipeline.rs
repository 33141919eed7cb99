//! Data pipeline: sources feed transforms feed sinks, with packets
//! travelling the curved pipes between them.

use crate::palette::{hex_alpha, CYAN, GOLD, GREEN, NEON, ORANGE, PINK, PURPLE};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use vitrine_core::{
    frame_factor, Canvas, Color, DeterministicRng, Effect, EntityPool, Paint, Point, Rect, Size,
    TextAlign, TextStyle,
};

/// Role of a pipeline node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Where events enter
    Source,
    /// Where events are processed
    Transform,
    /// Where events land
    Sink,
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    id: &'static str,
    label: [&'static str; 2],
    stage: Stage,
    bounds: Rect,
    color: Color,
}

const KAFKA: usize = 0;
const DATABASE: usize = 1;
const SPARK: usize = 2;
const FLINK: usize = 3;
const WAREHOUSE: usize = 4;
const LAKE: usize = 5;

/// Pipes between nodes, by node index.
const PIPES: [(usize, usize); 6] = [
    (KAFKA, SPARK),
    (DATABASE, FLINK),
    (SPARK, WAREHOUSE),
    (SPARK, LAKE),
    (FLINK, WAREHOUSE),
    (FLINK, LAKE),
];

/// Data pipeline tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPipelineConfig {
    /// Chance per reference frame that a new packet enters.
    pub spawn_probability: f32,
    /// Most packets in flight.
    pub max_packets: usize,
    /// Fraction of a pipe a packet covers per reference frame.
    pub packet_speed: f32,
    /// Draw the metrics overlay.
    pub show_metrics: bool,
}

impl Default for DataPipelineConfig {
    fn default() -> Self {
        Self {
            spawn_probability: 0.03,
            max_packets: 64,
            packet_speed: 0.02,
            show_metrics: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Packet {
    path: [usize; 3],
    hop: usize,
    progress: f32,
    pos: Point,
    color: Color,
}

/// Animated ETL diagram.
#[derive(Debug, Clone)]
pub struct DataPipeline {
    config: DataPipelineConfig,
    size: Size,
    time: f32,
    latency_ms: u32,
    nodes: Vec<Node>,
    packets: EntityPool<Packet>,
}

impl Default for DataPipeline {
    fn default() -> Self {
        Self::new(DataPipelineConfig::default())
    }
}

fn pipe_ends(from: &Node, to: &Node) -> (Point, Point) {
    (from.bounds.right_mid(), to.bounds.left_mid())
}

/// Thousands separators, e.g. `12000` → `"12,000"`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl DataPipeline {
    /// Create with the given config.
    #[must_use]
    pub fn new(config: DataPipelineConfig) -> Self {
        let packets = EntityPool::with_capacity(config.max_packets);
        Self {
            config,
            size: Size::ZERO,
            time: 0.0,
            latency_ms: 10,
            nodes: Vec::new(),
            packets,
        }
    }

    /// Active config.
    #[must_use]
    pub fn config(&self) -> &DataPipelineConfig {
        &self.config
    }

    /// Packets in flight.
    #[must_use]
    pub fn active_packets(&self) -> usize {
        self.packets.len()
    }

    /// Node ids in layout order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<&'static str> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    fn layout(size: Size) -> Vec<Node> {
        let (w, h) = (size.width, size.height);
        let source = Size::new(120.0, 60.0);
        let transform = Size::new(140.0, 80.0);
        let node = |id, label, stage, origin: Point, extent: Size, color| Node {
            id,
            label,
            stage,
            bounds: Rect::new(origin.x, origin.y, extent.width, extent.height)
                .clamped_into(size),
            color,
        };
        vec![
            node("kafka", ["KAFKA", "STREAM"], Stage::Source, Point::new(100.0, h / 2.0 - 100.0), source, CYAN),
            node("database", ["DATABASE", "BATCH"], Stage::Source, Point::new(100.0, h / 2.0 + 40.0), source, GREEN),
            node("spark", ["SPARK", "PROCESSING"], Stage::Transform, Point::new(w / 2.0 - 60.0, h / 2.0 - 80.0), transform, PINK),
            node("flink", ["FLINK", "STREAM"], Stage::Transform, Point::new(w / 2.0 - 60.0, h / 2.0 + 20.0), transform, PURPLE),
            node("warehouse", ["DATA", "WAREHOUSE"], Stage::Sink, Point::new(w - 220.0, h / 2.0 - 100.0), source, GOLD),
            node("lake", ["DATA", "LAKE"], Stage::Sink, Point::new(w - 220.0, h / 2.0 + 40.0), source, ORANGE),
        ]
    }

    fn spawn(&mut self, rng: &mut DeterministicRng) {
        let source = if rng.chance(0.5) { KAFKA } else { DATABASE };
        let transform = if source == KAFKA { SPARK } else { FLINK };
        let sink = if rng.chance(0.5) { WAREHOUSE } else { LAKE };
        let Some(start) = self.nodes.get(source) else {
            return;
        };
        let packet = Packet {
            path: [source, transform, sink],
            hop: 0,
            progress: 0.0,
            pos: start.bounds.center(),
            color: rng.pick(&NEON).copied().unwrap_or(CYAN),
        };
        // A full pool just skips this spawn.
        let _ = self.packets.push(packet);
    }

    fn draw_pipe(&self, canvas: &mut dyn Canvas, from: &Node, to: &Node) {
        let (start, end) = pipe_ends(from, to);
        let control = start.lerp(&end, 0.5) - Point::new(0.0, 20.0);
        let paint = Paint::linear(
            start,
            end,
            from.color.with_alpha(hex_alpha(0x40)),
            to.color.with_alpha(hex_alpha(0x40)),
        );
        canvas.draw_quad_curve(start, control, end, &paint, 4.0);

        for i in 0..3u8 {
            let t = (self.time + f32::from(i) / 3.0) % 1.0;
            let mut dot = start.lerp(&end, t);
            dot.y -= 20.0 * (PI * t).sin();
            canvas.fill_circle(dot, 3.0, &Color::WHITE.with_alpha(1.0 - t).into());
        }
    }

    fn draw_node(&self, canvas: &mut dyn Canvas, node: &Node) {
        let pulse = (self.time * 2.0).sin().mul_add(0.1, 0.9);
        let center = node.bounds.center();

        let glow = Paint::radial(
            center,
            20.0,
            node.color.with_alpha(hex_alpha(0x40)),
            node.color.with_alpha(0.0),
        );
        canvas.fill_rect(node.bounds.outset(10.0), &glow);
        canvas.fill_rect(node.bounds, &Color::BLACK.with_alpha(0.8).into());
        canvas.stroke_rect(node.bounds, node.color, 2.0 * pulse);

        let style = TextStyle::monospace(12.0, node.color).align(TextAlign::Center);
        let lines = node.label.len() as f32;
        for (i, line) in node.label.iter().enumerate() {
            let offset = (i as f32 - lines / 2.0 + 0.5) * 14.0;
            canvas.draw_text(line, Point::new(center.x, center.y + offset), &style);
        }

        let dot = node.color.with_alpha(hex_alpha(0x80));
        for i in 0..4u8 {
            let angle = (self.time + f32::from(i) / 4.0 * TAU) % TAU;
            let p = Point::new(
                angle.cos().mul_add(node.bounds.width / 2.0 + 15.0, center.x),
                angle.sin().mul_add(node.bounds.height / 2.0 + 15.0, center.y),
            );
            canvas.fill_circle(p, 3.0, &dot.into());
        }
    }

    fn draw_packet(&self, canvas: &mut dyn Canvas, packet: &Packet) {
        let (Some(from), Some(to)) = (
            self.nodes.get(packet.path[packet.hop]),
            packet.path.get(packet.hop + 1).and_then(|&i| self.nodes.get(i)),
        ) else {
            return;
        };
        let (start, end) = pipe_ends(from, to);

        canvas.fill_circle(packet.pos, 6.0, &packet.color.into());
        canvas.fill_circle(
            packet.pos,
            12.0,
            &packet.color.with_alpha(hex_alpha(0x40)).into(),
        );
        for i in 1..=5u8 {
            let trail = (packet.progress - f32::from(i) * 0.1).max(0.0);
            let alpha = hex_alpha(255 / (i + 1));
            canvas.fill_circle(
                start.lerp(&end, trail),
                6.0 - f32::from(i),
                &packet.color.with_alpha(alpha).into(),
            );
        }
    }

    fn draw_metrics(&self, canvas: &mut dyn Canvas) {
        let style = TextStyle::monospace(14.0, Color::WHITE.with_alpha(0.7));
        let n = self.packets.len();
        let lines = [
            format!("Active Packets: {n}"),
            format!("Throughput: {} events/sec", group_thousands(n * 1000)),
            format!("Latency: {}ms", self.latency_ms),
        ];
        for (i, line) in lines.iter().enumerate() {
            canvas.draw_text(line, Point::new(20.0, (i as f32).mul_add(20.0, 40.0)), &style);
        }
    }
}

impl Effect for DataPipeline {
    fn name(&self) -> &'static str {
        "data-pipeline"
    }

    fn initialize(&mut self, size: Size, _rng: &mut DeterministicRng) {
        self.size = size;
        self.time = 0.0;
        self.nodes = Self::layout(size);
        self.packets.reset();
    }

    fn tick(&mut self, dt: f32, rng: &mut DeterministicRng) {
        let k = frame_factor(dt);
        self.time = 0.02f32.mul_add(k, self.time) % 1000.0;
        self.latency_ms = rng.range(10.0, 60.0) as u32;

        if rng.chance((self.config.spawn_probability * k).min(1.0)) {
            self.spawn(rng);
        }

        let step = self.config.packet_speed * k;
        let size = self.size;
        let nodes = &self.nodes;
        for packet in self.packets.iter_mut() {
            packet.progress += step;
            while packet.progress >= 1.0 && packet.hop < packet.path.len() - 1 {
                packet.progress -= 1.0;
                packet.hop += 1;
            }
            if packet.hop + 1 >= packet.path.len() {
                continue;
            }
            if let (Some(from), Some(to)) =
                (nodes.get(packet.path[packet.hop]), nodes.get(packet.path[packet.hop + 1]))
            {
                let (start, end) = pipe_ends(from, to);
                packet.pos = size.clamp(start.lerp(&end, packet.progress));
            }
        }
        self.packets.retain(|p| p.hop + 1 < p.path.len());
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.fade(Color::BLACK.with_alpha(0.1));
        for &(from, to) in &PIPES {
            if let (Some(from), Some(to)) = (self.nodes.get(from), self.nodes.get(to)) {
                self.draw_pipe(canvas, from, to);
            }
        }
        for node in &self.nodes {
            self.draw_node(canvas, node);
        }
        for packet in &self.packets {
            self.draw_packet(canvas, packet);
        }
        if self.config.show_metrics {
            self.draw_metrics(canvas);
        }
    }

    fn entity_count(&self) -> usize {
        self.nodes.len() + self.packets.len()
    }

    fn capacity(&self) -> usize {
        PIPES.len() + self.packets.capacity()
    }

    fn bounds(&self) -> Size {
        self.size
    }

    fn positions(&self) -> Vec<Point> {
        self.nodes
            .iter()
            .map(|n| Point::new(n.bounds.x, n.bounds.y))
            .chain(self.packets.iter().map(|p| p.pos))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{DrawCommand, RecordingCanvas};

    fn pipeline() -> DataPipeline {
        let mut p = DataPipeline::default();
        p.initialize(Size::new(1200.0, 800.0), &mut DeterministicRng::new(1));
        p
    }

    #[test]
    fn test_layout_matches_stages() {
        let p = pipeline();
        assert_eq!(
            p.node_ids(),
            ["kafka", "database", "spark", "flink", "warehouse", "lake"]
        );
        let stages: Vec<Stage> = p.nodes.iter().map(|n| n.stage).collect();
        assert_eq!(stages[..2], [Stage::Source, Stage::Source]);
        assert_eq!(stages[4..], [Stage::Sink, Stage::Sink]);
        assert_eq!(p.nodes[SPARK].bounds, Rect::new(540.0, 320.0, 140.0, 80.0));
        assert_eq!(p.nodes[WAREHOUSE].bounds.x, 980.0);
    }

    #[test]
    fn test_nodes_stay_inside_tiny_canvas() {
        let mut p = DataPipeline::default();
        p.initialize(Size::new(150.0, 90.0), &mut DeterministicRng::new(1));
        let size = p.bounds();
        assert!(p.positions().iter().all(|pt| size.contains(*pt)));
    }

    #[test]
    fn test_packets_spawn_travel_and_finish() {
        let mut p = DataPipeline::new(DataPipelineConfig {
            spawn_probability: 1.0,
            max_packets: 4,
            ..DataPipelineConfig::default()
        });
        p.initialize(Size::new(1200.0, 800.0), &mut DeterministicRng::new(1));
        let mut rng = DeterministicRng::new(2);

        p.tick(1.0 / 60.0, &mut rng);
        assert_eq!(p.active_packets(), 1);
        for _ in 0..10 {
            p.tick(1.0 / 60.0, &mut rng);
        }
        assert_eq!(p.active_packets(), 4);

        // Two hops at 0.02 per frame take about 100 frames.
        let mut done = DataPipeline::new(DataPipelineConfig {
            spawn_probability: 0.0,
            ..DataPipelineConfig::default()
        });
        done.initialize(Size::new(1200.0, 800.0), &mut DeterministicRng::new(1));
        done.spawn(&mut rng);
        assert_eq!(done.active_packets(), 1);
        for _ in 0..120 {
            done.tick(1.0 / 60.0, &mut rng);
        }
        assert_eq!(done.active_packets(), 0);
    }

    #[test]
    fn test_packet_paths_follow_pipes() {
        let mut p = DataPipeline::default();
        p.initialize(Size::new(1200.0, 800.0), &mut DeterministicRng::new(1));
        let mut rng = DeterministicRng::new(3);
        for _ in 0..50 {
            p.spawn(&mut rng);
        }
        for packet in &p.packets {
            let [a, b, c] = packet.path;
            assert!(PIPES.contains(&(a, b)));
            assert!(PIPES.contains(&(b, c)));
        }
    }

    #[test]
    fn test_metrics_overlay() {
        let p = pipeline();
        let mut canvas = RecordingCanvas::with_size(p.bounds());
        p.render(&mut canvas);
        let texts: Vec<String> = canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { content, .. } => Some(content.clone()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"Active Packets: 0".to_string()));
        assert!(texts.contains(&"Throughput: 0 events/sec".to_string()));
        assert!(texts.iter().any(|t| t.starts_with("Latency: ")));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(64_000), "64,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
