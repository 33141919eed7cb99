//! Headless effect preview: run frames against a recording canvas and
//! report what was drawn.

use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use vitrine_core::{
    AnimationDriver, DrawCommand, DriverConfig, DriverError, Effect, FrameOutcome,
    ManualScheduler, RecordingCanvas, Size,
};
use vitrine_effects::EffectKind;

/// Output format for `vitrine preview`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable summary
    #[default]
    Text,
    /// Last frame's draw commands as JSON
    Json,
}

/// Preview parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewOptions {
    /// Canvas size
    pub size: Size,
    /// Frames to render
    pub frames: u32,
    /// RNG seed
    pub seed: u64,
    /// Simulated time between frames
    pub frame_interval_ms: f64,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            size: Size::new(800.0, 600.0),
            frames: 60,
            seed: 42,
            frame_interval_ms: 1000.0 / 60.0,
        }
    }
}

/// Draw calls of one rendered frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// 1-based frame number
    pub frame: u64,
    /// Total draw calls
    pub draw_calls: usize,
    /// Calls per command kind
    pub by_kind: BTreeMap<&'static str, usize>,
}

impl FrameStats {
    fn of(frame: u64, commands: &[DrawCommand]) -> Self {
        let mut by_kind = BTreeMap::new();
        for command in commands {
            *by_kind.entry(command.kind()).or_insert(0) += 1;
        }
        Self {
            frame,
            draw_calls: commands.len(),
            by_kind,
        }
    }
}

/// Result of a preview run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewReport {
    /// Effect name
    pub effect: &'static str,
    /// Canvas size
    pub size: Size,
    /// Live entities after the last frame
    pub entities: usize,
    /// Pool capacity
    pub capacity: usize,
    /// Per-frame stats
    pub frames: Vec<FrameStats>,
    /// Commands of the last frame
    pub last_frame: Vec<DrawCommand>,
}

/// Run `effect` headless for `options.frames` frames.
///
/// # Errors
///
/// [`DriverError::InvalidSize`] for a size that is not finite and positive.
pub fn run(effect: Box<dyn Effect>, options: &PreviewOptions) -> Result<PreviewReport, DriverError> {
    let size = options.size;
    if !size.is_valid() || size.is_empty() {
        return Err(DriverError::InvalidSize(size));
    }

    let config = DriverConfig::default().with_seed(options.seed);
    let mut driver = AnimationDriver::new(
        effect,
        Some(RecordingCanvas::with_size(size)),
        ManualScheduler::new(),
        config,
    );
    driver.start()?;

    let mut frames = Vec::with_capacity(options.frames as usize);
    let mut last_frame = Vec::new();
    for i in 0..options.frames {
        let now = f64::from(i) * options.frame_interval_ms;
        let due = driver.scheduler_mut().take_due();
        for request in due {
            if driver.on_frame(request, now) == FrameOutcome::Rendered {
                let commands = driver
                    .canvas_mut()
                    .map(RecordingCanvas::take_commands)
                    .unwrap_or_default();
                frames.push(FrameStats::of(driver.frames_rendered(), &commands));
                last_frame = commands;
            }
        }
    }

    let report = PreviewReport {
        effect: driver.effect().name(),
        size,
        entities: driver.effect().entity_count(),
        capacity: driver.effect().capacity(),
        frames,
        last_frame,
    };
    driver.stop();
    Ok(report)
}

/// Run the catalog effect `kind` with its default config.
pub fn run_kind(kind: EffectKind, options: &PreviewOptions) -> Result<PreviewReport, DriverError> {
    run(kind.build(), options)
}

impl PreviewReport {
    /// Summary for terminals.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} at {}x{}: {} entities (capacity {}), {} frames",
            self.effect,
            self.size.width,
            self.size.height,
            self.entities,
            self.capacity,
            self.frames.len()
        );
        for stats in &self.frames {
            let kinds: Vec<String> = stats
                .by_kind
                .iter()
                .map(|(kind, n)| format!("{kind} {n}"))
                .collect();
            let _ = writeln!(
                out,
                "  frame {:>4}: {:>5} draw calls ({})",
                stats.frame,
                stats.draw_calls,
                kinds.join(", ")
            );
        }
        out
    }

    /// Last frame's commands, pretty-printed.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.last_frame)
    }

    /// Render in `format`.
    pub fn render(&self, format: Format) -> serde_json::Result<String> {
        match format {
            Format::Text => Ok(self.to_text()),
            Format::Json => self.to_json(),
        }
    }
}
