//! Golden-frame snapshots of recorded draw commands.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vitrine_core::DrawCommand;

/// Draw-call counts for one frame, by command kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameSummary {
    /// Total commands
    pub total: usize,
    /// Commands per kind, e.g. `"circle" => 12`
    pub by_kind: BTreeMap<&'static str, usize>,
}

impl FrameSummary {
    /// Summarize a frame.
    #[must_use]
    pub fn of(commands: &[DrawCommand]) -> Self {
        let mut by_kind = BTreeMap::new();
        for command in commands {
            *by_kind.entry(command.kind()).or_insert(0) += 1;
        }
        Self {
            total: commands.len(),
            by_kind,
        }
    }

    /// Commands of one kind.
    #[must_use]
    pub fn count(&self, kind: &str) -> usize {
        self.by_kind.get(kind).copied().unwrap_or(0)
    }
}

/// Snapshot storage failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading or writing a baseline failed.
    #[error("snapshot io error at {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A baseline could not be parsed.
    #[error("snapshot {path} is not valid JSON: {source}")]
    Json {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

/// Result of comparing a frame against its baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// Within the threshold.
    Match,
    /// No baseline existed and one was written.
    Created(PathBuf),
    /// No baseline exists and updating is off.
    Missing(PathBuf),
    /// Differs from the baseline; the actual frame was written next to it.
    Mismatch {
        /// Fraction of differing commands
        diff: f64,
        /// Where the actual frame was saved
        actual: PathBuf,
    },
}

/// Baseline store for recorded frames.
///
/// Baselines are JSON arrays of [`DrawCommand`]s in `dir/{name}.json`.
/// With updating on (or `SNAPSHOT_UPDATE` set) missing baselines are
/// created instead of reported.
#[derive(Debug, Clone)]
pub struct Snapshot {
    dir: PathBuf,
    threshold: f64,
    update: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new("tests/snapshots")
    }
}

impl Snapshot {
    /// Store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            threshold: 0.0,
            update: std::env::var_os("SNAPSHOT_UPDATE").is_some(),
        }
    }

    /// Fraction of commands allowed to differ.
    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Create missing baselines.
    #[must_use]
    pub fn update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    /// Fraction of positions where two frames differ. Extra or missing
    /// commands count as differences.
    #[must_use]
    pub fn diff(expected: &[DrawCommand], actual: &[DrawCommand]) -> f64 {
        let longest = expected.len().max(actual.len());
        if longest == 0 {
            return 0.0;
        }
        let same = expected.iter().zip(actual).filter(|(a, b)| a == b).count();
        (longest - same) as f64 / longest as f64
    }

    /// Compare `commands` against the baseline called `name`.
    ///
    /// # Errors
    ///
    /// [`SnapshotError`] if a baseline cannot be read, parsed or written.
    pub fn check(&self, name: &str, commands: &[DrawCommand]) -> Result<Comparison, SnapshotError> {
        let baseline = self.path(name, "json");
        if !baseline.exists() {
            if !self.update {
                return Ok(Comparison::Missing(baseline));
            }
            write_json(&baseline, commands)?;
            return Ok(Comparison::Created(baseline));
        }

        let text = fs::read_to_string(&baseline).map_err(|source| SnapshotError::Io {
            path: baseline.clone(),
            source,
        })?;
        let expected: Vec<DrawCommand> =
            serde_json::from_str(&text).map_err(|source| SnapshotError::Json {
                path: baseline.clone(),
                source,
            })?;

        let diff = Self::diff(&expected, commands);
        if diff <= self.threshold {
            return Ok(Comparison::Match);
        }
        let actual = self.path(name, "actual.json");
        write_json(&actual, commands)?;
        Ok(Comparison::Mismatch { diff, actual })
    }

    /// Like [`Snapshot::check`], panicking on anything but a match or a
    /// freshly created baseline.
    ///
    /// # Panics
    ///
    /// On mismatch, missing baseline or storage failure.
    pub fn assert_match(&self, name: &str, commands: &[DrawCommand]) {
        match self.check(name, commands) {
            Ok(Comparison::Match | Comparison::Created(_)) => {}
            Ok(Comparison::Missing(path)) => panic!(
                "No baseline found for '{name}'. Run with SNAPSHOT_UPDATE=1 to create.\n\
                 Expected path: {}",
                path.display()
            ),
            Ok(Comparison::Mismatch { diff, actual }) => panic!(
                "Frame regression '{name}': {:.2}% diff (threshold: {:.2}%)\nActual: {}",
                diff * 100.0,
                self.threshold * 100.0,
                actual.display()
            ),
            Err(err) => panic!("{err}"),
        }
    }

    fn path(&self, name: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{name}.{extension}"))
    }
}

fn write_json(path: &Path, commands: &[DrawCommand]) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = serde_json::to_string_pretty(commands).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{Color, Paint, Point, Rect};

    fn frame() -> Vec<DrawCommand> {
        vec![
            DrawCommand::Clear {
                bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
            },
            DrawCommand::Circle {
                center: Point::new(5.0, 5.0),
                radius: 2.0,
                paint: Paint::Solid(Color::WHITE),
            },
        ]
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vitrine-snapshot-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_summary_counts_kinds() {
        let summary = FrameSummary::of(&frame());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.count("clear"), 1);
        assert_eq!(summary.count("circle"), 1);
        assert_eq!(summary.count("text"), 0);
    }

    #[test]
    fn test_diff() {
        let a = frame();
        assert_eq!(Snapshot::diff(&a, &a), 0.0);
        assert_eq!(Snapshot::diff(&a, &a[..1]), 0.5);
        assert_eq!(Snapshot::diff(&[], &[]), 0.0);
        assert_eq!(Snapshot::diff(&a, &[]), 1.0);
    }

    #[test]
    fn test_missing_without_update() {
        let snap = Snapshot::new(scratch("missing")).update(false);
        assert!(matches!(snap.check("f", &frame()).unwrap(), Comparison::Missing(_)));
    }

    #[test]
    fn test_create_then_match_then_mismatch() {
        let dir = scratch("cycle");
        let snap = Snapshot::new(&dir).update(true);
        assert!(matches!(snap.check("f", &frame()).unwrap(), Comparison::Created(_)));
        assert_eq!(snap.check("f", &frame()).unwrap(), Comparison::Match);

        let changed = &frame()[..1];
        match snap.check("f", changed).unwrap() {
            Comparison::Mismatch { diff, actual } => {
                assert_eq!(diff, 0.5);
                assert!(actual.exists());
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
        assert_eq!(snap.clone().threshold(0.5).check("f", changed).unwrap(), Comparison::Match);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_corrupt_baseline() {
        let dir = scratch("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("f.json"), "not json").unwrap();
        let err = Snapshot::new(&dir).check("f", &frame()).unwrap_err();
        assert!(matches!(err, SnapshotError::Json { .. }));
        let _ = fs::remove_dir_all(dir);
    }
}
