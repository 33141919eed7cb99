//! Frame baselines for every catalog effect.

use std::path::PathBuf;
use vitrine_core::{DrawCommand, DriverConfig, Size};
use vitrine_effects::{EffectKind, ParticleField};
use vitrine_test::{Comparison, FrameHarness, Snapshot};

fn baseline_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vitrine-baselines-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn tenth_frame(kind: EffectKind, seed: u64) -> Vec<DrawCommand> {
    let config = DriverConfig::default().with_seed(seed);
    let mut h = FrameHarness::with_config(kind.build(), Size::new(640.0, 480.0), config);
    h.mount().unwrap();
    assert_eq!(h.pump(10), 10);
    h.last_rendered().unwrap().commands.clone()
}

#[test]
fn test_every_effect_matches_its_baseline() {
    let dir = baseline_dir("catalog");
    let store = Snapshot::new(&dir).update(true);
    for kind in EffectKind::ALL {
        let recorded = tenth_frame(kind, 11);
        assert!(!recorded.is_empty(), "{kind} drew nothing");
        assert!(matches!(store.check(kind.name(), &recorded).unwrap(), Comparison::Created(_)));

        let replayed = tenth_frame(kind, 11);
        store.assert_match(kind.name(), &replayed);
    }
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_moved_particles_break_the_baseline() {
    let dir = baseline_dir("particles");
    let store = Snapshot::new(&dir).update(true);

    let mut h = FrameHarness::new(ParticleField::default(), Size::new(640.0, 480.0));
    h.mount().unwrap();
    h.pump(1);
    let first = h.last_rendered().unwrap().commands.clone();
    store.check("particles", &first).unwrap();

    h.pump(30);
    let later = h.last_rendered().unwrap().commands.clone();
    match store.check("particles", &later).unwrap() {
        Comparison::Mismatch { diff, actual } => {
            assert!(diff > 0.0);
            assert!(actual.exists());
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
    let _ = std::fs::remove_dir_all(dir);
}
