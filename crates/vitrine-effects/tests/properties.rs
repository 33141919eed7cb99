//! Property tests shared by every effect: pool bounds and anchor bounds.

use proptest::prelude::*;
use vitrine_core::{DeterministicRng, Effect, Point, RecordingCanvas, Size};
use vitrine_effects::EffectKind;

fn kind_strategy() -> impl Strategy<Value = EffectKind> {
    prop::sample::select(EffectKind::ALL.to_vec())
}

fn size_strategy() -> impl Strategy<Value = Size> {
    (1u32..2500, 1u32..1600).prop_map(|(w, h)| Size::from_pixels(w, h))
}

fn in_bounds(size: Size, points: &[Point]) -> bool {
    points.iter().all(|p| size.contains(*p))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_pool_within_capacity(kind in kind_strategy(), size in size_strategy(), seed in any::<u64>()) {
        let mut effect = kind.build();
        let mut rng = DeterministicRng::new(seed);
        effect.initialize(size, &mut rng);
        prop_assert!(effect.entity_count() <= effect.capacity());
        prop_assert_eq!(effect.bounds(), size);
    }

    #[test]
    fn prop_anchors_stay_in_bounds(
        kind in kind_strategy(),
        size in size_strategy(),
        seed in any::<u64>(),
        ticks in 0usize..200,
        dt in 0.0f32..0.1,
    ) {
        let mut effect = kind.build();
        let mut rng = DeterministicRng::new(seed);
        effect.initialize(size, &mut rng);
        prop_assert!(in_bounds(size, &effect.positions()));

        for _ in 0..ticks {
            effect.tick(dt, &mut rng);
            prop_assert!(effect.entity_count() <= effect.capacity());
        }
        prop_assert!(in_bounds(size, &effect.positions()));
    }

    #[test]
    fn prop_resize_rebuilds_within_new_bounds(
        kind in kind_strategy(),
        first in size_strategy(),
        second in size_strategy(),
        seed in any::<u64>(),
    ) {
        let mut effect = kind.build();
        let mut rng = DeterministicRng::new(seed);
        effect.initialize(first, &mut rng);
        for _ in 0..30 {
            effect.tick(1.0 / 60.0, &mut rng);
        }
        effect.initialize(second, &mut rng);
        prop_assert!(effect.entity_count() <= effect.capacity());
        prop_assert!(in_bounds(second, &effect.positions()));
    }

    #[test]
    fn prop_bad_dt_is_harmless(kind in kind_strategy(), size in size_strategy(), seed in any::<u64>()) {
        let mut effect = kind.build();
        let mut rng = DeterministicRng::new(seed);
        effect.initialize(size, &mut rng);
        for dt in [f32::NAN, f32::INFINITY, -1.0, 0.0] {
            effect.tick(dt, &mut rng);
        }
        prop_assert!(in_bounds(size, &effect.positions()));
    }
}

#[test]
fn test_render_is_pure() {
    let size = Size::new(640.0, 480.0);
    for kind in EffectKind::ALL {
        let mut effect = kind.build();
        let mut rng = DeterministicRng::new(9);
        effect.initialize(size, &mut rng);
        for _ in 0..20 {
            effect.tick(1.0 / 60.0, &mut rng);
        }

        let mut a = RecordingCanvas::with_size(size);
        let mut b = RecordingCanvas::with_size(size);
        effect.render(&mut a);
        effect.render(&mut b);
        assert_eq!(a.commands(), b.commands(), "{kind} render changed between calls");
    }
}

#[test]
fn test_same_seed_same_frames() {
    let size = Size::new(800.0, 600.0);
    for kind in EffectKind::ALL {
        let frames = |seed: u64| {
            let mut effect = kind.build();
            let mut rng = DeterministicRng::new(seed);
            effect.initialize(size, &mut rng);
            let mut canvas = RecordingCanvas::with_size(size);
            for _ in 0..10 {
                effect.tick(1.0 / 60.0, &mut rng);
                effect.render(&mut canvas);
            }
            canvas.take_commands()
        };
        assert_eq!(frames(3), frames(3), "{kind} is not deterministic");
    }
}
