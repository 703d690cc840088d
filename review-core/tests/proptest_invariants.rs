//! Property-based invariants for the pure pieces of the review form.
//!
//! Verifies:
//! 1. `color_for` is deterministic and gray exactly at `min`
//! 2. `color_for` is continuous across segment boundaries (±1 per channel)
//! 3. `snap` lands on the step grid and inside `[min, max]`
//! 4. wheel moves never leave the range
//! 5. URL display text re-derived from the stored value is stable

use proptest::prelude::*;
use review_core::color::{color_for, ScoreRange, GRAY};
use review_core::slider::{SliderSpec, SliderState};
use review_core::url::{normalize_url, truncate_for_display};

const CVSS: ScoreRange = ScoreRange::new(0.0, 10.0);

/// A range that is not a whole number of steps.
fn uneven_spec() -> SliderSpec {
    SliderSpec {
        min: 0.0,
        max: 1.0,
        step: 0.3,
        ..SliderSpec::cvss()
    }
}

fn arb_spec() -> impl Strategy<Value = SliderSpec> {
    prop_oneof![
        Just(SliderSpec::cvss()),
        Just(SliderSpec::time_estimate()),
        Just(uneven_spec()),
    ]
}

proptest! {
    #[test]
    fn color_is_deterministic(value in 0.0f64..=10.0) {
        prop_assert_eq!(color_for(value, CVSS), color_for(value, CVSS));
    }

    #[test]
    fn color_is_gray_only_at_min(min in -50.0f64..50.0, span in 0.5f64..100.0) {
        let range = ScoreRange::new(min, min + span);
        prop_assert_eq!(color_for(min, range), GRAY);
    }

    #[test]
    fn color_is_continuous_at_boundaries(boundary in prop_oneof![Just(2.5f64), Just(5.0), Just(7.5)]) {
        let epsilon = 1e-9;
        let below = color_for(boundary - epsilon, CVSS);
        let above = color_for(boundary + epsilon, CVSS);
        for (a, b) in [(below.r, above.r), (below.g, above.g), (below.b, above.b)] {
            prop_assert!((a as i16 - b as i16).abs() <= 1, "{below} vs {above}");
        }
    }

    #[test]
    fn snap_stays_on_grid(spec in arb_spec(), value in -100.0f64..100.0) {
        let snapped = spec.snap(value);
        prop_assert!(snapped >= spec.min && snapped <= spec.max);
        let steps = (snapped - spec.min) / spec.step;
        prop_assert!((steps - steps.round()).abs() < 1e-6);
    }

    #[test]
    fn snap_matches_formula_inside_range(spec in arb_spec(), k in 0u32..=94) {
        let steps = ((spec.max - spec.min) / spec.step).round() as u32;
        let k = k.min(steps) as f64;
        let on_grid = spec.min + spec.step * k;
        prop_assert!((spec.snap(on_grid) - on_grid).abs() < 1e-9);
    }

    #[test]
    fn wheel_never_leaves_range(
        spec in arb_spec(),
        start in 0.0f64..60.0,
        deltas in proptest::collection::vec(-300.0f64..300.0, 1..40),
    ) {
        let mut slider = SliderState::open(spec.clone(), &start.to_string());
        for delta in deltas {
            slider.wheel(delta);
            prop_assert!(slider.value() >= spec.min && slider.value() <= spec.max);
            let steps = (slider.value() - spec.min) / spec.step;
            prop_assert!((steps - steps.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn display_is_stable_when_rederived(input in "[a-z]{1,12}(\\.[a-z]{2,5}){1,2}(/[A-Za-z0-9-]{0,20})?") {
        let stored = normalize_url(&input);
        let first = truncate_for_display(&stored);
        let again = truncate_for_display(&normalize_url(&stored));
        prop_assert_eq!(first, again);
    }
}
