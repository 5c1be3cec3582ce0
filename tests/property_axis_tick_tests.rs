use proptest::prelude::*;
use touchplot::core::{AxisTickConfig, compute_ticks};

proptest! {
    #[test]
    fn tick_count_stays_within_label_count_plus_two(
        min in -1.0e6f64..1.0e6,
        span in 1.0e-3f64..1.0e6,
        label_count in 2u32..=25
    ) {
        let config = AxisTickConfig::default().with_label_count(label_count);
        let ticks = compute_ticks(min, min + span, &config);
        prop_assert!(
            ticks.values.len() <= label_count as usize + 2,
            "{} ticks for label_count {}",
            ticks.values.len(),
            label_count
        );
    }

    #[test]
    fn ticks_increase_with_constant_spacing(
        min in -1.0e6f64..1.0e6,
        span in 1.0e-3f64..1.0e6,
        label_count in 2u32..=25
    ) {
        let config = AxisTickConfig::default().with_label_count(label_count);
        let ticks = compute_ticks(min, min + span, &config);
        prop_assume!(ticks.values.len() >= 2);

        let interval = ticks.interval();
        prop_assert!(interval > 0.0);
        for pair in ticks.values.windows(2) {
            prop_assert!(pair[1] > pair[0]);
            // Spacing error is bounded by rounding at the values' own
            // magnitude, not the interval's.
            let tolerance = (pair[1].abs().max(interval)) * 1e-12 + 1e-12;
            prop_assert!((pair[1] - pair[0] - interval).abs() <= tolerance);
        }
    }

    #[test]
    fn ticks_cover_the_visible_range(
        min in -1.0e6f64..1.0e6,
        span in 1.0f64..1.0e6,
        label_count in 2u32..=25
    ) {
        let config = AxisTickConfig::default().with_label_count(label_count);
        let ticks = compute_ticks(min, min + span, &config);
        prop_assume!(!ticks.is_empty());

        let interval = ticks.interval().max(span);
        for value in &ticks.values {
            prop_assert!(*value >= min - interval);
            prop_assert!(*value <= min + span + interval);
        }
    }

    #[test]
    fn equal_inputs_are_deterministic(
        min in -1.0e6f64..1.0e6,
        span in 1.0e-3f64..1.0e6,
        label_count in 2u32..=25,
        granularity in prop::option::of(1.0e-3f64..10.0),
        centered in any::<bool>()
    ) {
        let mut config = AxisTickConfig::default()
            .with_label_count(label_count)
            .with_centered(centered);
        if let Some(granularity) = granularity {
            config = config.with_granularity(granularity);
        }

        let first = compute_ticks(min, min + span, &config);
        let second = compute_ticks(min, min + span, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn forced_count_is_exact_and_anchored(
        min in -1.0e6f64..1.0e6,
        span in 1.0e-3f64..1.0e6,
        label_count in 2u32..=25
    ) {
        let config = AxisTickConfig::default()
            .with_label_count(label_count)
            .with_force_label_count(true);
        let ticks = compute_ticks(min, min + span, &config);

        prop_assert_eq!(ticks.values.len(), label_count as usize);
        prop_assert_eq!(ticks.values[0], min);
        let last = *ticks.values.last().expect("non-empty");
        let tolerance = (min.abs() + span) * 1e-9 + 1e-12;
        prop_assert!((last - (min + span)).abs() <= tolerance);
    }

    #[test]
    fn centered_labels_sit_half_an_interval_up(
        min in -1.0e3f64..1.0e3,
        span in 1.0f64..1.0e3,
        label_count in 2u32..=25
    ) {
        let config = AxisTickConfig::default()
            .with_label_count(label_count)
            .with_centered(true);
        let ticks = compute_ticks(min, min + span, &config);
        prop_assume!(ticks.values.len() >= 2);

        let half = ticks.interval() / 2.0;
        prop_assert_eq!(ticks.centered.len(), ticks.values.len());
        for (gridline, label) in ticks.values.iter().zip(&ticks.centered) {
            prop_assert!((label - gridline - half).abs() <= half * 1e-9);
        }
    }
}
