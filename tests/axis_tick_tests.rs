use touchplot::core::{AxisTickConfig, compute_ticks};

#[test]
fn range_zero_to_hundred_with_six_labels_snaps_to_twenty() {
    let ticks = compute_ticks(0.0, 100.0, &AxisTickConfig::default().with_label_count(6));
    assert_eq!(ticks.values, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    assert_eq!(ticks.decimals, 0);
    assert!(ticks.centered.is_empty());
}

#[test]
fn ticks_are_evenly_spaced_and_increasing() {
    let ticks = compute_ticks(-3.7, 18.4, &AxisTickConfig::default().with_label_count(9));
    assert!(ticks.values.len() >= 2);
    let interval = ticks.interval();
    assert!(interval > 0.0);
    for pair in ticks.values.windows(2) {
        assert!((pair[1] - pair[0] - interval).abs() <= 1e-9);
    }
}

#[test]
fn identical_inputs_produce_identical_sets() {
    let config = AxisTickConfig::default()
        .with_label_count(11)
        .with_granularity(0.25);
    let first = compute_ticks(2.13, 57.91, &config);
    for _ in 0..100 {
        assert_eq!(compute_ticks(2.13, 57.91, &config), first);
    }
}

#[test]
fn tick_count_never_exceeds_label_count_plus_two() {
    let ranges = [
        (0.0, 1.0),
        (-1.0, 1.0),
        (0.0, 97.3),
        (1e-6, 2e-6),
        (-1e9, 1e9),
        (99.0, 101.0),
    ];
    for label_count in 2..=25u32 {
        for (min, max) in ranges {
            let config = AxisTickConfig::default().with_label_count(label_count);
            let ticks = compute_ticks(min, max, &config);
            assert!(
                ticks.values.len() <= label_count as usize + 2,
                "count {} exceeds {} + 2 for range [{min}, {max}]",
                ticks.values.len(),
                label_count
            );
        }
    }
}

#[test]
fn boundary_tick_lands_exactly_on_range_end() {
    let ticks = compute_ticks(0.0, 100.0, &AxisTickConfig::default().with_label_count(6));
    assert_eq!(*ticks.values.last().expect("non-empty"), 100.0);
}

#[test]
fn fractional_intervals_report_label_decimals() {
    let ticks = compute_ticks(0.0, 1.0, &AxisTickConfig::default().with_label_count(5));
    assert_eq!(ticks.interval(), 0.2);
    assert_eq!(ticks.decimals, 1);

    let fine = compute_ticks(0.0, 0.01, &AxisTickConfig::default().with_label_count(5));
    assert!(fine.decimals >= 3);
}

#[test]
fn granularity_prevents_duplicate_labels_when_zoomed_in() {
    let config = AxisTickConfig::default()
        .with_label_count(10)
        .with_granularity(1.0);
    let ticks = compute_ticks(4.9, 5.4, &config);
    assert_eq!(ticks.interval(), 0.0);
    assert_eq!(ticks.values, vec![5.0]);
}

#[test]
fn forced_count_ignores_niceness() {
    let config = AxisTickConfig::default()
        .with_label_count(5)
        .with_force_label_count(true);
    let ticks = compute_ticks(0.0, 97.0, &config);
    assert_eq!(ticks.values.len(), 5);
    assert_eq!(ticks.values[0], 0.0);
    assert!((ticks.values[1] - 24.25).abs() <= 1e-9);
    assert_eq!(*ticks.values.last().expect("non-empty"), 97.0);
}

#[test]
fn centered_variant_offsets_by_half_interval() {
    let config = AxisTickConfig::default()
        .with_label_count(6)
        .with_centered(true);
    let ticks = compute_ticks(0.0, 100.0, &config);
    assert_eq!(ticks.centered.len(), ticks.values.len());
    for (gridline, label) in ticks.values.iter().zip(&ticks.centered) {
        assert!((label - gridline - 10.0).abs() <= 1e-9);
    }
    // The extra leading tick keeps the first centered label in view.
    assert_eq!(ticks.values[0], -20.0);
}

#[test]
fn label_count_outside_bounds_is_clamped_not_rejected() {
    let one = compute_ticks(0.0, 100.0, &AxisTickConfig::default().with_label_count(1));
    assert!(!one.is_empty());

    let many = compute_ticks(0.0, 100.0, &AxisTickConfig::default().with_label_count(90));
    assert!(many.values.len() <= 27);
}

#[test]
fn hidden_axis_and_bad_ranges_yield_empty_sets() {
    assert!(compute_ticks(0.0, 100.0, &AxisTickConfig::default().with_label_count(0)).is_empty());
    assert!(compute_ticks(3.0, 3.0, &AxisTickConfig::default()).is_empty());
    assert!(compute_ticks(5.0, 2.0, &AxisTickConfig::default()).is_empty());
    assert!(compute_ticks(f64::NEG_INFINITY, 0.0, &AxisTickConfig::default()).is_empty());
}
