use serde::{Deserialize, Serialize};

/// Tick-generation policy for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTickConfig {
    /// Desired label count; honored within `[2, 25]`, `0` hides the axis.
    pub label_count: u32,
    /// Minimum allowed interval, used to avoid duplicate rounded labels
    /// when zoomed in.
    #[serde(default)]
    pub granularity: Option<f64>,
    /// Emit exactly `label_count` evenly spaced ticks, sacrificing round
    /// interval values.
    #[serde(default)]
    pub force_label_count: bool,
    /// Also produce label positions centered between gridlines.
    #[serde(default)]
    pub centered: bool,
}

impl Default for AxisTickConfig {
    fn default() -> Self {
        Self {
            label_count: 6,
            granularity: None,
            force_label_count: false,
            centered: false,
        }
    }
}

impl AxisTickConfig {
    #[must_use]
    pub fn with_label_count(mut self, label_count: u32) -> Self {
        self.label_count = label_count;
        self
    }

    #[must_use]
    pub fn with_granularity(mut self, granularity: f64) -> Self {
        self.granularity = Some(granularity);
        self
    }

    #[must_use]
    pub fn with_force_label_count(mut self, force: bool) -> Self {
        self.force_label_count = force;
        self
    }

    #[must_use]
    pub fn with_centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }
}

/// Computed ticks for one axis at one visible range.
///
/// Recomputed whole whenever the range or policy changes; never patched
/// incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TickSet {
    /// Gridline positions, ascending.
    pub values: Vec<f64>,
    /// Decimal digits needed to print adjacent labels distinctly.
    pub decimals: usize,
    /// Label positions offset by half an interval; empty unless the policy
    /// asked for centered labels.
    pub centered: Vec<f64>,
}

impl TickSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn interval(&self) -> f64 {
        match self.values.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }
}

/// Computes the tick set for a visible `[min, max]` range.
///
/// Pure and deterministic: equal inputs always produce an identical set,
/// which keeps labels stable while a zoom gesture recomputes every frame.
#[must_use]
pub fn compute_ticks(min: f64, max: f64, config: &AxisTickConfig) -> TickSet {
    if config.label_count == 0 {
        return TickSet::default();
    }
    let range = max - min;
    if !min.is_finite() || !max.is_finite() || range <= 0.0 {
        return TickSet::default();
    }

    let label_count = config.label_count.clamp(2, 25);

    if config.force_label_count {
        return forced_ticks(min, range, label_count);
    }

    let raw_interval = range / f64::from(label_count);
    let mut interval = round_to_nice(raw_interval);
    if let Some(granularity) = config.granularity {
        if granularity.is_finite() && granularity > 0.0 {
            interval = interval.max(granularity);
        }
    }

    let mut first = (min / interval).ceil() * interval;
    if config.centered {
        first -= interval;
    }
    // One ULP of headroom so a tick landing exactly on `max` survives the
    // floating-point division below.
    let last = ((max / interval).floor() * interval).next_up();

    let mut values = Vec::new();
    if last >= first {
        let count = ((last - first) / interval).floor() as usize + 1;
        values.reserve(count);
        for step in 0..count {
            // Adding 0.0 normalizes a negative zero.
            values.push(first + step as f64 * interval + 0.0);
        }
    }

    finish(values, interval, config.centered)
}

fn forced_ticks(min: f64, range: f64, label_count: u32) -> TickSet {
    let interval = range / f64::from(label_count - 1);
    let values = (0..label_count)
        .map(|step| min + f64::from(step) * interval + 0.0)
        .collect();
    finish(values, interval, false)
}

fn finish(values: Vec<f64>, interval: f64, centered: bool) -> TickSet {
    let decimals = if interval >= 1.0 {
        0
    } else {
        (-interval.log10()).ceil() as usize
    };

    let centered = if centered {
        let offset = interval / 2.0;
        values.iter().map(|value| value + offset).collect()
    } else {
        Vec::new()
    };

    TickSet {
        values,
        decimals,
        centered,
    }
}

/// Snaps an interval up to `magnitude x {1, 2, 5, 10}`, the smallest
/// candidate not below the raw value.
fn round_to_nice(raw_interval: f64) -> f64 {
    let magnitude = 10f64.powf(raw_interval.abs().log10().floor());
    for multiplier in [1.0, 2.0, 5.0] {
        let candidate = magnitude * multiplier;
        if candidate >= raw_interval {
            return candidate;
        }
    }
    magnitude * 10.0
}

#[cfg(test)]
mod tests {
    use super::{AxisTickConfig, compute_ticks, round_to_nice};

    #[test]
    fn reference_range_snaps_to_twenty() {
        let ticks = compute_ticks(0.0, 100.0, &AxisTickConfig::default());
        assert_eq!(ticks.values, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(ticks.decimals, 0);
    }

    #[test]
    fn nice_rounding_picks_smallest_candidate_at_or_above() {
        assert_eq!(round_to_nice(16.7), 20.0);
        assert_eq!(round_to_nice(2.0), 2.0);
        assert_eq!(round_to_nice(0.3), 0.5);
        assert_eq!(round_to_nice(7.2), 10.0);
    }

    #[test]
    fn negative_zero_is_normalized() {
        let ticks = compute_ticks(-10.0, 10.0, &AxisTickConfig::default().with_label_count(4));
        assert!(ticks.values.contains(&0.0));
        for value in &ticks.values {
            assert!(!(value == &0.0 && value.is_sign_negative()));
        }
    }

    #[test]
    fn forced_count_emits_exactly_requested_labels() {
        let config = AxisTickConfig::default()
            .with_label_count(7)
            .with_force_label_count(true);
        let ticks = compute_ticks(0.0, 10.0, &config);
        assert_eq!(ticks.values.len(), 7);
        assert_eq!(ticks.values[0], 0.0);
        assert_eq!(*ticks.values.last().unwrap(), 10.0);
    }

    #[test]
    fn granularity_floors_the_interval() {
        let config = AxisTickConfig::default().with_granularity(30.0);
        let ticks = compute_ticks(0.0, 100.0, &config);
        assert_eq!(ticks.interval(), 30.0);
    }

    #[test]
    fn degenerate_ranges_produce_empty_sets() {
        assert!(compute_ticks(5.0, 5.0, &AxisTickConfig::default()).is_empty());
        assert!(compute_ticks(f64::NAN, 1.0, &AxisTickConfig::default()).is_empty());
        let hidden = AxisTickConfig::default().with_label_count(0);
        assert!(compute_ticks(0.0, 1.0, &hidden).is_empty());
    }

    #[test]
    fn centered_labels_sit_between_gridlines() {
        let config = AxisTickConfig::default().with_centered(true);
        let ticks = compute_ticks(0.0, 100.0, &config);
        assert_eq!(ticks.centered.len(), ticks.values.len());
        assert_eq!(ticks.centered[0] - ticks.values[0], 10.0);
        assert!(ticks.values[0] <= 0.0);
    }
}
