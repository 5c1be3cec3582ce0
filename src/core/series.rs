use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};

/// One data sample in chart value space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub x: f64,
    pub y: f64,
}

impl Entry {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which vertical axis a series is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisSide {
    #[default]
    Left,
    Right,
}

/// Index lookup behavior when no entry matches an x value exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rounding {
    Up,
    Down,
    Closest,
}

/// Value-space sub-interval occupied by one segment of a stacked entry.
///
/// Containment is upper-inclusive: a value sits in the first range with
/// `from < value <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackRange {
    pub from: f64,
    pub to: f64,
}

impl StackRange {
    #[must_use]
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value > self.from && value <= self.to
    }
}

/// Query contract every chart series exposes to the interaction core.
///
/// Implementations must keep entries ordered by ascending x; lookups are
/// specified against that ordering.
pub trait DataSeries {
    fn entry_count(&self) -> usize;

    fn entry_for_index(&self, index: usize) -> Option<Entry>;

    /// Closest entry to `x` under the given rounding mode. When several
    /// entries share the resolved x value, the one nearest `closest_to_y`
    /// wins; pass NaN to take the first of the run.
    fn entry_for_x_value(&self, x: f64, closest_to_y: f64, rounding: Rounding) -> Option<Entry>;

    /// All entries whose x equals `x` exactly.
    fn entries_for_x_value(&self, x: f64) -> SmallVec<[Entry; 2]>;

    fn axis_side(&self) -> AxisSide;

    fn is_visible(&self) -> bool;

    fn is_highlight_enabled(&self) -> bool;

    /// Stack decomposition for the entry at `entry.x`, or `None` for
    /// non-stacked series.
    fn stack_ranges(&self, entry: Entry) -> Option<&[StackRange]>;

    fn x_min(&self) -> f64;
    fn x_max(&self) -> f64;
    fn y_min(&self) -> f64;
    fn y_max(&self) -> f64;
}

/// Array-backed series, sorted by x at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySeries {
    entries: Vec<Entry>,
    stacks: Vec<SmallVec<[StackRange; 4]>>,
    axis: AxisSide,
    visible: bool,
    highlight_enabled: bool,
}

impl MemorySeries {
    /// Builds a plain (non-stacked) series from unsorted entries.
    pub fn from_entries(mut entries: Vec<Entry>) -> ChartResult<Self> {
        for entry in &entries {
            if !entry.x.is_finite() || !entry.y.is_finite() {
                return Err(ChartError::InvalidData(
                    "series entries must be finite".to_owned(),
                ));
            }
        }
        entries.sort_by(|a, b| a.x.total_cmp(&b.x));

        Ok(Self {
            entries,
            stacks: Vec::new(),
            axis: AxisSide::Left,
            visible: true,
            highlight_enabled: true,
        })
    }

    /// Builds a stacked series from `(x, segment values)` pairs.
    ///
    /// Each entry's y becomes the signed sum of its segments; stack ranges
    /// accumulate negatives downward from zero and positives upward.
    pub fn from_stacked(points: Vec<(f64, Vec<f64>)>) -> ChartResult<Self> {
        let mut keyed: Vec<(f64, Vec<f64>)> = points;
        for (x, values) in &keyed {
            if !x.is_finite() || values.iter().any(|v| !v.is_finite()) {
                return Err(ChartError::InvalidData(
                    "stacked series values must be finite".to_owned(),
                ));
            }
            if values.is_empty() {
                return Err(ChartError::InvalidData(
                    "stacked entries need at least one segment".to_owned(),
                ));
            }
        }
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut entries = Vec::with_capacity(keyed.len());
        let mut stacks = Vec::with_capacity(keyed.len());
        for (x, values) in keyed {
            entries.push(Entry::new(x, values.iter().sum()));
            stacks.push(stack_ranges_for(&values));
        }

        Ok(Self {
            entries,
            stacks,
            axis: AxisSide::Left,
            visible: true,
            highlight_enabled: true,
        })
    }

    #[must_use]
    pub fn with_axis(mut self, axis: AxisSide) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_highlight_enabled(mut self, enabled: bool) -> Self {
        self.highlight_enabled = enabled;
        self
    }

    #[must_use]
    pub fn is_stacked(&self) -> bool {
        !self.stacks.is_empty()
    }

    /// Index of the entry closest to `x` under the rounding mode, breaking
    /// equal-x ties toward `closest_to_y`.
    fn closest_index(&self, x: f64, closest_to_y: f64, rounding: Rounding) -> Option<usize> {
        if self.entries.is_empty() || !x.is_finite() {
            return None;
        }

        let first_at_or_above = self.entries.partition_point(|e| e.x < x);
        let below = first_at_or_above.checked_sub(1);
        let at_or_above = (first_at_or_above < self.entries.len()).then_some(first_at_or_above);

        let index = match rounding {
            Rounding::Up => at_or_above.or(below)?,
            Rounding::Down => match at_or_above {
                Some(i) if self.entries[i].x == x => i,
                _ => below.or(at_or_above)?,
            },
            Rounding::Closest => match (below, at_or_above) {
                (Some(lo), Some(hi)) => {
                    if (self.entries[hi].x - x).abs() < (x - self.entries[lo].x).abs() {
                        hi
                    } else {
                        lo
                    }
                }
                (Some(lo), None) => lo,
                (None, Some(hi)) => hi,
                (None, None) => return None,
            },
        };

        Some(self.resolve_y_tie(index, closest_to_y))
    }

    /// Walks the run of entries sharing `entries[index].x` and picks the one
    /// nearest `closest_to_y`. NaN keeps the first entry of the run.
    fn resolve_y_tie(&self, index: usize, closest_to_y: f64) -> usize {
        let x = self.entries[index].x;
        let mut start = index;
        while start > 0 && self.entries[start - 1].x == x {
            start -= 1;
        }

        if closest_to_y.is_nan() {
            return start;
        }

        let mut best = start;
        let mut cursor = start;
        while cursor < self.entries.len() && self.entries[cursor].x == x {
            if (self.entries[cursor].y - closest_to_y).abs()
                < (self.entries[best].y - closest_to_y).abs()
            {
                best = cursor;
            }
            cursor += 1;
        }
        best
    }
}

impl DataSeries for MemorySeries {
    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn entry_for_index(&self, index: usize) -> Option<Entry> {
        self.entries.get(index).copied()
    }

    fn entry_for_x_value(&self, x: f64, closest_to_y: f64, rounding: Rounding) -> Option<Entry> {
        self.closest_index(x, closest_to_y, rounding)
            .map(|i| self.entries[i])
    }

    fn entries_for_x_value(&self, x: f64) -> SmallVec<[Entry; 2]> {
        let mut out = SmallVec::new();
        let start = self.entries.partition_point(|e| e.x < x);
        for entry in &self.entries[start..] {
            if entry.x != x {
                break;
            }
            out.push(*entry);
        }
        out
    }

    fn axis_side(&self) -> AxisSide {
        self.axis
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_highlight_enabled(&self) -> bool {
        self.highlight_enabled
    }

    fn stack_ranges(&self, entry: Entry) -> Option<&[StackRange]> {
        if self.stacks.is_empty() {
            return None;
        }
        let start = self.entries.partition_point(|e| e.x < entry.x);
        if start >= self.entries.len() || self.entries[start].x != entry.x {
            return None;
        }
        Some(&self.stacks[start])
    }

    fn x_min(&self) -> f64 {
        self.entries.first().map_or(f64::INFINITY, |e| e.x)
    }

    fn x_max(&self) -> f64 {
        self.entries.last().map_or(f64::NEG_INFINITY, |e| e.x)
    }

    fn y_min(&self) -> f64 {
        let base = self
            .entries
            .iter()
            .map(|e| e.y)
            .fold(f64::INFINITY, f64::min);
        let stacked = self
            .stacks
            .iter()
            .flat_map(|ranges| ranges.iter().map(|r| r.from))
            .fold(f64::INFINITY, f64::min);
        base.min(stacked)
    }

    fn y_max(&self) -> f64 {
        let base = self
            .entries
            .iter()
            .map(|e| e.y)
            .fold(f64::NEG_INFINITY, f64::max);
        let stacked = self
            .stacks
            .iter()
            .flat_map(|ranges| ranges.iter().map(|r| r.to))
            .fold(f64::NEG_INFINITY, f64::max);
        base.max(stacked)
    }
}

/// Decomposes one stacked entry into segment ranges: negatives fill in from
/// the bottom of the negative sum, positives stack up from zero.
fn stack_ranges_for(values: &[f64]) -> SmallVec<[StackRange; 4]> {
    let negative_sum: f64 = values.iter().filter(|v| **v < 0.0).sum();

    let mut ranges = SmallVec::with_capacity(values.len());
    let mut negative_cursor = negative_sum;
    let mut positive_cursor = 0.0;
    for value in values {
        if *value < 0.0 {
            ranges.push(StackRange::new(negative_cursor, negative_cursor - value));
            negative_cursor -= value;
        } else {
            ranges.push(StackRange::new(positive_cursor, positive_cursor + value));
            positive_cursor += value;
        }
    }
    ranges
}
