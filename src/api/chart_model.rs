use std::fmt;

use indexmap::IndexMap;

use crate::core::series::{AxisSide, DataSeries};

/// Insertion-ordered series registry.
///
/// Order matters: highlight results report a series by its position here,
/// and renderers draw in the same order.
#[derive(Default)]
pub struct ChartModel {
    series: IndexMap<String, Box<dyn DataSeries>>,
}

impl ChartModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a series under the given id.
    pub fn insert_series(&mut self, id: impl Into<String>, series: Box<dyn DataSeries>) {
        self.series.insert(id.into(), series);
    }

    /// Removes a series; returns whether it existed. Keeps the relative
    /// order of the remaining series.
    pub fn remove_series(&mut self, id: &str) -> bool {
        self.series.shift_remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    #[must_use]
    pub fn series_at(&self, index: usize) -> Option<&dyn DataSeries> {
        self.series.get_index(index).map(|(_, s)| s.as_ref())
    }

    #[must_use]
    pub fn series_by_id(&self, id: &str) -> Option<&dyn DataSeries> {
        self.series.get(id).map(Box::as_ref)
    }

    /// Series references in registry order, for highlight queries.
    #[must_use]
    pub fn ordered_series(&self) -> Vec<&dyn DataSeries> {
        self.series.values().map(Box::as_ref).collect()
    }

    /// Combined x extent over visible series.
    #[must_use]
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for set in self.series.values().filter(|s| s.is_visible()) {
            if set.entry_count() == 0 {
                continue;
            }
            min = min.min(set.x_min());
            max = max.max(set.x_max());
        }
        (min <= max).then_some((min, max))
    }

    /// Combined y extent over visible series on one axis side.
    ///
    /// A side with no series borrows the other side's extent so its axis
    /// still lays out instead of collapsing.
    #[must_use]
    pub fn y_bounds(&self, axis: AxisSide) -> Option<(f64, f64)> {
        self.y_bounds_strict(axis).or_else(|| {
            let other = match axis {
                AxisSide::Left => AxisSide::Right,
                AxisSide::Right => AxisSide::Left,
            };
            self.y_bounds_strict(other)
        })
    }

    fn y_bounds_strict(&self, axis: AxisSide) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for set in self
            .series
            .values()
            .filter(|s| s.is_visible() && s.axis_side() == axis)
        {
            if set.entry_count() == 0 {
                continue;
            }
            min = min.min(set.y_min());
            max = max.max(set.y_max());
        }
        (min <= max).then_some((min, max))
    }
}

impl fmt::Debug for ChartModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (id, series) in &self.series {
            map.entry(&id, &series.entry_count());
        }
        map.finish()
    }
}
