use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::series::{AxisSide, DataSeries, Entry, Rounding};
use crate::core::transformer::Transformer;
use crate::core::viewport::ViewportState;

/// The currently selected data point.
///
/// Carries both value-space and pixel-space coordinates so marker views can
/// position themselves without re-deriving the transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub x: f64,
    pub y: f64,
    pub pixel_x: f64,
    pub pixel_y: f64,
    pub series_index: usize,
    pub axis: AxisSide,
    /// Segment within a stacked entry, when the touch resolved into one.
    #[serde(default)]
    pub stack_index: Option<usize>,
    /// Sub-chart index for composite (combined) charts; the host assigns it
    /// when it multiplexes several series collections into one surface.
    #[serde(default)]
    pub composite_index: Option<usize>,
}

impl Highlight {
    /// Same data point, ignoring pixel coordinates. Used to make tapping a
    /// selected point toggle it off even after the transform moved.
    #[must_use]
    pub fn same_point(&self, other: &Highlight) -> bool {
        self.series_index == other.series_index
            && self.x == other.x
            && self.stack_index == other.stack_index
            && self.composite_index == other.composite_index
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    entry: Entry,
    pixel_x: f64,
    pixel_y: f64,
    series_index: usize,
    axis: AxisSide,
}

/// Maps a pixel touch point back to the nearest data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Highlighter {
    /// Candidates farther than this many pixels are rejected.
    pub max_distance_px: f64,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self {
            max_distance_px: 500.0,
        }
    }
}

impl Highlighter {
    #[must_use]
    pub fn new(max_distance_px: f64) -> Self {
        Self { max_distance_px }
    }

    /// Finds the closest entry to a touch point, or `None` when no visible
    /// highlight-enabled series has a candidate in range.
    ///
    /// Touches outside the content rectangle are processed like any other;
    /// hosts that want rejection gate on containment before calling.
    #[must_use]
    pub fn locate(
        &self,
        pixel_x: f64,
        pixel_y: f64,
        series: &[&dyn DataSeries],
        left: &Transformer,
        right: &Transformer,
        viewport: &ViewportState,
    ) -> Option<Highlight> {
        // The x axis is shared across both sides, so either inverse works
        // for the x component.
        let (touch_x, _) = left.pixel_to_value(viewport, pixel_x, pixel_y);

        let candidates = self.gather_candidates(touch_x, series, left, right, viewport);
        if candidates.is_empty() {
            return None;
        }

        let axis = closest_axis_side(&candidates, pixel_y);

        let best = candidates
            .iter()
            .filter(|candidate| candidate.axis == axis)
            .min_by_key(|candidate| {
                OrderedFloat((candidate.pixel_x - pixel_x).hypot(candidate.pixel_y - pixel_y))
            })?;
        let distance = (best.pixel_x - pixel_x).hypot(best.pixel_y - pixel_y);
        if distance > self.max_distance_px {
            return None;
        }

        let transformer = transformer_for(axis, left, right);
        Some(self.resolve_stack(*best, pixel_x, pixel_y, series, transformer, viewport))
    }

    fn gather_candidates(
        &self,
        touch_x: f64,
        series: &[&dyn DataSeries],
        left: &Transformer,
        right: &Transformer,
        viewport: &ViewportState,
    ) -> SmallVec<[Candidate; 8]> {
        let mut candidates: SmallVec<[Candidate; 8]> = SmallVec::new();

        for (series_index, set) in series.iter().enumerate() {
            if !set.is_visible() || !set.is_highlight_enabled() {
                continue;
            }

            let mut entries = set.entries_for_x_value(touch_x);
            if entries.is_empty() {
                // No exact hit: resolve the neighbor x on both sides, then
                // take every entry sharing those x values (grouped data has
                // several entries per x).
                for rounding in [Rounding::Up, Rounding::Down] {
                    let Some(closest) = set.entry_for_x_value(touch_x, f64::NAN, rounding) else {
                        continue;
                    };
                    for entry in set.entries_for_x_value(closest.x) {
                        if !entries.contains(&entry) {
                            entries.push(entry);
                        }
                    }
                }
            }

            let axis = set.axis_side();
            let transformer = transformer_for(axis, left, right);
            for entry in entries {
                let (pixel_x, pixel_y) = transformer.point_to_pixel(viewport, entry.x, entry.y);
                candidates.push(Candidate {
                    entry,
                    pixel_x,
                    pixel_y,
                    series_index,
                    axis,
                });
            }
        }

        candidates
    }

    /// Narrows a winning stacked-entry candidate to the touched segment.
    fn resolve_stack(
        &self,
        candidate: Candidate,
        pixel_x: f64,
        pixel_y: f64,
        series: &[&dyn DataSeries],
        transformer: &Transformer,
        viewport: &ViewportState,
    ) -> Highlight {
        let base = Highlight {
            x: candidate.entry.x,
            y: candidate.entry.y,
            pixel_x: candidate.pixel_x,
            pixel_y: candidate.pixel_y,
            series_index: candidate.series_index,
            axis: candidate.axis,
            stack_index: None,
            composite_index: None,
        };

        let Some(ranges) = series[candidate.series_index].stack_ranges(candidate.entry) else {
            return base;
        };
        if ranges.is_empty() {
            return base;
        }

        let (_, touch_y) = transformer.pixel_to_value(viewport, pixel_x, pixel_y);
        let stack_index = if touch_y > ranges[ranges.len() - 1].to {
            ranges.len() - 1
        } else {
            ranges
                .iter()
                .position(|range| range.contains(touch_y))
                .unwrap_or(0)
        };

        let (pixel_x, pixel_y) =
            transformer.point_to_pixel(viewport, candidate.entry.x, ranges[stack_index].to);
        Highlight {
            pixel_x,
            pixel_y,
            stack_index: Some(stack_index),
            ..base
        }
    }
}

/// Whichever side holds the candidate with the smaller vertical distance
/// competes for the final pick; this keeps left- and right-axis series fair
/// when their value ranges differ wildly.
fn closest_axis_side(candidates: &[Candidate], pixel_y: f64) -> AxisSide {
    let min_for = |axis: AxisSide| {
        candidates
            .iter()
            .filter(|candidate| candidate.axis == axis)
            .map(|candidate| OrderedFloat((candidate.pixel_y - pixel_y).abs()))
            .min()
    };

    match (min_for(AxisSide::Left), min_for(AxisSide::Right)) {
        (Some(left), Some(right)) if right < left => AxisSide::Right,
        (None, Some(_)) => AxisSide::Right,
        _ => AxisSide::Left,
    }
}

fn transformer_for<'a>(
    axis: AxisSide,
    left: &'a Transformer,
    right: &'a Transformer,
) -> &'a Transformer {
    match axis {
        AxisSide::Left => left,
        AxisSide::Right => right,
    }
}
