use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-transform")]
use rayon::prelude::*;

use crate::core::matrix::AffineMatrix;
use crate::core::series::DataSeries;
use crate::core::types::RectF;
use crate::core::viewport::ViewportState;

/// Maps between value space and pixel space.
///
/// The full forward pipeline is `value -> pan/zoom -> offset`; inversion
/// applies each matrix's own inverse in the exact reverse order. The
/// pan/zoom matrix is read from [`ViewportState`] at call time, so gesture
/// updates are visible to the very next mapping without shared ownership.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Transformer {
    value_matrix: AffineMatrix,
    offset_matrix: AffineMatrix,
}

impl Transformer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the value-normalization matrix from the axis ranges.
    ///
    /// The y scale is negated: value y grows upward, pixel y grows downward.
    /// A zero or non-finite range degenerates to zero scale so the chart
    /// stays drawable instead of dividing by zero.
    pub fn prepare_value_matrix(
        &mut self,
        viewport: &ViewportState,
        x_min: f64,
        x_range: f64,
        y_min: f64,
        y_range: f64,
    ) {
        let content = viewport.content_rect();
        let mut scale_x = content.width() / x_range;
        let mut scale_y = content.height() / y_range;
        if !scale_x.is_finite() {
            scale_x = 0.0;
        }
        if !scale_y.is_finite() {
            scale_y = 0.0;
        }

        self.value_matrix =
            AffineMatrix::translation(-x_min, -y_min).then(AffineMatrix::scaling(scale_x, -scale_y));
    }

    /// Rebuilds the margin-offset matrix.
    ///
    /// The `inverted` branch flips the y sign and anchors at the opposite
    /// content edge; this single conditional serves flipped axes and
    /// horizontal-orientation charts alike.
    pub fn prepare_offset_matrix(&mut self, viewport: &ViewportState, inverted: bool) {
        let content = viewport.content_rect();
        self.offset_matrix = if inverted {
            AffineMatrix::scaling(1.0, -1.0)
                .then(AffineMatrix::translation(content.left, content.top))
        } else {
            AffineMatrix::translation(content.left, content.bottom)
        };
    }

    #[must_use]
    pub fn value_matrix(&self) -> AffineMatrix {
        self.value_matrix
    }

    #[must_use]
    pub fn offset_matrix(&self) -> AffineMatrix {
        self.offset_matrix
    }

    /// Value -> pixel mapping of a flat `[x0, y0, x1, y1, ...]` buffer.
    pub fn points_to_pixel(&self, viewport: &ViewportState, points: &mut [f64]) {
        self.value_matrix.map_points(points);
        viewport.matrix().map_points(points);
        self.offset_matrix.map_points(points);
    }

    /// Pixel -> value mapping, inverting each stage separately to keep
    /// precision under extreme zoom.
    pub fn pixels_to_value(&self, viewport: &ViewportState, points: &mut [f64]) {
        invert_or_identity(self.offset_matrix).map_points(points);
        invert_or_identity(viewport.matrix()).map_points(points);
        invert_or_identity(self.value_matrix).map_points(points);
    }

    #[must_use]
    pub fn point_to_pixel(&self, viewport: &ViewportState, x: f64, y: f64) -> (f64, f64) {
        let mut buffer = [x, y];
        self.points_to_pixel(viewport, &mut buffer);
        (buffer[0], buffer[1])
    }

    #[must_use]
    pub fn pixel_to_value(&self, viewport: &ViewportState, pixel_x: f64, pixel_y: f64) -> (f64, f64) {
        let mut buffer = [pixel_x, pixel_y];
        self.pixels_to_value(viewport, &mut buffer);
        (buffer[0], buffer[1])
    }

    /// Value -> pixel mapping of an axis-aligned rectangle.
    pub fn rect_to_pixel(&self, viewport: &ViewportState, rect: &mut RectF) {
        self.value_matrix.map_rect(rect);
        viewport.matrix().map_rect(rect);
        self.offset_matrix.map_rect(rect);
    }

    /// Rectangle mapping with an entry animation phase applied to the value
    /// edges before mapping. Phase is transient draw state, never part of
    /// the persistent transform.
    pub fn rect_to_pixel_with_phase(&self, viewport: &ViewportState, rect: &mut RectF, phase_y: f64) {
        rect.top *= phase_y;
        rect.bottom *= phase_y;
        self.rect_to_pixel(viewport, rect);
    }

    /// Bulk transform of a contiguous entry range into a flat pixel buffer.
    ///
    /// `phase_x` shortens the emitted range, `phase_y` scales each y before
    /// mapping; both are in `[0, 1]`.
    #[must_use]
    pub fn generate_transformed_values(
        &self,
        viewport: &ViewportState,
        series: &dyn DataSeries,
        phase_x: f64,
        phase_y: f64,
        from_index: usize,
        to_index: usize,
    ) -> Vec<f64> {
        let last_index = series.entry_count().saturating_sub(1);
        if series.entry_count() == 0 || to_index < from_index || from_index > last_index {
            return Vec::new();
        }

        let span = to_index.min(last_index) - from_index;
        let count = ((span as f64 * phase_x.clamp(0.0, 1.0)) as usize) + 1;

        let mut buffer = Vec::with_capacity(count * 2);
        for offset in 0..count {
            match series.entry_for_index(from_index + offset) {
                Some(entry) => {
                    buffer.push(entry.x);
                    buffer.push(entry.y * phase_y);
                }
                None => break,
            }
        }

        let combined = self
            .value_matrix
            .then(viewport.matrix())
            .then(self.offset_matrix);

        #[cfg(feature = "parallel-transform")]
        {
            buffer.par_chunks_exact_mut(2).for_each(|pair| {
                let (x, y) = combined.apply(pair[0], pair[1]);
                pair[0] = x;
                pair[1] = y;
            });
        }

        #[cfg(not(feature = "parallel-transform"))]
        {
            combined.map_points(&mut buffer);
        }

        buffer
    }
}

fn invert_or_identity(matrix: AffineMatrix) -> AffineMatrix {
    matrix.invert().unwrap_or_else(AffineMatrix::identity)
}

#[cfg(test)]
mod tests {
    use super::Transformer;
    use crate::core::types::RectF;
    use crate::core::viewport::ViewportState;

    #[test]
    fn degenerate_range_maps_without_dividing_by_zero() {
        let viewport = ViewportState::new(RectF::new(0.0, 0.0, 800.0, 400.0));
        let mut transformer = Transformer::new();
        transformer.prepare_value_matrix(&viewport, 0.0, 0.0, 0.0, 0.0);
        transformer.prepare_offset_matrix(&viewport, false);

        let (px, py) = transformer.point_to_pixel(&viewport, 123.0, 456.0);
        assert!(px.is_finite());
        assert!(py.is_finite());
    }

    #[test]
    fn inverted_offset_mirrors_vertical_mapping() {
        let viewport = ViewportState::new(RectF::new(0.0, 0.0, 100.0, 100.0));
        let mut normal = Transformer::new();
        normal.prepare_value_matrix(&viewport, 0.0, 10.0, 0.0, 10.0);
        normal.prepare_offset_matrix(&viewport, false);

        let mut inverted = Transformer::new();
        inverted.prepare_value_matrix(&viewport, 0.0, 10.0, 0.0, 10.0);
        inverted.prepare_offset_matrix(&viewport, true);

        let (_, y_normal) = normal.point_to_pixel(&viewport, 0.0, 0.0);
        let (_, y_inverted) = inverted.point_to_pixel(&viewport, 0.0, 0.0);
        assert_eq!(y_normal, 100.0);
        assert_eq!(y_inverted, 0.0);
    }

    #[test]
    fn inverted_offset_anchors_at_the_top_edge_with_insets() {
        let viewport = ViewportState::new(RectF::new(10.0, 20.0, 110.0, 220.0));
        let mut inverted = Transformer::new();
        inverted.prepare_value_matrix(&viewport, 0.0, 10.0, 0.0, 10.0);
        inverted.prepare_offset_matrix(&viewport, true);

        let (x, y_min) = inverted.point_to_pixel(&viewport, 0.0, 0.0);
        let (_, y_max) = inverted.point_to_pixel(&viewport, 0.0, 10.0);
        assert_eq!(x, 10.0);
        assert_eq!(y_min, 20.0);
        assert_eq!(y_max, 220.0);
    }
}
