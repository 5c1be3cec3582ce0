use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::matrix::AffineMatrix;
use crate::core::types::RectF;

/// Owner of the pan/zoom transform and its limit bookkeeping.
///
/// All mutation funnels through [`ViewportState::commit`], which drops
/// candidate matrices containing non-finite values and clamps scale and
/// translation so the mapped data range cannot leave the content bounds.
/// The raw matrix is only readable; there is no direct assignment path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    content: RectF,
    matrix: AffineMatrix,
    min_scale_x: f64,
    max_scale_x: f64,
    min_scale_y: f64,
    max_scale_y: f64,
}

impl ViewportState {
    #[must_use]
    pub fn new(content: RectF) -> Self {
        Self {
            content,
            matrix: AffineMatrix::identity(),
            min_scale_x: 1.0,
            max_scale_x: f64::MAX,
            min_scale_y: 1.0,
            max_scale_y: f64::MAX,
        }
    }

    #[must_use]
    pub fn content_rect(&self) -> RectF {
        self.content
    }

    /// Replaces the content rectangle and re-clamps the current transform
    /// against the new bounds.
    pub fn set_content_rect(&mut self, content: RectF) {
        self.content = content;
        let current = self.matrix;
        self.commit(current);
    }

    /// Read-only view of the pan/zoom matrix.
    #[must_use]
    pub fn matrix(&self) -> AffineMatrix {
        self.matrix
    }

    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.matrix.sx
    }

    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.matrix.sy
    }

    #[must_use]
    pub fn trans_x(&self) -> f64 {
        self.matrix.tx
    }

    #[must_use]
    pub fn trans_y(&self) -> f64 {
        self.matrix.ty
    }

    /// Sets absolute scale factors, pivoting at the content center.
    ///
    /// Scroll position only changes as far as re-pivoting implies.
    pub fn set_zoom(&mut self, scale_x: f64, scale_y: f64) -> AffineMatrix {
        let factor_x = if self.matrix.sx != 0.0 {
            scale_x / self.matrix.sx
        } else {
            scale_x
        };
        let factor_y = if self.matrix.sy != 0.0 {
            scale_y / self.matrix.sy
        } else {
            scale_y
        };
        self.zoom_by(
            factor_x,
            factor_y,
            self.content.center_x(),
            self.content.center_y(),
        )
    }

    /// Multiplies the current scale around an arbitrary screen-pixel pivot.
    pub fn zoom_by(
        &mut self,
        factor_x: f64,
        factor_y: f64,
        pivot_x: f64,
        pivot_y: f64,
    ) -> AffineMatrix {
        let origin = self.matrix;
        self.zoom_from(&origin, factor_x, factor_y, pivot_x, pivot_y)
    }

    /// Scales from a saved gesture checkpoint around a screen-pixel pivot.
    pub fn zoom_from(
        &mut self,
        origin: &AffineMatrix,
        factor_x: f64,
        factor_y: f64,
        pivot_x: f64,
        pivot_y: f64,
    ) -> AffineMatrix {
        let (px, py) = self.pan_space_pivot(pivot_x, pivot_y, false);
        self.zoom_from_pivot(origin, factor_x, factor_y, px, py)
    }

    /// Scales from a checkpoint around a pivot already in pan space.
    ///
    /// Gesture code converts screen pivots itself (the conversion depends on
    /// the touched axis's inversion); everything else goes through
    /// [`ViewportState::zoom_by`] / [`ViewportState::zoom_from`].
    pub fn zoom_from_pivot(
        &mut self,
        origin: &AffineMatrix,
        factor_x: f64,
        factor_y: f64,
        pivot_x: f64,
        pivot_y: f64,
    ) -> AffineMatrix {
        let candidate = origin.then_scale_about(factor_x, factor_y, pivot_x, pivot_y);
        self.commit(candidate)
    }

    /// Converts a screen pixel into the pan/zoom matrix's own coordinate
    /// space, which sits before the margin-offset stage: origin at the
    /// content bottom-left (top-left for inverted axes), y growing upward
    /// as negative.
    #[must_use]
    pub fn pan_space_pivot(&self, pixel_x: f64, pixel_y: f64, inverted: bool) -> (f64, f64) {
        let x = pixel_x - self.content.left;
        let y = if inverted {
            self.content.top - pixel_y
        } else {
            pixel_y - self.content.bottom
        };
        (x, y)
    }

    /// Pans by a pixel delta from the live matrix.
    pub fn translate(&mut self, dx: f64, dy: f64) -> AffineMatrix {
        let origin = self.matrix;
        self.pan_from(&origin, dx, dy)
    }

    /// Pans by a cumulative pixel delta from a saved gesture checkpoint.
    pub fn pan_from(&mut self, origin: &AffineMatrix, dx: f64, dy: f64) -> AffineMatrix {
        let candidate = origin.then_translate(dx, dy);
        self.commit(candidate)
    }

    /// Fits the content exactly (scale back to the minimum, no pan).
    pub fn reset_zoom(&mut self) -> AffineMatrix {
        self.commit(AffineMatrix::scaling(self.min_scale_x, self.min_scale_y))
    }

    pub fn set_minimum_scale_x(&mut self, scale: f64) {
        self.min_scale_x = sanitize_min_scale(scale);
        let current = self.matrix;
        self.commit(current);
    }

    pub fn set_minimum_scale_y(&mut self, scale: f64) {
        self.min_scale_y = sanitize_min_scale(scale);
        let current = self.matrix;
        self.commit(current);
    }

    pub fn set_maximum_scale_x(&mut self, scale: f64) {
        self.max_scale_x = sanitize_max_scale(scale, self.min_scale_x);
        let current = self.matrix;
        self.commit(current);
    }

    pub fn set_maximum_scale_y(&mut self, scale: f64) {
        self.max_scale_y = sanitize_max_scale(scale, self.min_scale_y);
        let current = self.matrix;
        self.commit(current);
    }

    pub fn set_scale_limits_x(&mut self, min: f64, max: f64) {
        self.min_scale_x = sanitize_min_scale(min);
        self.max_scale_x = sanitize_max_scale(max, self.min_scale_x);
        let current = self.matrix;
        self.commit(current);
    }

    pub fn set_scale_limits_y(&mut self, min: f64, max: f64) {
        self.min_scale_y = sanitize_min_scale(min);
        self.max_scale_y = sanitize_max_scale(max, self.min_scale_y);
        let current = self.matrix;
        self.commit(current);
    }

    #[must_use]
    pub fn can_zoom_in_more_x(&self) -> bool {
        self.matrix.sx < self.max_scale_x
    }

    #[must_use]
    pub fn can_zoom_out_more_x(&self) -> bool {
        self.matrix.sx > self.min_scale_x
    }

    #[must_use]
    pub fn can_zoom_in_more_y(&self) -> bool {
        self.matrix.sy < self.max_scale_y
    }

    #[must_use]
    pub fn can_zoom_out_more_y(&self) -> bool {
        self.matrix.sy > self.min_scale_y
    }

    #[must_use]
    pub fn is_fully_zoomed_out_x(&self) -> bool {
        self.matrix.sx <= self.min_scale_x
    }

    #[must_use]
    pub fn is_fully_zoomed_out_y(&self) -> bool {
        self.matrix.sy <= self.min_scale_y
    }

    #[must_use]
    pub fn is_fully_zoomed_out(&self) -> bool {
        self.is_fully_zoomed_out_x() && self.is_fully_zoomed_out_y()
    }

    /// Clamps and installs a candidate transform.
    ///
    /// A candidate carrying NaN or infinity leaves the previous matrix in
    /// place: one bad frame of input must never blank the chart.
    fn commit(&mut self, candidate: AffineMatrix) -> AffineMatrix {
        if !candidate.is_finite() {
            warn!(?candidate, "rejecting non-finite pan/zoom matrix");
            return self.matrix;
        }

        let mut next = candidate;
        next.sx = next.sx.clamp(self.min_scale_x, self.max_scale_x);
        next.sy = next.sy.clamp(self.min_scale_y, self.max_scale_y);

        let max_trans_x = (self.content.width() * (next.sx - 1.0)).max(0.0);
        let max_trans_y = (self.content.height() * (next.sy - 1.0)).max(0.0);
        next.tx = next.tx.clamp(-max_trans_x, 0.0);
        next.ty = next.ty.clamp(0.0, max_trans_y);

        self.matrix = next;
        self.matrix
    }
}

fn sanitize_min_scale(scale: f64) -> f64 {
    if !scale.is_finite() || scale < 1.0 {
        1.0
    } else {
        scale
    }
}

fn sanitize_max_scale(scale: f64, min_scale: f64) -> f64 {
    if !scale.is_finite() || scale < min_scale {
        f64::MAX
    } else {
        scale
    }
}
