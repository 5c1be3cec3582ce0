use serde::{Deserialize, Serialize};

use crate::core::types::RectF;

/// 2D affine transform, row-major `[sx kx tx / ky sy ty]`.
///
/// `apply` maps `(x, y)` to `(sx*x + kx*y + tx, ky*x + sy*y + ty)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineMatrix {
    pub sx: f64,
    pub kx: f64,
    pub tx: f64,
    pub ky: f64,
    pub sy: f64,
    pub ty: f64,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineMatrix {
    #[must_use]
    pub fn identity() -> Self {
        Self {
            sx: 1.0,
            kx: 0.0,
            tx: 0.0,
            ky: 0.0,
            sy: 1.0,
            ty: 0.0,
        }
    }

    #[must_use]
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            tx: dx,
            ty: dy,
            ..Self::identity()
        }
    }

    #[must_use]
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            sx,
            sy,
            ..Self::identity()
        }
    }

    /// Composes `self` applied first, then `next`.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            sx: next.sx * self.sx + next.kx * self.ky,
            kx: next.sx * self.kx + next.kx * self.sy,
            tx: next.sx * self.tx + next.kx * self.ty + next.tx,
            ky: next.ky * self.sx + next.sy * self.ky,
            sy: next.ky * self.kx + next.sy * self.sy,
            ty: next.ky * self.tx + next.sy * self.ty + next.ty,
        }
    }

    #[must_use]
    pub fn then_translate(self, dx: f64, dy: f64) -> Self {
        self.then(Self::translation(dx, dy))
    }

    #[must_use]
    pub fn then_scale(self, sx: f64, sy: f64) -> Self {
        self.then(Self::scaling(sx, sy))
    }

    /// Scales around an arbitrary pivot point, in post-transform coordinates.
    #[must_use]
    pub fn then_scale_about(self, sx: f64, sy: f64, pivot_x: f64, pivot_y: f64) -> Self {
        self.then(Self::translation(-pivot_x, -pivot_y))
            .then(Self::scaling(sx, sy))
            .then(Self::translation(pivot_x, pivot_y))
    }

    /// Returns the inverse transform, or `None` when the matrix is singular
    /// or contains non-finite values.
    #[must_use]
    pub fn invert(self) -> Option<Self> {
        if !self.is_finite() {
            return None;
        }

        let det = self.sx * self.sy - self.kx * self.ky;
        if !det.is_finite() || det == 0.0 {
            return None;
        }

        Some(Self {
            sx: self.sy / det,
            kx: -self.kx / det,
            tx: (self.kx * self.ty - self.sy * self.tx) / det,
            ky: -self.ky / det,
            sy: self.sx / det,
            ty: (self.ky * self.tx - self.sx * self.ty) / det,
        })
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.sx.is_finite()
            && self.kx.is_finite()
            && self.tx.is_finite()
            && self.ky.is_finite()
            && self.sy.is_finite()
            && self.ty.is_finite()
    }

    #[must_use]
    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        (
            self.sx * x + self.kx * y + self.tx,
            self.ky * x + self.sy * y + self.ty,
        )
    }

    /// Maps a flat `[x0, y0, x1, y1, ...]` buffer in place.
    ///
    /// A trailing unpaired element is left untouched.
    pub fn map_points(self, points: &mut [f64]) {
        for pair in points.chunks_exact_mut(2) {
            let (x, y) = self.apply(pair[0], pair[1]);
            pair[0] = x;
            pair[1] = y;
        }
    }

    /// Maps an axis-aligned rectangle in place, renormalizing edge order so
    /// the result stays well-formed under negative scale factors.
    pub fn map_rect(self, rect: &mut RectF) {
        let (x0, y0) = self.apply(rect.left, rect.top);
        let (x1, y1) = self.apply(rect.right, rect.bottom);
        rect.left = x0.min(x1);
        rect.right = x0.max(x1);
        rect.top = y0.min(y1);
        rect.bottom = y0.max(y1);
    }
}

#[cfg(test)]
mod tests {
    use super::AffineMatrix;

    #[test]
    fn composition_applies_left_operand_first() {
        let m = AffineMatrix::translation(1.0, 0.0).then(AffineMatrix::scaling(2.0, 2.0));
        assert_eq!(m.apply(1.0, 3.0), (4.0, 6.0));

        let m = AffineMatrix::scaling(2.0, 2.0).then(AffineMatrix::translation(1.0, 0.0));
        assert_eq!(m.apply(1.0, 3.0), (3.0, 6.0));
    }

    #[test]
    fn inverse_round_trips_points() {
        let m = AffineMatrix::translation(-3.0, 7.0)
            .then(AffineMatrix::scaling(2.5, -0.5))
            .then(AffineMatrix::translation(11.0, -2.0));
        let inv = m.invert().expect("invertible");

        let (px, py) = m.apply(42.0, -17.5);
        let (x, y) = inv.apply(px, py);
        assert!((x - 42.0).abs() <= 1e-9);
        assert!((y + 17.5).abs() <= 1e-9);
    }

    #[test]
    fn singular_and_non_finite_matrices_do_not_invert() {
        assert!(AffineMatrix::scaling(0.0, 1.0).invert().is_none());
        assert!(AffineMatrix::translation(f64::NAN, 0.0).invert().is_none());
    }

    #[test]
    fn scale_about_pivot_keeps_pivot_fixed() {
        let m = AffineMatrix::identity().then_scale_about(3.0, 3.0, 10.0, 20.0);
        assert_eq!(m.apply(10.0, 20.0), (10.0, 20.0));
        assert_eq!(m.apply(11.0, 20.0), (13.0, 20.0));
    }
}
