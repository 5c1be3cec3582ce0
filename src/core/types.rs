use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Pixel-space rectangle, `top < bottom` in screen orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RectF {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RectF {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Validated constructor used for content rectangles.
    pub fn content(left: f64, top: f64, right: f64, bottom: f64) -> ChartResult<Self> {
        let rect = Self::new(left, top, right, bottom);
        if rect.is_empty() {
            return Err(ChartError::InvalidContentRect {
                left,
                top,
                right,
                bottom,
            });
        }
        Ok(rect)
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        (self.left + self.right) / 2.0
    }

    #[must_use]
    pub fn center_y(self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }

    /// True when the rectangle cannot hold any drawable content.
    #[must_use]
    pub fn is_empty(self) -> bool {
        !self.is_finite() || self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// Layout orientation of a chart.
///
/// `Horizontal` swaps the roles of the pixel axes (bars grow sideways),
/// which changes which pixel delta a drag inversion applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}
