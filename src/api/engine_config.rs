use serde::{Deserialize, Serialize};

use crate::core::{AxisTickConfig, Orientation, RectF};
use crate::error::{ChartError, ChartResult};
use crate::interaction::GestureConfig;

/// Pixel margins between the surface edge and the content rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for EdgeInsets {
    fn default() -> Self {
        Self {
            left: 15.0,
            top: 15.0,
            right: 15.0,
            bottom: 15.0,
        }
    }
}

impl EdgeInsets {
    #[must_use]
    pub fn uniform(inset: f64) -> Self {
        Self {
            left: inset,
            top: inset,
            right: inset,
            bottom: inset,
        }
    }
}

/// Per-side vertical axis setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct AxisConfig {
    /// Flips the axis so larger values draw lower.
    #[serde(default)]
    pub inverted: bool,
    #[serde(default)]
    pub ticks: AxisTickConfig,
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub insets: EdgeInsets,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub left_axis: AxisConfig,
    #[serde(default)]
    pub right_axis: AxisConfig,
    #[serde(default)]
    pub x_ticks: AxisTickConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default = "default_max_highlight_distance")]
    pub max_highlight_distance_px: f64,
    /// Move the selection while the finger slides and panning is not
    /// meaningful (fully zoomed out or dragging disabled).
    #[serde(default = "default_highlight_per_drag")]
    pub highlight_per_drag: bool,
}

impl ChartEngineConfig {
    /// Creates a config for a surface of the given pixel size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            insets: EdgeInsets::default(),
            orientation: Orientation::default(),
            left_axis: AxisConfig::default(),
            right_axis: AxisConfig::default(),
            x_ticks: AxisTickConfig::default(),
            gesture: GestureConfig::default(),
            max_highlight_distance_px: default_max_highlight_distance(),
            highlight_per_drag: default_highlight_per_drag(),
        }
    }

    #[must_use]
    pub fn with_insets(mut self, insets: EdgeInsets) -> Self {
        self.insets = insets;
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_left_axis(mut self, axis: AxisConfig) -> Self {
        self.left_axis = axis;
        self
    }

    #[must_use]
    pub fn with_right_axis(mut self, axis: AxisConfig) -> Self {
        self.right_axis = axis;
        self
    }

    #[must_use]
    pub fn with_x_ticks(mut self, ticks: AxisTickConfig) -> Self {
        self.x_ticks = ticks;
        self
    }

    #[must_use]
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    #[must_use]
    pub fn with_max_highlight_distance_px(mut self, distance: f64) -> Self {
        self.max_highlight_distance_px = distance;
        self
    }

    #[must_use]
    pub fn with_highlight_per_drag(mut self, enabled: bool) -> Self {
        self.highlight_per_drag = enabled;
        self
    }

    /// Content rectangle left after applying the insets.
    pub fn content_rect(&self) -> ChartResult<RectF> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(ChartError::InvalidData(
                "surface size must be finite".to_owned(),
            ));
        }
        RectF::content(
            self.insets.left,
            self.insets.top,
            self.width - self.insets.right,
            self.height - self.insets.bottom,
        )
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_max_highlight_distance() -> f64 {
    500.0
}

fn default_highlight_per_drag() -> bool {
    true
}
