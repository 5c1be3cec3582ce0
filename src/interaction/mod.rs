use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Orientation;

mod gesture;
mod rotation;
mod velocity;

pub use gesture::{GestureConfig, GestureHandler, GestureMode, MoveAction, ReleaseAction};
pub use rotation::RotationGestureHandler;
pub use velocity::VelocityTracker;

/// One touching pointer, in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    #[must_use]
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// One host input event.
///
/// `pointers` lists every pointer touching the surface after the event:
/// a `Down` event includes the new pointer, an `Up` event only the ones
/// still in contact (empty when the last finger lifts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub pointers: SmallVec<[TouchPoint; 2]>,
    /// Event time in seconds; the velocity tracker and fling stepping only
    /// use differences, so any monotonic clock works.
    pub timestamp_s: f64,
}

impl TouchEvent {
    #[must_use]
    pub fn new(phase: TouchPhase, pointers: &[TouchPoint], timestamp_s: f64) -> Self {
        Self {
            phase,
            pointers: SmallVec::from_slice(pointers),
            timestamp_s,
        }
    }

    #[must_use]
    pub fn primary(&self) -> Option<TouchPoint> {
        self.pointers.first().copied()
    }
}

/// Per-gesture drag behavior, resolved by the chart when a touch sequence
/// starts from the series nearest to the touch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DragContext {
    pub orientation: Orientation,
    /// True when the touched series sits on an inverted axis (or, with no
    /// touched series, when any axis is inverted). Horizontal charts then
    /// flip the x delta, all others the y delta, so "up" keeps feeling
    /// like "up".
    pub invert_drag: bool,
}

/// Tuning for post-release deceleration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlingConfig {
    /// Multiplicative velocity decay per second.
    pub decay_per_second: f64,
    /// Deceleration stops when velocity magnitude drops below this.
    pub stop_velocity_abs: f64,
    /// Release velocity (px/s) needed to start a fling at all.
    pub min_start_velocity: f64,
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            decay_per_second: 0.85,
            stop_velocity_abs: 0.01,
            min_start_velocity: 50.0,
        }
    }
}
