use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::interaction::FlingConfig;
use crate::interaction::gesture::GestureMode;

/// Samples older than this no longer describe the current spin.
const SAMPLE_WINDOW_S: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
struct AngleSample {
    timestamp_s: f64,
    angle_deg: f64,
}

/// Single-finger rotation listener for radial charts.
///
/// The linear-chart pan/zoom machine never enters `Rotate`; radial charts
/// route their touch sequences here instead, reusing the same deceleration
/// shape as the linear fling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationGestureHandler {
    center_x: f64,
    center_y: f64,
    rotation_deg: f64,
    /// Raw touch angle minus chart rotation at gesture start; dragging
    /// preserves this offset so the wheel follows the finger.
    start_offset_deg: f64,
    dragging: bool,
    #[serde(skip)]
    samples: SmallVec<[AngleSample; 16]>,
    spin_velocity_deg: f64,
    spin_last_time_s: f64,
    spin_active: bool,
    fling: FlingConfig,
}

impl RotationGestureHandler {
    #[must_use]
    pub fn new(center_x: f64, center_y: f64, fling: FlingConfig) -> Self {
        Self {
            center_x,
            center_y,
            rotation_deg: 0.0,
            start_offset_deg: 0.0,
            dragging: false,
            samples: SmallVec::new(),
            spin_velocity_deg: 0.0,
            spin_last_time_s: 0.0,
            spin_active: false,
            fling,
        }
    }

    pub fn set_center(&mut self, x: f64, y: f64) {
        self.center_x = x;
        self.center_y = y;
    }

    #[must_use]
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    #[must_use]
    pub fn mode(&self) -> GestureMode {
        if self.dragging {
            GestureMode::Rotate
        } else {
            GestureMode::None
        }
    }

    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.spin_active
    }

    /// Angle of a touch point around the chart center, degrees in `[0, 360)`
    /// growing clockwise from the top.
    #[must_use]
    pub fn touch_angle_deg(&self, x: f64, y: f64) -> f64 {
        let angle = (y - self.center_y).atan2(x - self.center_x).to_degrees() + 90.0;
        angle.rem_euclid(360.0)
    }

    pub fn on_pointer_down(&mut self, x: f64, y: f64, timestamp_s: f64) {
        self.stop_spin();
        self.start_offset_deg = self.touch_angle_deg(x, y) - self.rotation_deg;
        self.dragging = true;
        self.samples.clear();
        self.push_sample(timestamp_s, x, y);
        trace!(rotation = self.rotation_deg, "rotation gesture started");
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64, timestamp_s: f64) {
        if !self.dragging {
            return;
        }
        self.push_sample(timestamp_s, x, y);
        self.rotation_deg = (self.touch_angle_deg(x, y) - self.start_offset_deg).rem_euclid(360.0);
    }

    /// Ends the gesture, starting an angular fling when the release spin is
    /// fast enough. Returns whether a spin is now running.
    pub fn on_pointer_up(&mut self, timestamp_s: f64) -> bool {
        self.dragging = false;

        let velocity = self.angular_velocity_deg();
        self.samples.clear();
        if velocity.abs() <= self.fling.min_start_velocity {
            return false;
        }

        self.spin_velocity_deg = velocity;
        self.spin_last_time_s = timestamp_s;
        self.spin_active = true;
        debug!(velocity, "rotation spin started");
        true
    }

    pub fn on_cancel(&mut self) {
        self.dragging = false;
        self.samples.clear();
        self.stop_spin();
    }

    /// Advances the spin by one frame; returns whether another frame is
    /// needed.
    pub fn step_spin(&mut self, now_s: f64) -> bool {
        if !self.spin_active {
            return false;
        }
        if !now_s.is_finite() {
            return true;
        }

        let dt = now_s - self.spin_last_time_s;
        self.spin_last_time_s = now_s;
        if dt <= 0.0 {
            return true;
        }

        self.rotation_deg = (self.rotation_deg + self.spin_velocity_deg * dt).rem_euclid(360.0);
        self.spin_velocity_deg *= self.fling.decay_per_second.powf(dt);

        if self.spin_velocity_deg.abs() < self.fling.stop_velocity_abs {
            debug!("rotation spin finished");
            self.stop_spin();
            return false;
        }
        true
    }

    fn push_sample(&mut self, timestamp_s: f64, x: f64, y: f64) {
        if !timestamp_s.is_finite() {
            return;
        }
        let angle_deg = self.touch_angle_deg(x, y);
        self.samples.push(AngleSample {
            timestamp_s,
            angle_deg,
        });
        self.samples
            .retain(|sample| timestamp_s - sample.timestamp_s <= SAMPLE_WINDOW_S);
    }

    /// Angular velocity over the retained window, wrap-normalized so a spin
    /// across the 0/360 seam does not read as a full reverse turn.
    fn angular_velocity_deg(&self) -> f64 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return 0.0;
        };
        let dt = last.timestamp_s - first.timestamp_s;
        if dt <= 0.0 {
            return 0.0;
        }

        let mut delta = last.angle_deg - first.angle_deg;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }
        delta / dt
    }

    fn stop_spin(&mut self) {
        self.spin_active = false;
        self.spin_velocity_deg = 0.0;
    }
}
