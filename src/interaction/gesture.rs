use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::matrix::AffineMatrix;
use crate::core::types::Orientation;
use crate::core::viewport::ViewportState;
use crate::interaction::velocity::VelocityTracker;
use crate::interaction::{DragContext, FlingConfig, TouchEvent};

/// Interaction state of the current touch sequence. Exactly one mode is
/// active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GestureMode {
    #[default]
    None,
    Drag,
    XZoom,
    YZoom,
    PinchZoom,
    /// A zoom gesture lost its second finger; the remaining finger must not
    /// turn into a drag.
    PostZoom,
    /// Radial-chart rotation, driven by [`super::RotationGestureHandler`].
    Rotate,
}

/// Tuning for the linear-chart gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default = "default_true")]
    pub drag_x_enabled: bool,
    #[serde(default = "default_true")]
    pub drag_y_enabled: bool,
    #[serde(default = "default_true")]
    pub scale_x_enabled: bool,
    #[serde(default = "default_true")]
    pub scale_y_enabled: bool,
    /// Two-finger spread scales both axes by the total distance ratio
    /// instead of electing a single axis.
    #[serde(default)]
    pub uniform_pinch: bool,
    /// Movement needed before a touch commits to a drag.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold_px: f64,
    /// Minimum two-finger spread for a zoom gesture to start.
    #[serde(default = "default_min_pinch_spacing")]
    pub min_pinch_spacing_px: f64,
    #[serde(default)]
    pub fling: FlingConfig,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_x_enabled: true,
            drag_y_enabled: true,
            scale_x_enabled: true,
            scale_y_enabled: true,
            uniform_pinch: false,
            drag_threshold_px: default_drag_threshold(),
            min_pinch_spacing_px: default_min_pinch_spacing(),
            fling: FlingConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_drag_threshold() -> f64 {
    9.0
}

fn default_min_pinch_spacing() -> f64 {
    10.0
}

/// What a pointer movement amounted to, beyond any viewport mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    None,
    /// The finger moved past the drag threshold but panning is not
    /// meaningful (fully zoomed out, or dragging disabled); the chart may
    /// slide the highlight along instead.
    HighlightDrag,
}

/// What a pointer release amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseAction {
    /// The touch never committed to a gesture; the start position is the
    /// tap location for selection.
    Tap { x: f64, y: f64 },
    /// A drag released above the fling velocity floor; keep calling
    /// [`GestureHandler::step_deceleration`] once per frame.
    Fling,
    None,
}

/// Consumes pointer events and drives the viewport transform.
///
/// Commits at most one matrix mutation per event; deceleration commits one
/// further mutation per animation frame via `step_deceleration`.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureHandler {
    config: GestureConfig,
    mode: GestureMode,
    checkpoint: AffineMatrix,
    touch_start: (f64, f64),
    drag_context: DragContext,
    pinch_base_dist: f64,
    pinch_base_x_dist: f64,
    pinch_base_y_dist: f64,
    pinch_pivot: (f64, f64),
    velocity: VelocityTracker,
    fling_velocity: (f64, f64),
    fling_last_time_s: f64,
    fling_active: bool,
}

impl GestureHandler {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            mode: GestureMode::None,
            checkpoint: AffineMatrix::identity(),
            touch_start: (0.0, 0.0),
            drag_context: DragContext::default(),
            pinch_base_dist: 0.0,
            pinch_base_x_dist: 0.0,
            pinch_base_y_dist: 0.0,
            pinch_pivot: (0.0, 0.0),
            velocity: VelocityTracker::new(),
            fling_velocity: (0.0, 0.0),
            fling_last_time_s: 0.0,
            fling_active: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    #[must_use]
    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    #[must_use]
    pub fn is_decelerating(&self) -> bool {
        self.fling_active
    }

    /// Starting any new touch sequence cancels a running fling: the next
    /// scheduled deceleration tick then no-ops and stops rescheduling.
    pub fn on_pointer_down(
        &mut self,
        event: &TouchEvent,
        viewport: &mut ViewportState,
        context: DragContext,
    ) {
        self.stop_fling();

        match event.pointers.len() {
            1 => {
                let Some(primary) = event.primary() else {
                    return;
                };
                self.checkpoint = viewport.matrix();
                self.touch_start = (primary.x, primary.y);
                self.drag_context = context;
                self.mode = GestureMode::None;
                self.velocity.clear();
                self.velocity.push(event.timestamp_s, primary.x, primary.y);
                trace!(x = primary.x, y = primary.y, "touch sequence started");
            }
            2 => {
                let a = event.pointers[0];
                let b = event.pointers[1];
                let x_dist = (a.x - b.x).abs();
                let y_dist = (a.y - b.y).abs();
                let dist = x_dist.hypot(y_dist);
                if dist <= self.config.min_pinch_spacing_px {
                    return;
                }
                if !self.config.scale_x_enabled && !self.config.scale_y_enabled {
                    return;
                }

                self.checkpoint = viewport.matrix();
                self.pinch_base_dist = dist;
                self.pinch_base_x_dist = x_dist;
                self.pinch_base_y_dist = y_dist;
                self.pinch_pivot = ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
                self.mode = if self.config.uniform_pinch {
                    GestureMode::PinchZoom
                } else if self.config.scale_x_enabled != self.config.scale_y_enabled {
                    if self.config.scale_x_enabled {
                        GestureMode::XZoom
                    } else {
                        GestureMode::YZoom
                    }
                } else if x_dist > y_dist {
                    GestureMode::XZoom
                } else {
                    GestureMode::YZoom
                };
                trace!(mode = ?self.mode, dist, "zoom gesture started");
            }
            _ => {}
        }
    }

    pub fn on_pointer_move(&mut self, event: &TouchEvent, viewport: &mut ViewportState) -> MoveAction {
        if let Some(primary) = event.primary() {
            self.velocity.push(event.timestamp_s, primary.x, primary.y);
        }

        match self.mode {
            GestureMode::None => self.try_start_drag(event, viewport),
            GestureMode::Drag => {
                self.perform_drag(event, viewport);
                MoveAction::None
            }
            GestureMode::XZoom | GestureMode::YZoom | GestureMode::PinchZoom => {
                self.perform_zoom(event, viewport);
                MoveAction::None
            }
            GestureMode::PostZoom | GestureMode::Rotate => MoveAction::None,
        }
    }

    /// Handles a pointer lift. `event.pointers` holds the pointers still in
    /// contact; an empty list ends the touch sequence.
    #[must_use]
    pub fn on_pointer_up(&mut self, event: &TouchEvent, _viewport: &mut ViewportState) -> ReleaseAction {
        if !event.pointers.is_empty() {
            if matches!(
                self.mode,
                GestureMode::XZoom | GestureMode::YZoom | GestureMode::PinchZoom
            ) {
                self.mode = GestureMode::PostZoom;
            }
            return ReleaseAction::None;
        }

        let ended_mode = self.mode;
        self.mode = GestureMode::None;

        match ended_mode {
            GestureMode::None => {
                let (x, y) = self.touch_start;
                self.velocity.clear();
                ReleaseAction::Tap { x, y }
            }
            GestureMode::Drag => {
                let action = self.maybe_start_fling(event.timestamp_s);
                self.velocity.clear();
                action
            }
            _ => {
                self.velocity.clear();
                ReleaseAction::None
            }
        }
    }

    pub fn on_cancel(&mut self) {
        self.mode = GestureMode::None;
        self.velocity.clear();
        self.stop_fling();
    }

    /// Advances the fling by one frame and returns whether another frame is
    /// needed. Pan distance scales with measured elapsed time, so the speed
    /// felt on screen does not depend on the frame rate.
    pub fn step_deceleration(&mut self, now_s: f64, viewport: &mut ViewportState) -> bool {
        if !self.fling_active {
            return false;
        }
        if !now_s.is_finite() {
            return true;
        }

        let dt = now_s - self.fling_last_time_s;
        self.fling_last_time_s = now_s;
        if dt <= 0.0 {
            return true;
        }

        let (vx, vy) = self.fling_velocity;
        viewport.translate(vx * dt, vy * dt);

        let decay = self.config.fling.decay_per_second.powf(dt);
        self.fling_velocity = (vx * decay, vy * decay);

        if self.fling_velocity.0.hypot(self.fling_velocity.1) < self.config.fling.stop_velocity_abs
        {
            debug!("fling finished");
            self.stop_fling();
            return false;
        }
        true
    }

    fn try_start_drag(&mut self, event: &TouchEvent, viewport: &mut ViewportState) -> MoveAction {
        if event.pointers.len() != 1 {
            return MoveAction::None;
        }
        let Some(primary) = event.primary() else {
            return MoveAction::None;
        };

        let dx = primary.x - self.touch_start.0;
        let dy = primary.y - self.touch_start.1;
        if dx.hypot(dy) <= self.config.drag_threshold_px {
            return MoveAction::None;
        }

        if !self.config.drag_x_enabled && !self.config.drag_y_enabled {
            return MoveAction::HighlightDrag;
        }

        // Direction gating: a movement dominated by a disabled axis never
        // commits, instead of committing and panning the other axis.
        if !self.config.drag_x_enabled && dx.abs() > dy.abs() {
            return MoveAction::None;
        }
        if !self.config.drag_y_enabled && dy.abs() > dx.abs() {
            return MoveAction::None;
        }

        // Everything already fits on screen: panning cannot move anything,
        // so the slide is better spent following the data under the finger.
        if viewport.is_fully_zoomed_out() {
            return MoveAction::HighlightDrag;
        }

        self.mode = GestureMode::Drag;
        trace!("drag committed");
        self.perform_drag(event, viewport);
        MoveAction::None
    }

    fn perform_drag(&mut self, event: &TouchEvent, viewport: &mut ViewportState) {
        let Some(primary) = event.primary() else {
            return;
        };

        let (mut dx, mut dy) = (
            primary.x - self.touch_start.0,
            primary.y - self.touch_start.1,
        );
        (dx, dy) = self.apply_drag_inversion(dx, dy);
        if !self.config.drag_x_enabled {
            dx = 0.0;
        }
        if !self.config.drag_y_enabled {
            dy = 0.0;
        }

        viewport.pan_from(&self.checkpoint, dx, dy);
    }

    fn apply_drag_inversion(&self, dx: f64, dy: f64) -> (f64, f64) {
        if !self.drag_context.invert_drag {
            return (dx, dy);
        }
        match self.drag_context.orientation {
            Orientation::Horizontal => (-dx, dy),
            Orientation::Vertical => (dx, -dy),
        }
    }

    fn perform_zoom(&mut self, event: &TouchEvent, viewport: &mut ViewportState) {
        if event.pointers.len() < 2 {
            return;
        }
        let a = event.pointers[0];
        let b = event.pointers[1];

        let (factor_x, factor_y) = match self.mode {
            GestureMode::PinchZoom => {
                let dist = (a.x - b.x).hypot(a.y - b.y);
                let factor = dist / self.pinch_base_dist;
                let fx = if self.config.scale_x_enabled {
                    gated_factor(
                        factor,
                        viewport.can_zoom_in_more_x(),
                        viewport.can_zoom_out_more_x(),
                    )
                } else {
                    1.0
                };
                let fy = if self.config.scale_y_enabled {
                    gated_factor(
                        factor,
                        viewport.can_zoom_in_more_y(),
                        viewport.can_zoom_out_more_y(),
                    )
                } else {
                    1.0
                };
                (fx, fy)
            }
            GestureMode::XZoom => {
                let factor = (a.x - b.x).abs() / self.pinch_base_x_dist;
                (
                    gated_factor(
                        factor,
                        viewport.can_zoom_in_more_x(),
                        viewport.can_zoom_out_more_x(),
                    ),
                    1.0,
                )
            }
            GestureMode::YZoom => {
                let factor = (a.y - b.y).abs() / self.pinch_base_y_dist;
                (
                    1.0,
                    gated_factor(
                        factor,
                        viewport.can_zoom_in_more_y(),
                        viewport.can_zoom_out_more_y(),
                    ),
                )
            }
            _ => (1.0, 1.0),
        };

        // Both axes pinned at their limit: drop the update for this frame.
        if factor_x == 1.0 && factor_y == 1.0 {
            return;
        }

        let (pivot_x, pivot_y) = viewport.pan_space_pivot(
            self.pinch_pivot.0,
            self.pinch_pivot.1,
            self.drag_context.invert_drag,
        );
        viewport.zoom_from_pivot(&self.checkpoint, factor_x, factor_y, pivot_x, pivot_y);
    }

    fn maybe_start_fling(&mut self, timestamp_s: f64) -> ReleaseAction {
        let (mut vx, mut vy) = self.velocity.velocity_at(timestamp_s);
        (vx, vy) = self.apply_drag_inversion(vx, vy);
        if !self.config.drag_x_enabled {
            vx = 0.0;
        }
        if !self.config.drag_y_enabled {
            vy = 0.0;
        }

        if vx.hypot(vy) <= self.config.fling.min_start_velocity {
            return ReleaseAction::None;
        }

        self.fling_velocity = (vx, vy);
        self.fling_last_time_s = timestamp_s;
        self.fling_active = true;
        debug!(vx, vy, "fling started");
        ReleaseAction::Fling
    }

    fn stop_fling(&mut self) {
        self.fling_active = false;
        self.fling_velocity = (0.0, 0.0);
    }
}

/// Keeps a zoom factor only while the viewport can still move in that
/// direction; a blocked direction collapses the factor to 1.
fn gated_factor(factor: f64, can_zoom_in: bool, can_zoom_out: bool) -> f64 {
    if !factor.is_finite() || factor <= 0.0 {
        return 1.0;
    }
    if factor > 1.0 && !can_zoom_in {
        return 1.0;
    }
    if factor < 1.0 && !can_zoom_out {
        return 1.0;
    }
    factor
}
