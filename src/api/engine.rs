use tracing::debug;

use crate::api::chart_model::ChartModel;
use crate::api::engine_config::ChartEngineConfig;
use crate::core::series::{AxisSide, DataSeries};
use crate::core::ticks::{TickSet, compute_ticks};
use crate::core::transformer::Transformer;
use crate::core::types::Orientation;
use crate::core::viewport::ViewportState;
use crate::error::{ChartError, ChartResult};
use crate::highlight::{Highlight, Highlighter};
use crate::interaction::{
    DragContext, GestureConfig, GestureHandler, GestureMode, MoveAction, ReleaseAction, TouchEvent,
    TouchPhase,
};

/// Host-side selection observer.
pub type SelectionListener = Box<dyn FnMut(Option<Highlight>)>;

/// Coordinator wiring the interaction core together.
///
/// One engine owns the viewport transform, one transformer per vertical
/// axis, the gesture machine and the highlighter. Pointer events flow in
/// through [`ChartEngine::handle_touch`]; every mapping the render layer
/// needs flows out through the transformers and tick queries.
pub struct ChartEngine {
    config: ChartEngineConfig,
    model: ChartModel,
    viewport: ViewportState,
    left_transformer: Transformer,
    right_transformer: Transformer,
    gesture: GestureHandler,
    highlighter: Highlighter,
    selection: Option<Highlight>,
    selection_listener: Option<SelectionListener>,
}

impl std::fmt::Debug for ChartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartEngine")
            .field("config", &self.config)
            .field("model", &self.model)
            .field("viewport", &self.viewport)
            .field("left_transformer", &self.left_transformer)
            .field("right_transformer", &self.right_transformer)
            .field("gesture", &self.gesture)
            .field("highlighter", &self.highlighter)
            .field("selection", &self.selection)
            .field(
                "selection_listener",
                &self.selection_listener.as_ref().map(|_| "<listener>"),
            )
            .finish()
    }
}

impl ChartEngine {
    pub fn new(config: ChartEngineConfig) -> ChartResult<Self> {
        let content = config.content_rect()?;
        let mut engine = Self {
            config,
            model: ChartModel::new(),
            viewport: ViewportState::new(content),
            left_transformer: Transformer::new(),
            right_transformer: Transformer::new(),
            gesture: GestureHandler::new(config.gesture),
            highlighter: Highlighter::new(config.max_highlight_distance_px),
            selection: None,
            selection_listener: None,
        };
        engine.prepare_matrices();
        Ok(engine)
    }

    #[must_use]
    pub fn config(&self) -> ChartEngineConfig {
        self.config
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    #[must_use]
    pub fn transformer(&self, axis: AxisSide) -> &Transformer {
        match axis {
            AxisSide::Left => &self.left_transformer,
            AxisSide::Right => &self.right_transformer,
        }
    }

    #[must_use]
    pub fn model(&self) -> &ChartModel {
        &self.model
    }

    #[must_use]
    pub fn gesture_mode(&self) -> GestureMode {
        self.gesture.mode()
    }

    #[must_use]
    pub fn gesture_config(&self) -> GestureConfig {
        self.gesture.config()
    }

    pub fn set_gesture_config(&mut self, config: GestureConfig) {
        self.config.gesture = config;
        self.gesture.set_config(config);
    }

    pub fn set_selection_listener(&mut self, listener: SelectionListener) {
        self.selection_listener = Some(listener);
    }

    /// Inserts or replaces a series and relayouts. Any live selection is
    /// dropped: it may point into data that no longer exists.
    pub fn set_series(&mut self, id: impl Into<String>, series: Box<dyn DataSeries>) {
        self.model.insert_series(id, series);
        self.set_selection(None);
        self.notify_data_changed();
    }

    pub fn remove_series(&mut self, id: &str) -> bool {
        let removed = self.model.remove_series(id);
        if removed {
            self.set_selection(None);
            self.notify_data_changed();
        }
        removed
    }

    pub fn clear_series(&mut self) {
        self.model.clear();
        self.set_selection(None);
        self.notify_data_changed();
    }

    /// Recomputes value and offset matrices after the data extents changed.
    pub fn notify_data_changed(&mut self) {
        self.prepare_matrices();
        debug!(series = self.model.len(), "data changed, matrices rebuilt");
    }

    /// Resizes the surface, keeping the current pan/zoom where the new
    /// bounds allow it.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> ChartResult<()> {
        let mut next = self.config;
        next.width = width;
        next.height = height;
        let content = next.content_rect()?;

        self.config = next;
        self.viewport.set_content_rect(content);
        self.prepare_matrices();
        Ok(())
    }

    fn prepare_matrices(&mut self) {
        let (x_min, x_max) = widen_if_degenerate(self.model.x_bounds().unwrap_or((0.0, 1.0)));
        let horizontal = self.config.orientation == Orientation::Horizontal;

        for (axis, inverted) in [
            (AxisSide::Left, self.config.left_axis.inverted),
            (AxisSide::Right, self.config.right_axis.inverted),
        ] {
            let (y_min, y_max) =
                widen_if_degenerate(self.model.y_bounds(axis).unwrap_or((0.0, 1.0)));
            let transformer = match axis {
                AxisSide::Left => &mut self.left_transformer,
                AxisSide::Right => &mut self.right_transformer,
            };
            transformer.prepare_value_matrix(
                &self.viewport,
                x_min,
                x_max - x_min,
                y_min,
                y_max - y_min,
            );
            transformer.prepare_offset_matrix(&self.viewport, inverted || horizontal);
        }
    }

    /// Data-space x at the left content edge, clamped to the data extent.
    #[must_use]
    pub fn lowest_visible_x(&self) -> f64 {
        let content = self.viewport.content_rect();
        let (x, _) =
            self.left_transformer
                .pixel_to_value(&self.viewport, content.left, content.bottom);
        match self.model.x_bounds() {
            Some((min, _)) => x.max(min),
            None => x,
        }
    }

    /// Data-space x at the right content edge, clamped to the data extent.
    #[must_use]
    pub fn highest_visible_x(&self) -> f64 {
        let content = self.viewport.content_rect();
        let (x, _) =
            self.left_transformer
                .pixel_to_value(&self.viewport, content.right, content.bottom);
        match self.model.x_bounds() {
            Some((_, max)) => x.min(max),
            None => x,
        }
    }

    /// Visible y range on one axis, derived from the live transform.
    #[must_use]
    pub fn visible_y_range(&self, axis: AxisSide) -> (f64, f64) {
        let content = self.viewport.content_rect();
        let transformer = self.transformer(axis);
        let (_, y_at_top) = transformer.pixel_to_value(&self.viewport, content.left, content.top);
        let (_, y_at_bottom) =
            transformer.pixel_to_value(&self.viewport, content.left, content.bottom);
        (y_at_top.min(y_at_bottom), y_at_top.max(y_at_bottom))
    }

    /// Ticks for the shared x axis over the currently visible range.
    #[must_use]
    pub fn x_ticks(&self) -> TickSet {
        let (lo, hi) = widen_if_degenerate((self.lowest_visible_x(), self.highest_visible_x()));
        compute_ticks(lo, hi, &self.config.x_ticks)
    }

    /// Ticks for one vertical axis over the currently visible range.
    #[must_use]
    pub fn y_ticks(&self, axis: AxisSide) -> TickSet {
        let (lo, hi) = widen_if_degenerate(self.visible_y_range(axis));
        let config = match axis {
            AxisSide::Left => self.config.left_axis.ticks,
            AxisSide::Right => self.config.right_axis.ticks,
        };
        compute_ticks(lo, hi, &config)
    }

    #[must_use]
    pub fn map_value_to_pixel(&self, axis: AxisSide, x: f64, y: f64) -> (f64, f64) {
        self.transformer(axis).point_to_pixel(&self.viewport, x, y)
    }

    #[must_use]
    pub fn map_pixel_to_value(&self, axis: AxisSide, pixel_x: f64, pixel_y: f64) -> (f64, f64) {
        self.transformer(axis)
            .pixel_to_value(&self.viewport, pixel_x, pixel_y)
    }

    /// Programmatic zoom to absolute scale factors.
    pub fn set_zoom(&mut self, scale_x: f64, scale_y: f64) -> ChartResult<()> {
        if !scale_x.is_finite() || !scale_y.is_finite() || scale_x <= 0.0 || scale_y <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom scale must be finite and > 0".to_owned(),
            ));
        }
        self.viewport.set_zoom(scale_x, scale_y);
        Ok(())
    }

    /// Zooms in around the content center, 1.4x per step.
    pub fn zoom_in(&mut self) {
        let content = self.viewport.content_rect();
        self.viewport
            .zoom_by(1.4, 1.4, content.center_x(), content.center_y());
    }

    /// Zooms out around the content center, 0.7x per step.
    pub fn zoom_out(&mut self) {
        let content = self.viewport.content_rect();
        self.viewport
            .zoom_by(0.7, 0.7, content.center_x(), content.center_y());
    }

    /// Back to the fully-zoomed-out fit.
    pub fn fit_content(&mut self) {
        self.viewport.reset_zoom();
    }

    pub fn set_scale_limits_x(&mut self, min: f64, max: f64) {
        self.viewport.set_scale_limits_x(min, max);
    }

    pub fn set_scale_limits_y(&mut self, min: f64, max: f64) {
        self.viewport.set_scale_limits_y(min, max);
    }

    /// Feeds one host pointer event through the gesture machine.
    ///
    /// The viewport mutation (if any) is committed before this returns, so
    /// a redraw issued afterwards always sees a consistent transform.
    pub fn handle_touch(&mut self, event: &TouchEvent) {
        match event.phase {
            TouchPhase::Down => {
                let context = self.resolve_drag_context(event);
                self.gesture
                    .on_pointer_down(event, &mut self.viewport, context);
            }
            TouchPhase::Move => {
                let action = self.gesture.on_pointer_move(event, &mut self.viewport);
                if action == MoveAction::HighlightDrag && self.config.highlight_per_drag {
                    if let Some(primary) = event.primary() {
                        let located = self.highlight_at(primary.x, primary.y);
                        self.set_selection(located);
                    }
                }
            }
            TouchPhase::Up => match self.gesture.on_pointer_up(event, &mut self.viewport) {
                ReleaseAction::Tap { x, y } => self.toggle_selection_at(x, y),
                ReleaseAction::Fling | ReleaseAction::None => {}
            },
            TouchPhase::Cancel => self.gesture.on_cancel(),
        }
    }

    /// Advances fling deceleration by one animation frame. Returns whether
    /// the host should schedule another frame.
    pub fn step_deceleration(&mut self, now_s: f64) -> bool {
        self.gesture.step_deceleration(now_s, &mut self.viewport)
    }

    #[must_use]
    pub fn is_decelerating(&self) -> bool {
        self.gesture.is_decelerating()
    }

    /// Chooses drag-inversion behavior from the series nearest to the
    /// initial touch; with nothing close enough, any inverted axis wins.
    fn resolve_drag_context(&self, event: &TouchEvent) -> DragContext {
        let invert_drag = event
            .primary()
            .and_then(|primary| self.highlight_at(primary.x, primary.y))
            .map(|highlight| match highlight.axis {
                AxisSide::Left => self.config.left_axis.inverted,
                AxisSide::Right => self.config.right_axis.inverted,
            })
            .unwrap_or(self.config.left_axis.inverted || self.config.right_axis.inverted);

        DragContext {
            orientation: self.config.orientation,
            invert_drag,
        }
    }

    /// Pure hit-test at a pixel position; does not change the selection.
    #[must_use]
    pub fn highlight_at(&self, pixel_x: f64, pixel_y: f64) -> Option<Highlight> {
        self.highlighter.locate(
            pixel_x,
            pixel_y,
            &self.model.ordered_series(),
            &self.left_transformer,
            &self.right_transformer,
            &self.viewport,
        )
    }

    /// Hit-tests and installs the result as the selection.
    pub fn select_at(&mut self, pixel_x: f64, pixel_y: f64) -> Option<Highlight> {
        let located = self.highlight_at(pixel_x, pixel_y);
        self.set_selection(located);
        located
    }

    #[must_use]
    pub fn selected(&self) -> Option<Highlight> {
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(None);
    }

    /// Tapping the already-selected point deselects it; tapping empty space
    /// clears; anything else selects the tapped point.
    fn toggle_selection_at(&mut self, pixel_x: f64, pixel_y: f64) {
        let located = self.highlight_at(pixel_x, pixel_y);
        let next = match (&located, &self.selection) {
            (Some(new), Some(current)) if new.same_point(current) => None,
            _ => located,
        };
        self.set_selection(next);
    }

    fn set_selection(&mut self, next: Option<Highlight>) {
        let changed = match (&self.selection, &next) {
            (Some(current), Some(candidate)) => !current.same_point(candidate),
            (None, None) => false,
            _ => true,
        };
        if !changed {
            return;
        }

        self.selection = next;
        if let Some(listener) = self.selection_listener.as_mut() {
            listener(next);
        }
    }
}

/// A collapsed range widens by one unit per side so axes stay drawable.
fn widen_if_degenerate((min, max): (f64, f64)) -> (f64, f64) {
    if max > min {
        (min, max)
    } else {
        (min - 1.0, max + 1.0)
    }
}
