use touchplot::core::{RectF, ViewportState};
use touchplot::interaction::{
    DragContext, GestureConfig, GestureHandler, GestureMode, MoveAction, ReleaseAction, TouchEvent,
    TouchPhase, TouchPoint,
};

fn viewport_zoomed(scale_x: f64, scale_y: f64) -> ViewportState {
    let mut viewport = ViewportState::new(RectF::new(0.0, 0.0, 1000.0, 500.0));
    viewport.zoom_by(scale_x, scale_y, 0.0, 0.0);
    viewport
}

fn down(points: &[(u64, f64, f64)], t: f64) -> TouchEvent {
    event(TouchPhase::Down, points, t)
}

fn moved(points: &[(u64, f64, f64)], t: f64) -> TouchEvent {
    event(TouchPhase::Move, points, t)
}

fn up(points: &[(u64, f64, f64)], t: f64) -> TouchEvent {
    event(TouchPhase::Up, points, t)
}

fn event(phase: TouchPhase, points: &[(u64, f64, f64)], t: f64) -> TouchEvent {
    let pointers: Vec<TouchPoint> = points
        .iter()
        .map(|(id, x, y)| TouchPoint::new(*id, *x, *y))
        .collect();
    TouchEvent::new(phase, &pointers, t)
}

#[test]
fn small_movement_does_not_commit_a_drag() {
    let mut viewport = viewport_zoomed(2.0, 2.0);
    let mut handler = GestureHandler::new(GestureConfig::default());

    handler.on_pointer_down(&down(&[(0, 500.0, 250.0)], 0.0), &mut viewport, DragContext::default());
    handler.on_pointer_move(&moved(&[(0, 504.0, 252.0)], 0.016), &mut viewport);
    assert_eq!(handler.mode(), GestureMode::None);

    let action = handler.on_pointer_up(&up(&[], 0.032), &mut viewport);
    assert_eq!(action, ReleaseAction::Tap { x: 500.0, y: 250.0 });
}

#[test]
fn drag_pans_by_the_cumulative_pixel_delta() {
    let mut viewport = viewport_zoomed(2.0, 2.0);
    let tx_before = viewport.trans_x();
    let mut handler = GestureHandler::new(GestureConfig::default());

    handler.on_pointer_down(&down(&[(0, 500.0, 250.0)], 0.0), &mut viewport, DragContext::default());
    handler.on_pointer_move(&moved(&[(0, 470.0, 250.0)], 0.016), &mut viewport);
    assert_eq!(handler.mode(), GestureMode::Drag);
    handler.on_pointer_move(&moved(&[(0, 450.0, 250.0)], 0.032), &mut viewport);

    assert!((viewport.trans_x() - (tx_before - 50.0)).abs() <= 1e-9);
}

#[test]
fn drag_on_fully_zoomed_out_chart_reports_highlight_slide() {
    let mut viewport = ViewportState::new(RectF::new(0.0, 0.0, 1000.0, 500.0));
    let mut handler = GestureHandler::new(GestureConfig::default());

    handler.on_pointer_down(&down(&[(0, 500.0, 250.0)], 0.0), &mut viewport, DragContext::default());
    let action = handler.on_pointer_move(&moved(&[(0, 450.0, 250.0)], 0.016), &mut viewport);
    assert_eq!(action, MoveAction::HighlightDrag);
    assert_eq!(handler.mode(), GestureMode::None);
}

#[test]
fn horizontal_movement_is_suppressed_when_x_drag_is_disabled() {
    let mut viewport = viewport_zoomed(2.0, 2.0);
    let config = GestureConfig {
        drag_x_enabled: false,
        ..GestureConfig::default()
    };
    let mut handler = GestureHandler::new(config);

    handler.on_pointer_down(&down(&[(0, 500.0, 250.0)], 0.0), &mut viewport, DragContext::default());
    handler.on_pointer_move(&moved(&[(0, 420.0, 255.0)], 0.016), &mut viewport);
    assert_eq!(handler.mode(), GestureMode::None);

    // A mostly vertical movement still commits, and its x component is
    // dropped from the pan.
    let tx_before = viewport.trans_x();
    handler.on_pointer_move(&moved(&[(0, 495.0, 150.0)], 0.032), &mut viewport);
    assert_eq!(handler.mode(), GestureMode::Drag);
    assert_eq!(viewport.trans_x(), tx_before);
}

#[test]
fn inverted_vertical_drag_flips_the_y_delta() {
    let mut viewport = viewport_zoomed(2.0, 2.0);
    viewport.translate(0.0, 200.0);
    let ty_before = viewport.trans_y();
    let mut handler = GestureHandler::new(GestureConfig::default());
    let context = DragContext {
        invert_drag: true,
        ..DragContext::default()
    };

    handler.on_pointer_down(&down(&[(0, 500.0, 250.0)], 0.0), &mut viewport, context);
    handler.on_pointer_move(&moved(&[(0, 500.0, 300.0)], 0.016), &mut viewport);

    // Finger moved +50 in pixel y; inversion pans -50 instead.
    assert!((viewport.trans_y() - (ty_before - 50.0)).abs() <= 1e-9);
}

#[test]
fn wide_two_finger_spread_elects_x_zoom() {
    let mut viewport = viewport_zoomed(1.0, 1.0);
    let mut handler = GestureHandler::new(GestureConfig::default());

    handler.on_pointer_down(&down(&[(0, 480.0, 250.0)], 0.0), &mut viewport, DragContext::default());
    handler.on_pointer_down(
        &down(&[(0, 480.0, 250.0), (1, 520.0, 252.0)], 0.02),
        &mut viewport,
        DragContext::default(),
    );
    assert_eq!(handler.mode(), GestureMode::XZoom);

    handler.on_pointer_move(
        &moved(&[(0, 460.0, 250.0), (1, 540.0, 252.0)], 0.04),
        &mut viewport,
    );
    assert!((viewport.scale_x() - 2.0).abs() <= 1e-9);
    assert_eq!(viewport.scale_y(), 1.0);
}

#[test]
fn uniform_pinch_scales_both_axes_by_total_distance() {
    let mut viewport = viewport_zoomed(1.0, 1.0);
    let config = GestureConfig {
        uniform_pinch: true,
        ..GestureConfig::default()
    };
    let mut handler = GestureHandler::new(config);

    handler.on_pointer_down(&down(&[(0, 490.0, 240.0)], 0.0), &mut viewport, DragContext::default());
    handler.on_pointer_down(
        &down(&[(0, 490.0, 240.0), (1, 510.0, 240.0)], 0.02),
        &mut viewport,
        DragContext::default(),
    );
    assert_eq!(handler.mode(), GestureMode::PinchZoom);

    // Spread 20px -> 40px doubles both scales.
    handler.on_pointer_move(
        &moved(&[(0, 480.0, 240.0), (1, 520.0, 240.0)], 0.04),
        &mut viewport,
    );
    assert!((viewport.scale_x() - 2.0).abs() <= 1e-9);
    assert!((viewport.scale_y() - 2.0).abs() <= 1e-9);
}

#[test]
fn pinch_beyond_the_scale_ceiling_is_dropped() {
    let mut viewport = viewport_zoomed(1.0, 1.0);
    viewport.set_maximum_scale_x(1.0);
    viewport.set_maximum_scale_y(1.0);
    let config = GestureConfig {
        uniform_pinch: true,
        ..GestureConfig::default()
    };
    let mut handler = GestureHandler::new(config);

    handler.on_pointer_down(&down(&[(0, 490.0, 240.0)], 0.0), &mut viewport, DragContext::default());
    handler.on_pointer_down(
        &down(&[(0, 490.0, 240.0), (1, 510.0, 240.0)], 0.02),
        &mut viewport,
        DragContext::default(),
    );
    let matrix_before = viewport.matrix();

    handler.on_pointer_move(
        &moved(&[(0, 480.0, 240.0), (1, 520.0, 240.0)], 0.04),
        &mut viewport,
    );
    assert_eq!(viewport.matrix(), matrix_before);
}

#[test]
fn narrow_spread_does_not_start_a_zoom() {
    let mut viewport = viewport_zoomed(1.0, 1.0);
    let mut handler = GestureHandler::new(GestureConfig::default());

    handler.on_pointer_down(&down(&[(0, 500.0, 250.0)], 0.0), &mut viewport, DragContext::default());
    handler.on_pointer_down(
        &down(&[(0, 500.0, 250.0), (1, 504.0, 253.0)], 0.02),
        &mut viewport,
        DragContext::default(),
    );
    assert_eq!(handler.mode(), GestureMode::None);
}

#[test]
fn losing_the_second_finger_parks_in_post_zoom() {
    let mut viewport = viewport_zoomed(1.0, 1.0);
    let mut handler = GestureHandler::new(GestureConfig::default());

    handler.on_pointer_down(&down(&[(0, 480.0, 250.0)], 0.0), &mut viewport, DragContext::default());
    handler.on_pointer_down(
        &down(&[(0, 480.0, 250.0), (1, 520.0, 250.0)], 0.02),
        &mut viewport,
        DragContext::default(),
    );

    let action = handler.on_pointer_up(&up(&[(0, 480.0, 250.0)], 0.04), &mut viewport);
    assert_eq!(action, ReleaseAction::None);
    assert_eq!(handler.mode(), GestureMode::PostZoom);

    // The remaining finger must not turn into a drag.
    let matrix_before = viewport.matrix();
    handler.on_pointer_move(&moved(&[(0, 380.0, 250.0)], 0.06), &mut viewport);
    assert_eq!(viewport.matrix(), matrix_before);

    let action = handler.on_pointer_up(&up(&[], 0.08), &mut viewport);
    assert_eq!(action, ReleaseAction::None);
    assert_eq!(handler.mode(), GestureMode::None);
}

#[test]
fn cancel_returns_to_idle() {
    let mut viewport = viewport_zoomed(2.0, 2.0);
    let mut handler = GestureHandler::new(GestureConfig::default());

    handler.on_pointer_down(&down(&[(0, 500.0, 250.0)], 0.0), &mut viewport, DragContext::default());
    handler.on_pointer_move(&moved(&[(0, 430.0, 250.0)], 0.016), &mut viewport);
    assert_eq!(handler.mode(), GestureMode::Drag);

    handler.on_cancel();
    assert_eq!(handler.mode(), GestureMode::None);
    assert!(!handler.is_decelerating());
}
