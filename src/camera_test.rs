#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn viewport() -> Viewport {
    let mut vp = Viewport::new(&EditorConfig::default());
    vp.update_bounds(Bounds::from_rect(0.0, 0.0, 800.0, 600.0));
    vp
}

// --- Camera defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.point, Point::ZERO);
    assert_eq!(cam.zoom, 1.0);
}

#[test]
fn camera_serializes_point_as_tuple() {
    let json = serde_json::to_value(Camera { point: Point::new(1.0, 2.0), zoom: 2.0 }).unwrap();
    assert_eq!(json, serde_json::json!({ "point": [1.0, 2.0], "zoom": 2.0 }));
}

// --- Conversions ---

#[test]
fn identity_camera_maps_one_to_one() {
    let vp = viewport();
    let p = Point::new(123.0, 45.0);
    assert_eq!(vp.page_point(p), p);
    assert_eq!(vp.screen_point(p), p);
}

#[test]
fn conversions_invert_each_other() {
    let mut vp = viewport();
    vp.update(Point::new(-30.0, 12.5), 2.5);
    let screen = Point::new(400.0, 300.0);
    assert!(point_approx_eq(vp.screen_point(vp.page_point(screen)), screen));
}

#[test]
fn page_point_divides_then_offsets() {
    let mut vp = viewport();
    vp.update(Point::new(10.0, 20.0), 2.0);
    assert_eq!(vp.page_point(Point::new(100.0, 100.0)), Point::new(40.0, 30.0));
}

#[test]
fn current_view_spans_screen_over_zoom() {
    let mut vp = viewport();
    vp.update(Point::new(-100.0, -50.0), 2.0);
    assert_eq!(vp.current_view(), Bounds::new(100.0, 50.0, 500.0, 350.0));
}

// --- Navigation ---

#[test]
fn pan_moves_opposite_the_delta_in_page_units() {
    let mut vp = viewport();
    vp.update(Point::ZERO, 2.0);
    vp.pan_camera(Point::new(20.0, -10.0));
    assert_eq!(vp.camera().point, Point::new(-10.0, 5.0));
}

#[test]
fn zoom_is_clamped() {
    let mut vp = viewport();
    vp.update(Point::ZERO, 100.0);
    assert_eq!(vp.camera().zoom, 8.0);
    vp.update(Point::ZERO, 0.0);
    assert_eq!(vp.camera().zoom, 0.1);
}

#[test]
fn non_finite_update_is_ignored() {
    let mut vp = viewport();
    vp.update(Point::new(f64::NAN, 0.0), 1.0);
    assert_eq!(vp.camera(), Camera::default());
}

#[test]
fn zoom_in_steps_and_keeps_center() {
    let mut vp = viewport();
    let center = Point::new(400.0, 300.0);
    let before = vp.page_point(center);
    vp.zoom_in();
    assert_eq!(vp.camera().zoom, 2.0);
    assert!(point_approx_eq(vp.page_point(center), before));
    vp.zoom_out();
    vp.zoom_out();
    assert_eq!(vp.camera().zoom, 0.5);
}

#[test]
fn reset_zoom_returns_to_one() {
    let mut vp = viewport();
    vp.zoom_in();
    vp.reset_zoom();
    assert_eq!(vp.camera().zoom, 1.0);
}

#[test]
fn pinch_keeps_origin_fixed() {
    let mut vp = viewport();
    let origin = Point::new(200.0, 150.0);
    let before = vp.page_point(origin);
    vp.pinch_camera(origin, Point::ZERO, 3.0);
    assert_eq!(vp.camera().zoom, 3.0);
    assert!(point_approx_eq(vp.page_point(origin), before));
}

#[test]
fn zoom_to_bounds_centers_target() {
    let mut vp = viewport();
    let target = Bounds::from_rect(1000.0, 1000.0, 350.0, 250.0);
    vp.zoom_to_bounds(&target);
    assert_eq!(vp.camera().zoom, 2.0);
    let center = vp.screen_point(target.center());
    assert!(point_approx_eq(center, Point::new(400.0, 300.0)));
}
