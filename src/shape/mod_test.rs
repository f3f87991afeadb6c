#![allow(clippy::float_cmp)]

use std::f64::consts::FRAC_PI_4;

use serde_json::json;

use super::*;
use crate::consts::{MAX_VERTICES, MIN_VERTICES};
use crate::error::EditorError;

fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Shape {
    Shape::new(id, "page1", Point::new(x, y), ShapeKind::Box(BoxProps { size: Size::new(w, h) }))
}

fn stroke(points: &[(f64, f64)]) -> Shape {
    let points = points.iter().map(|&(x, y)| StrokePoint::new(x, y, 0.5)).collect();
    Shape::new("s1", "page1", Point::new(100.0, 100.0), ShapeKind::Draw(DrawProps { points, is_complete: true }))
}

fn resize_info(initial: &SerializedShape, bounds: Bounds, scale_x: f64, scale_y: f64) -> ResizeInfo<'_> {
    ResizeInfo {
        handle: ResizeAnchor::Se,
        scale_x,
        scale_y,
        transform_origin: Point::new(0.5, 0.5),
        initial_bounds: bounds,
        initial_props: initial,
    }
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn box_serializes_flat_with_type_tag() {
    let value = serde_json::to_value(rect("b1", 10.0, 20.0, 30.0, 40.0).serialized()).unwrap();
    assert_eq!(
        value,
        json!({ "id": "b1", "parentId": "page1", "point": [10.0, 20.0], "nonce": 0, "type": "box", "size": [30.0, 40.0] })
    );
}

#[test]
fn partial_record_fills_variant_defaults() {
    let record: SerializedShape = serde_json::from_value(json!({
        "id": "p1", "parentId": "page1", "type": "polygon", "point": [0, 0], "sides": 6
    }))
    .unwrap();
    let ShapeKind::Polygon(props) = &record.kind else { panic!("expected polygon, got {:?}", record.kind) };
    assert_eq!(props.sides, 6);
    assert_eq!(props.size, Size::new(100.0, 100.0));
    assert_eq!(props.ratio, 1.0);
}

#[test]
fn star_count_serializes_as_points() {
    let shape = Shape::new("st", "page1", Point::ZERO, ShapeKind::Star(StarProps::default()));
    let value = serde_json::to_value(shape.serialized()).unwrap();
    assert_eq!(value["points"], json!(5));
    assert_eq!(value["type"], json!("star"));
}

#[test]
fn draw_points_round_trip_through_records() {
    let shape = stroke(&[(0.0, 0.0), (10.0, 5.0)]);
    let text = serde_json::to_string(shape.serialized()).unwrap();
    let back: SerializedShape = serde_json::from_str(&text).unwrap();
    assert_eq!(&back, shape.serialized());
}

// =============================================================================
// Mutation
// =============================================================================

#[test]
fn new_shape_is_clean() {
    let shape = rect("b1", 0.0, 0.0, 10.0, 10.0);
    assert!(!shape.is_dirty());
    assert_eq!(shape.nonce(), 0);
}

#[test]
fn update_bumps_nonce_and_invalidates_cache() {
    let mut shape = rect("b1", 0.0, 0.0, 10.0, 10.0);
    shape.update(&ShapePatch::point(Point::new(5.0, 6.0)));
    assert!(shape.is_dirty());
    assert_eq!(shape.nonce(), 1);
    assert_eq!(shape.serialized().point, Point::new(5.0, 6.0));
    assert!(!shape.is_dirty());
}

#[test]
fn patch_ignores_props_of_other_variants() {
    let mut shape = rect("b1", 0.0, 0.0, 10.0, 10.0);
    shape.update(&ShapePatch { radius: Some(99.0), sides: Some(8), ..ShapePatch::default() });
    assert_eq!(shape.kind(), &ShapeKind::Box(BoxProps { size: Size::new(10.0, 10.0) }));
}

#[test]
fn restore_keeps_identity() {
    let mut shape = rect("b1", 0.0, 0.0, 10.0, 10.0);
    let snapshot = shape.serialized().clone();
    shape.update(&ShapePatch::point(Point::new(50.0, 50.0)));
    shape.restore(&snapshot);
    assert_eq!(shape.point(), Point::ZERO);
    assert_eq!(shape.id(), "b1");
    assert!(shape.nonce() > snapshot.nonce);
}

// =============================================================================
// Hit-testing
// =============================================================================

#[test]
fn box_point_hit() {
    let shape = rect("b1", 0.0, 0.0, 100.0, 50.0);
    assert!(shape.hit_test_point(Point::new(50.0, 25.0)));
    assert!(!shape.hit_test_point(Point::new(150.0, 25.0)));
}

#[test]
fn rotated_box_point_hit_follows_rotation() {
    let shape = rect("b1", 0.0, 0.0, 100.0, 100.0).with_rotation(FRAC_PI_4);
    // The unrotated corner falls outside the diamond.
    assert!(!shape.hit_test_point(Point::new(2.0, 2.0)));
    // The diamond's top tip pokes above the unrotated box.
    assert!(shape.hit_test_point(Point::new(50.0, -10.0)));
}

#[test]
fn bounds_hit_on_containment_or_crossing() {
    let shape = rect("b1", 10.0, 10.0, 20.0, 20.0);
    assert!(shape.hit_test_bounds(&Bounds::from_rect(0.0, 0.0, 100.0, 100.0)));
    assert!(shape.hit_test_bounds(&Bounds::from_rect(0.0, 0.0, 15.0, 15.0)));
    assert!(!shape.hit_test_bounds(&Bounds::from_rect(50.0, 50.0, 10.0, 10.0)));
}

#[test]
fn brush_inside_shape_does_not_hit() {
    let shape = rect("b1", 0.0, 0.0, 100.0, 100.0);
    assert!(!shape.hit_test_bounds(&Bounds::from_rect(40.0, 40.0, 10.0, 10.0)));
}

#[test]
fn ellipse_corner_is_outside() {
    let shape = Shape::new("e1", "page1", Point::ZERO, ShapeKind::Ellipse(EllipseProps::default()));
    assert!(shape.hit_test_point(Point::new(50.0, 50.0)));
    assert!(!shape.hit_test_point(Point::new(3.0, 3.0)));
    assert!(!shape.hit_test_bounds(&Bounds::from_rect(-5.0, -5.0, 10.0, 10.0)));
}

#[test]
fn ellipse_rotated_bounds_are_tight() {
    let shape = Shape::new("e1", "page1", Point::ZERO, ShapeKind::Ellipse(EllipseProps { size: Size::new(100.0, 100.0) }))
        .with_rotation(FRAC_PI_4);
    let b = shape.rotated_bounds();
    assert!((b.width - 100.0).abs() < 1e-9);
}

#[test]
fn segment_hits_box_edge() {
    let shape = rect("b1", 0.0, 0.0, 10.0, 10.0);
    assert!(shape.hit_test_segment(Point::new(-5.0, 5.0), Point::new(5.0, 5.0)));
    assert!(!shape.hit_test_segment(Point::new(-5.0, 20.0), Point::new(20.0, 20.0)));
}

#[test]
fn stroke_hit_uses_tolerance() {
    let shape = stroke(&[(0.0, 0.0), (100.0, 0.0)]);
    assert!(shape.hit_test_point(Point::new(150.0, 103.0)));
    assert!(!shape.hit_test_point(Point::new(150.0, 110.0)));
}

// =============================================================================
// Variants
// =============================================================================

#[test]
fn dot_hides_chrome_and_locks_aspect() {
    let dot = Shape::new("d1", "page1", Point::ZERO, ShapeKind::Dot(DotProps::default()));
    assert!(dot.ui().hide_resize_handles);
    assert!(dot.ui().hide_rotate_handle);
    assert!(!dot.can_change_aspect_ratio());
    assert_eq!(dot.bounds(), Bounds::from_rect(0.0, 0.0, 8.0, 8.0));
}

#[test]
fn dot_resize_recenters() {
    let mut dot = Shape::new("d1", "page1", Point::ZERO, ShapeKind::Dot(DotProps::default()));
    let initial = dot.serialized().clone();
    let target = Bounds::from_rect(100.0, 100.0, 20.0, 20.0);
    dot.on_resize(&target, &resize_info(&initial, dot.bounds(), 2.5, 2.5));
    assert_eq!(dot.point(), Point::new(106.0, 106.0));
}

#[test]
fn box_resize_clamps_to_minimum() {
    let mut shape = rect("b1", 0.0, 0.0, 10.0, 10.0);
    let initial = shape.serialized().clone();
    shape.on_resize(&Bounds::from_rect(5.0, 5.0, 0.0, 0.2), &resize_info(&initial, shape.bounds(), 0.0, 0.02));
    assert_eq!(shape.kind(), &ShapeKind::Box(BoxProps { size: Size::new(1.0, 1.0) }));
    assert_eq!(shape.point(), Point::new(5.0, 5.0));
}

#[test]
fn polygon_vertical_flip_toggles_from_initial() {
    let mut shape = Shape::new("p1", "page1", Point::ZERO, ShapeKind::Polygon(PolygonProps::default()));
    let initial = shape.serialized().clone();
    let b = Bounds::from_rect(0.0, -50.0, 100.0, 50.0);
    shape.on_resize(&b, &resize_info(&initial, shape.bounds(), 1.0, -0.5));
    let ShapeKind::Polygon(p) = shape.kind() else { panic!("expected polygon") };
    assert!(p.is_flipped_y);
    shape.on_resize(&b, &resize_info(&initial, shape.bounds(), 1.0, 0.5));
    let ShapeKind::Polygon(p) = shape.kind() else { panic!("expected polygon") };
    assert!(!p.is_flipped_y);
}

#[test]
fn polygon_vertices_stay_inside_box() {
    let props = PolygonProps { sides: 5, ratio: 0.5, ..PolygonProps::default() };
    let verts = polygon::vertices(&props);
    assert_eq!(verts.len(), 10);
    let b = Bounds::from_rect(0.0, 0.0, 100.0, 100.0).expand(1e-9);
    assert!(verts.iter().all(|v| b.contains_point(*v)));
}

#[test]
fn star_alternates_tips_and_valleys() {
    let verts = star::vertices(&StarProps::default());
    assert_eq!(verts.len(), 10);
    let c = Point::new(50.0, 50.0);
    assert!(verts[0].dist(c) > verts[1].dist(c));
}

#[test]
fn huge_vertex_counts_are_clamped_on_load() {
    let registry = ShapeRegistry::with_builtins();
    let star = registry
        .deserialize(json!({ "id": "s", "parentId": "page1", "type": "star", "point": [0, 0], "points": 3_000_000_000_u32 }))
        .unwrap();
    let ShapeKind::Star(props) = star.kind() else { panic!("expected star") };
    assert_eq!(props.points, MAX_VERTICES);
    assert_eq!(star::vertices(props).len(), MAX_VERTICES as usize * 2);
    assert!(star.hit_test_point(Point::new(50.0, 50.0)));

    let polygon = registry
        .deserialize(json!({ "id": "p", "parentId": "page1", "type": "polygon", "point": [0, 0], "sides": 1 }))
        .unwrap();
    assert!(matches!(polygon.kind(), ShapeKind::Polygon(p) if p.sides == MIN_VERTICES));
}

#[test]
fn huge_vertex_counts_are_clamped_on_update() {
    let mut star = Shape::new("st", "page1", Point::ZERO, ShapeKind::Star(StarProps::default()));
    star.update(&ShapePatch { star_points: Some(u32::MAX), ..ShapePatch::default() });
    assert!(matches!(star.kind(), ShapeKind::Star(p) if p.points == MAX_VERTICES));

    let mut shape = Shape::new("p", "page1", Point::ZERO, ShapeKind::Polygon(PolygonProps::default()));
    shape.update(&ShapePatch { sides: Some(u32::MAX), ..ShapePatch::default() });
    assert!(matches!(shape.kind(), ShapeKind::Polygon(p) if p.sides == MAX_VERTICES));
    assert_eq!(polygon::vertices(&PolygonProps { sides: u32::MAX, ..PolygonProps::default() }).len(), MAX_VERTICES as usize);
}

#[test]
fn draw_resize_mirrors_flipped_axis() {
    let mut shape = stroke(&[(0.0, 0.0), (10.0, 20.0)]);
    shape.on_resize_start();
    let initial = shape.serialized().clone();
    let b = Bounds::from_rect(0.0, 0.0, 20.0, 40.0);
    shape.on_resize(&b, &resize_info(&initial, shape.bounds(), -2.0, 2.0));
    let ShapeKind::Draw(p) = shape.kind() else { panic!("expected draw") };
    assert_eq!(p.points[0], StrokePoint::new(20.0, 0.0, 0.5));
    assert_eq!(p.points[1], StrokePoint::new(0.0, 40.0, 0.5));
    assert_eq!(shape.point(), Point::ZERO);
}

#[test]
fn draw_resize_without_start_uses_initial_props() {
    let mut shape = stroke(&[(0.0, 0.0), (10.0, 10.0)]);
    let initial = shape.serialized().clone();
    shape.on_resize(&Bounds::from_rect(0.0, 0.0, 30.0, 30.0), &resize_info(&initial, shape.bounds(), 3.0, 3.0));
    let ShapeKind::Draw(p) = shape.kind() else { panic!("expected draw") };
    assert_eq!(p.points[1].point(), Point::new(30.0, 30.0));
}

#[test]
fn simplify_drops_collinear_points() {
    let pts: Vec<StrokePoint> = (0..10).map(|i| StrokePoint::new(f64::from(i), 0.0, 0.5)).collect();
    let out = draw::simplify(&pts, 1.0);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0], pts[0]);
    assert_eq!(out[1], pts[9]);
}

#[test]
fn simplify_keeps_corners() {
    let pts = vec![
        StrokePoint::new(0.0, 0.0, 0.5),
        StrokePoint::new(5.0, 0.1, 0.5),
        StrokePoint::new(10.0, 0.0, 0.5),
        StrokePoint::new(10.0, 10.0, 0.5),
    ];
    let out = draw::simplify(&pts, 1.0);
    assert_eq!(out.len(), 3);
    assert_eq!(out[1].point(), Point::new(10.0, 0.0));
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn registry_creates_registered_classes() {
    let registry = ShapeRegistry::with_builtins();
    let shape = registry.create("ellipse", "e1", "page1", Point::new(1.0, 2.0)).unwrap();
    assert_eq!(shape.type_name(), "ellipse");
    assert_eq!(shape.point(), Point::new(1.0, 2.0));
}

#[test]
fn registry_rejects_unknown_and_missing_types() {
    let mut registry = ShapeRegistry::with_builtins();
    assert!(registry.deregister("star"));
    assert!(matches!(registry.create("star", "s", "p", Point::ZERO), Err(EditorError::NoShapeClass(t)) if t == "star"));
    assert!(matches!(registry.get(""), Err(EditorError::MissingShapeType)));
    assert!(matches!(registry.deserialize(json!({ "id": "x", "parentId": "p", "point": [0, 0] })), Err(EditorError::MissingShapeType)));
}

#[test]
fn registry_deserializes_json_records() {
    let registry = ShapeRegistry::with_builtins();
    let shape = registry
        .deserialize(json!({ "id": "d", "parentId": "page1", "type": "dot", "point": [3, 4], "radius": 2 }))
        .unwrap();
    assert_eq!(shape.kind(), &ShapeKind::Dot(DotProps { radius: 2.0 }));
}

#[test]
fn class_defaults_can_be_overridden() {
    fn hexagon() -> ShapeKind {
        ShapeKind::Polygon(PolygonProps { sides: 6, ..PolygonProps::default() })
    }
    let mut registry = ShapeRegistry::new();
    registry.register(ShapeClass::POLYGON.with_defaults(hexagon));
    let shape = registry.create("polygon", "p", "page1", Point::ZERO).unwrap();
    assert!(matches!(shape.kind(), ShapeKind::Polygon(p) if p.sides == 6));
}

// =============================================================================
// Properties
// =============================================================================

proptest::proptest! {
    #[test]
    fn derived_geometry_tracks_every_update(
        x in -500f64..500.0,
        y in -500f64..500.0,
        w in 1f64..300.0,
        h in 1f64..300.0,
        r in -7f64..7.0,
    ) {
        let mut shape = rect("b1", 0.0, 0.0, 10.0, 10.0);
        shape.update(&ShapePatch {
            point: Some(Point::new(x, y)),
            rotation: Some(r),
            size: Some(Size::new(w, h)),
            ..ShapePatch::default()
        });

        let fresh = Bounds::from_rect(x, y, w, h);
        let bounds = shape.bounds();
        proptest::prop_assert!((bounds.min_x - fresh.min_x).abs() < 1e-9 && (bounds.max_y - fresh.max_y).abs() < 1e-9);

        let rotated = shape.rotated_bounds();
        let (c, rc) = (bounds.center(), rotated.center());
        proptest::prop_assert!((c.x - rc.x).abs() < 1e-6 && (c.y - rc.y).abs() < 1e-6);
        proptest::prop_assert!(rotated.contains_point(c));
    }
}
