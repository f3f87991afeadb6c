//! Regular polygon inscribed in a `size` box, optionally pinched inwards
//! between vertices by `ratio` and mirrored vertically by `is_flipped_y`.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Outline, ShapePatch, SerializedShape, ShapeKind};
use crate::bounds::Bounds;
use crate::consts::{DEFAULT_BOX_SIZE, DEFAULT_POLYGON_SIDES, MAX_VERTICES, MIN_SHAPE_SIZE, MIN_VERTICES, PI2, TAU};
use crate::point::{Point, Size};
use crate::render::Primitive;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolygonProps {
    pub size: Size,
    #[serde(deserialize_with = "vertex_count")]
    pub sides: u32,
    pub ratio: f64,
    pub is_flipped_y: bool,
}

impl Default for PolygonProps {
    fn default() -> Self {
        Self { size: Size::new(DEFAULT_BOX_SIZE, DEFAULT_BOX_SIZE), sides: DEFAULT_POLYGON_SIDES, ratio: 1.0, is_flipped_y: false }
    }
}

/// Clamp a side or tip count into `MIN_VERTICES..=MAX_VERTICES`.
#[must_use]
pub fn clamp_vertex_count(n: u32) -> u32 {
    n.clamp(MIN_VERTICES, MAX_VERTICES)
}

pub(super) fn vertex_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    u32::deserialize(deserializer).map(clamp_vertex_count)
}

/// Vertices in shape-local space, centered in the `size` box.
#[must_use]
pub fn vertices(props: &PolygonProps) -> Vec<Point> {
    let Size { w, h } = props.size;
    let sides = clamp_vertex_count(props.sides);
    let center = Point::new(w / 2.0, h / 2.0);
    let rx = center.x.max(1.0);
    let ry = center.y.max(1.0);
    let step = PI2 / f64::from(sides);
    let ratio = props.ratio.clamp(0.0, 1.0);

    let mut points = Vec::with_capacity(sides as usize * 2);
    for i in 0..sides {
        let t1 = -TAU + f64::from(i) * step;
        let t2 = t1 + step;
        let p1 = center + Point::new(rx * t1.cos(), ry * t1.sin());
        let p3 = center + Point::new(rx * t2.cos(), ry * t2.sin());
        points.push(p1);
        if ratio < 1.0 {
            let mid = p1.med(p3);
            points.push(mid.nudge(center, center.dist(mid) * (1.0 - ratio)));
        }
    }

    finish(points, props.size, props.is_flipped_y)
}

/// Mirror if flipped, then shift so the vertex hull is centered in the box.
pub(super) fn finish(mut points: Vec<Point>, size: Size, is_flipped_y: bool) -> Vec<Point> {
    if is_flipped_y {
        for p in &mut points {
            p.y = size.h - p.y;
        }
    }
    let offset = Point::new(size.w / 2.0, size.h / 2.0) - Bounds::from_points(&points, 0.0).center();
    points.into_iter().map(|p| p + offset).collect()
}

/// Rotate local vertices into page space about the box center.
pub(super) fn to_page(local: Vec<Point>, point: Point, rotation: f64, size: Size) -> Vec<Point> {
    let center = point + Point::new(size.w / 2.0, size.h / 2.0);
    local.into_iter().map(|v| (v + point).rot_with(center, rotation)).collect()
}

pub(super) fn bounds(point: Point, props: &PolygonProps) -> Bounds {
    Bounds::from_rect(point.x, point.y, props.size.w, props.size.h)
}

pub(super) fn outline(point: Point, rotation: f64, props: &PolygonProps) -> Outline {
    Outline::Polygon(to_page(vertices(props), point, rotation, props.size))
}

/// Fill `bounds`; a vertical flip toggles the flip recorded when the
/// resize began.
pub(super) fn resize(bounds: &Bounds, scale_y: f64, initial: &SerializedShape) -> ShapePatch {
    let was_flipped = match &initial.kind {
        ShapeKind::Polygon(p) => p.is_flipped_y,
        ShapeKind::Star(p) => p.is_flipped_y,
        _ => false,
    };
    ShapePatch {
        point: Some(bounds.min()),
        size: Some(Size::new(bounds.width.max(MIN_SHAPE_SIZE), bounds.height.max(MIN_SHAPE_SIZE))),
        is_flipped_y: Some(if scale_y < 0.0 { !was_flipped } else { was_flipped }),
        ..ShapePatch::default()
    }
}

pub(super) fn component(props: &PolygonProps) -> Primitive {
    Primitive::Polygon { points: vertices(props) }
}
