//! Freehand stroke. Points are stored relative to the shape's `point`.

use serde::{Deserialize, Serialize};

use super::{Outline, ResizeInfo, ShapeKind, ShapePatch};
use crate::bounds::Bounds;
use crate::point::{Point, StrokePoint};
use crate::render::Primitive;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawProps {
    pub points: Vec<StrokePoint>,
    pub is_complete: bool,
}

fn local_bounds(props: &DrawProps) -> Bounds {
    let pts: Vec<Point> = props.points.iter().map(|p| p.point()).collect();
    Bounds::from_points(&pts, 0.0)
}

pub(super) fn bounds(point: Point, props: &DrawProps) -> Bounds {
    local_bounds(props).translate(point)
}

fn page_points(point: Point, rotation: f64, props: &DrawProps) -> Vec<Point> {
    let center = bounds(point, props).center();
    props.points.iter().map(|p| (p.point() + point).rot_with(center, rotation)).collect()
}

pub(super) fn rotated_bounds(point: Point, rotation: f64, props: &DrawProps) -> Bounds {
    if rotation == 0.0 || props.points.is_empty() {
        return bounds(point, props);
    }
    Bounds::from_points(&page_points(point, rotation, props), 0.0)
}

pub(super) fn outline(point: Point, rotation: f64, props: &DrawProps) -> Outline {
    Outline::Stroke(page_points(point, rotation, props))
}

/// Points scaled into the unit square of the stroke's own bounds.
pub(super) fn normalized(props: &DrawProps) -> Vec<StrokePoint> {
    let lb = local_bounds(props);
    let w = if lb.width == 0.0 { 1.0 } else { lb.width };
    let h = if lb.height == 0.0 { 1.0 } else { lb.height };
    props
        .points
        .iter()
        .map(|p| StrokePoint::new((p.x - lb.min_x) / w, (p.y - lb.min_y) / h, p.pressure))
        .collect()
}

/// Stretch the normalized stroke over `bounds`, mirroring flipped axes.
/// Falls back to the initial props when no normalized cache exists.
pub(super) fn resize(bounds: &Bounds, info: &ResizeInfo<'_>, cached: Option<&[StrokePoint]>) -> ShapePatch {
    let computed;
    let norm = if let Some(n) = cached {
        n
    } else {
        computed = match &info.initial_props.kind {
            ShapeKind::Draw(p) => normalized(p),
            _ => Vec::new(),
        };
        computed.as_slice()
    };

    let flip_x = info.scale_x < 0.0;
    let flip_y = info.scale_y < 0.0;
    let points = norm
        .iter()
        .map(|p| {
            let x = if flip_x { 1.0 - p.x } else { p.x };
            let y = if flip_y { 1.0 - p.y } else { p.y };
            StrokePoint::new(x * bounds.width, y * bounds.height, p.pressure)
        })
        .collect();

    ShapePatch { point: Some(bounds.min()), points: Some(points), ..ShapePatch::default() }
}

/// Ramer-Douglas-Peucker reduction; endpoints always survive.
#[must_use]
pub fn simplify(points: &[StrokePoint], tolerance: f64) -> Vec<StrokePoint> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    mark(points, 0, points.len() - 1, tolerance, &mut keep);
    points.iter().zip(keep).filter_map(|(p, k)| k.then_some(*p)).collect()
}

fn mark(points: &[StrokePoint], first: usize, last: usize, tolerance: f64, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }
    let a = points[first].point();
    let b = points[last].point();
    let (idx, dist) = (first + 1..last)
        .map(|i| (i, points[i].point().dist_to_segment(a, b)))
        .fold((first, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if dist > tolerance {
        keep[idx] = true;
        mark(points, first, idx, tolerance, keep);
        mark(points, idx, last, tolerance, keep);
    }
}

pub(super) fn component(props: &DrawProps) -> Primitive {
    Primitive::Stroke { points: props.points.clone(), is_complete: props.is_complete }
}

pub(super) fn indicator(props: &DrawProps) -> Primitive {
    Primitive::Polyline { points: props.points.iter().map(|p| p.point()).collect() }
}
