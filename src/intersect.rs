//! Intersection and containment predicates used by shape hit-testing.

#[cfg(test)]
#[path = "intersect_test.rs"]
mod intersect_test;

use crate::bounds::Bounds;
use crate::point::Point;

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// True when segments `a1-a2` and `b1-b2` share at least one point.
#[must_use]
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0)) && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0)) {
        return true;
    }

    (d1 == 0.0 && on_segment(a1, b1, b2))
        || (d2 == 0.0 && on_segment(a2, b1, b2))
        || (d3 == 0.0 && on_segment(b1, a1, a2))
        || (d4 == 0.0 && on_segment(b2, a1, a2))
}

/// True when the segment crosses any edge of `bounds`.
#[must_use]
pub fn segment_intersects_bounds(a: Point, b: Point, bounds: &Bounds) -> bool {
    bounds.edges().iter().any(|&(e1, e2)| segments_intersect(a, b, e1, e2))
}

/// True when the segment crosses any segment of the polyline.
#[must_use]
pub fn segment_intersects_polyline(a: Point, b: Point, points: &[Point]) -> bool {
    points.windows(2).any(|w| segments_intersect(a, b, w[0], w[1]))
}

/// True when the segment crosses the closed outline of `polygon`.
#[must_use]
pub fn segment_intersects_polygon(a: Point, b: Point, polygon: &[Point]) -> bool {
    closed_edges(polygon).any(|(p, q)| segments_intersect(a, b, p, q))
}

/// True when any segment of the open polyline crosses an edge of `bounds`.
#[must_use]
pub fn polyline_intersects_bounds(points: &[Point], bounds: &Bounds) -> bool {
    points.windows(2).any(|w| segment_intersects_bounds(w[0], w[1], bounds))
}

/// True when the closed outline of `polygon` crosses an edge of `bounds`.
#[must_use]
pub fn polygon_intersects_bounds(polygon: &[Point], bounds: &Bounds) -> bool {
    closed_edges(polygon).any(|(p, q)| segment_intersects_bounds(p, q, bounds))
}

fn closed_edges(polygon: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = polygon.len();
    (0..if n > 1 { n } else { 0 }).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Even-odd point-in-polygon test.
#[must_use]
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    for (a, b) in closed_edges(polygon) {
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
    }
    inside
}

/// Map a point into the unit-circle frame of an ellipse centered at
/// `center` with radii `rx`/`ry`, rotated by `rotation`.
fn to_unit_circle(p: Point, center: Point, rx: f64, ry: f64, rotation: f64) -> Point {
    let local = (p - center).rot(-rotation);
    Point::new(local.x / rx, local.y / ry)
}

/// True when `p` lies inside (or on) the ellipse.
#[must_use]
pub fn point_in_ellipse(p: Point, center: Point, rx: f64, ry: f64, rotation: f64) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    to_unit_circle(p, center, rx, ry, rotation).len() <= 1.0
}

/// True when segment `a-b` crosses the outline of the ellipse.
#[must_use]
pub fn segment_intersects_ellipse(a: Point, b: Point, center: Point, rx: f64, ry: f64, rotation: f64) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let p = to_unit_circle(a, center, rx, ry, rotation);
    let q = to_unit_circle(b, center, rx, ry, rotation);
    let d = q - p;

    let qa = d.dot(d);
    let qb = 2.0 * p.dot(d);
    let qc = p.dot(p) - 1.0;

    if qa == 0.0 {
        return qc.abs() < f64::EPSILON;
    }

    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return false;
    }
    let root = disc.sqrt();
    let t1 = (-qb - root) / (2.0 * qa);
    let t2 = (-qb + root) / (2.0 * qa);
    (0.0..=1.0).contains(&t1) || (0.0..=1.0).contains(&t2)
}

/// True when the outline of the ellipse crosses an edge of `bounds`.
#[must_use]
pub fn ellipse_intersects_bounds(center: Point, rx: f64, ry: f64, rotation: f64, bounds: &Bounds) -> bool {
    bounds.edges().iter().any(|&(e1, e2)| segment_intersects_ellipse(e1, e2, center, rx, ry, rotation))
}

/// Shortest distance from `p` to an open polyline.
#[must_use]
pub fn dist_to_polyline(p: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => p.dist(*only),
        _ => points.windows(2).map(|w| p.dist_to_segment(w[0], w[1])).fold(f64::INFINITY, f64::min),
    }
}
