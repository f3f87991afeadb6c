//! Star with `points` outer tips; inner vertices sit at `ratio` of the
//! outer radius.

use serde::{Deserialize, Serialize};

use super::{Outline, ShapePatch, SerializedShape, polygon};
use crate::bounds::Bounds;
use crate::consts::{DEFAULT_BOX_SIZE, DEFAULT_STAR_POINTS, STAR_INNER_RATIO, TAU};
use crate::point::{Point, Size};
use crate::render::Primitive;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StarProps {
    pub size: Size,
    #[serde(deserialize_with = "polygon::vertex_count")]
    pub points: u32,
    pub ratio: f64,
    pub is_flipped_y: bool,
}

impl Default for StarProps {
    fn default() -> Self {
        Self {
            size: Size::new(DEFAULT_BOX_SIZE, DEFAULT_BOX_SIZE),
            points: DEFAULT_STAR_POINTS,
            ratio: STAR_INNER_RATIO,
            is_flipped_y: false,
        }
    }
}

/// Alternating outer/inner vertices in shape-local space.
#[must_use]
pub fn vertices(props: &StarProps) -> Vec<Point> {
    let Size { w, h } = props.size;
    let tips = polygon::clamp_vertex_count(props.points);
    let center = Point::new(w / 2.0, h / 2.0);
    let rx = center.x.max(1.0);
    let ry = center.y.max(1.0);
    let ratio = props.ratio.clamp(0.0, 1.0);
    let step = std::f64::consts::PI / f64::from(tips);

    let points = (0..tips * 2)
        .map(|i| {
            let t = -TAU + f64::from(i) * step;
            let k = if i % 2 == 0 { 1.0 } else { ratio };
            center + Point::new(rx * k * t.cos(), ry * k * t.sin())
        })
        .collect();

    polygon::finish(points, props.size, props.is_flipped_y)
}

pub(super) fn bounds(point: Point, props: &StarProps) -> Bounds {
    Bounds::from_rect(point.x, point.y, props.size.w, props.size.h)
}

pub(super) fn outline(point: Point, rotation: f64, props: &StarProps) -> Outline {
    Outline::Polygon(polygon::to_page(vertices(props), point, rotation, props.size))
}

pub(super) fn resize(bounds: &Bounds, scale_y: f64, initial: &SerializedShape) -> ShapePatch {
    polygon::resize(bounds, scale_y, initial)
}

pub(super) fn component(props: &StarProps) -> Primitive {
    Primitive::Polygon { points: vertices(props) }
}
