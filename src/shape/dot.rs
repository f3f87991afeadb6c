//! Fixed-radius dot. Resizing only recenters it.

use serde::{Deserialize, Serialize};

use super::{Outline, ShapePatch};
use crate::bounds::Bounds;
use crate::consts::DEFAULT_DOT_RADIUS;
use crate::point::Point;
use crate::render::Primitive;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DotProps {
    pub radius: f64,
}

impl Default for DotProps {
    fn default() -> Self {
        Self { radius: DEFAULT_DOT_RADIUS }
    }
}

pub(super) fn bounds(point: Point, props: &DotProps) -> Bounds {
    let d = props.radius * 2.0;
    Bounds::from_rect(point.x, point.y, d, d)
}

pub(super) fn outline(point: Point, props: &DotProps) -> Outline {
    let r = props.radius;
    Outline::Ellipse { center: Point::new(point.x + r, point.y + r), rx: r, ry: r, rotation: 0.0 }
}

/// Keep the radius and move the dot to the center of `bounds`.
pub(super) fn resize(bounds: &Bounds, props: &DotProps) -> ShapePatch {
    let c = bounds.center();
    ShapePatch { point: Some(Point::new(c.x - props.radius, c.y - props.radius)), ..ShapePatch::default() }
}

pub(super) fn component(props: &DotProps) -> Primitive {
    let r = props.radius;
    Primitive::Circle { cx: r, cy: r, r }
}
