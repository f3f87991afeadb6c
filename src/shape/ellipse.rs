//! Ellipse inscribed in a `size` box.

use serde::{Deserialize, Serialize};

use super::{Outline, ShapePatch, box_shape};
use crate::bounds::Bounds;
use crate::consts::DEFAULT_BOX_SIZE;
use crate::point::{Point, Size};
use crate::render::Primitive;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EllipseProps {
    pub size: Size,
}

impl Default for EllipseProps {
    fn default() -> Self {
        Self { size: Size::new(DEFAULT_BOX_SIZE, DEFAULT_BOX_SIZE) }
    }
}

fn radii(props: &EllipseProps) -> (f64, f64) {
    (props.size.w / 2.0, props.size.h / 2.0)
}

pub(super) fn bounds(point: Point, props: &EllipseProps) -> Bounds {
    Bounds::from_rect(point.x, point.y, props.size.w, props.size.h)
}

/// Tight box around the rotated curve, not around the rotated corners.
pub(super) fn rotated_bounds(point: Point, rotation: f64, props: &EllipseProps) -> Bounds {
    let (rx, ry) = radii(props);
    Bounds::of_rotated_ellipse(point, rx, ry, rotation)
}

pub(super) fn outline(point: Point, rotation: f64, props: &EllipseProps) -> Outline {
    let (rx, ry) = radii(props);
    Outline::Ellipse { center: Point::new(point.x + rx, point.y + ry), rx, ry, rotation }
}

pub(super) fn resize(bounds: &Bounds) -> ShapePatch {
    box_shape::resize(bounds)
}

pub(super) fn component(props: &EllipseProps) -> Primitive {
    let (rx, ry) = radii(props);
    Primitive::Ellipse { cx: rx, cy: ry, rx, ry }
}
