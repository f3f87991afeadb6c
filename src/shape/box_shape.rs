//! Rectangle sized by `size`, positioned by its top-left corner.

use serde::{Deserialize, Serialize};

use super::{Outline, ShapePatch};
use crate::bounds::Bounds;
use crate::consts::{DEFAULT_BOX_SIZE, MIN_SHAPE_SIZE};
use crate::point::{Point, Size};
use crate::render::Primitive;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxProps {
    pub size: Size,
}

impl Default for BoxProps {
    fn default() -> Self {
        Self { size: Size::new(DEFAULT_BOX_SIZE, DEFAULT_BOX_SIZE) }
    }
}

pub(super) fn bounds(point: Point, props: &BoxProps) -> Bounds {
    Bounds::from_rect(point.x, point.y, props.size.w, props.size.h)
}

pub(super) fn outline(point: Point, rotation: f64, props: &BoxProps) -> Outline {
    Outline::Polygon(bounds(point, props).rotated_corners(rotation).to_vec())
}

/// Fill `bounds` exactly, never collapsing below the minimum size.
pub(super) fn resize(bounds: &Bounds) -> ShapePatch {
    ShapePatch {
        point: Some(bounds.min()),
        size: Some(Size::new(bounds.width.max(MIN_SHAPE_SIZE), bounds.height.max(MIN_SHAPE_SIZE))),
        ..ShapePatch::default()
    }
}

pub(super) fn component(props: &BoxProps) -> Primitive {
    Primitive::Rect { width: props.size.w, height: props.size.h }
}
