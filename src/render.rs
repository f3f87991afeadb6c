//! Render descriptors handed to the host.
//!
//! The core never draws. Each shape variant describes its body and its
//! selection indicator as a [`Primitive`] in shape-local coordinates, and
//! [`RenderItem`] places that primitive on the page.

use serde::Serialize;

use crate::bounds::Bounds;
use crate::point::{Point, StrokePoint};
use crate::shape::ShapeId;

/// A drawable outline in shape-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Primitive {
    Rect { width: f64, height: f64 },
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
    Polygon { points: Vec<Point> },
    Polyline { points: Vec<Point> },
    Stroke { points: Vec<StrokePoint>, is_complete: bool },
}

/// One shape as the host should paint it this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderItem {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub shape_type: &'static str,
    /// Page-space translation applied before the primitive.
    pub point: Point,
    /// Rotation about the center of `bounds`, in radians.
    pub rotation: f64,
    pub bounds: Bounds,
    pub component: Primitive,
    pub indicator: Primitive,
    pub is_selected: bool,
    pub is_hovered: bool,
    pub is_ghost: bool,
}

/// What the host should draw around the selection for the active state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub selected_bounds: Option<Bounds>,
    pub brush: Option<Bounds>,
    pub show_selection: bool,
    pub show_selection_detail: bool,
    pub show_selection_rotation: bool,
    pub show_resize_handles: bool,
    pub show_rotate_handle: bool,
    pub show_context_bar: bool,
}

/// A full frame: visible shapes in paint order plus the selection overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub items: Vec<RenderItem>,
    pub overlay: Overlay,
}
