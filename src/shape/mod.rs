//! Shape model: the closed set of shape variants, their serialized record,
//! sparse updates, and geometry dispatch.
//!
//! A [`Shape`] owns its live record and a cached deep copy handed out by
//! [`Shape::serialized`]. Every mutation goes through [`Shape::update`],
//! which bumps the nonce and drops the cache.

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

pub mod box_shape;
pub mod dot;
pub mod draw;
pub mod ellipse;
pub mod polygon;
pub mod registry;
pub mod star;

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::bounds::{Bounds, ResizeAnchor};
use crate::consts::DRAW_HIT_TOLERANCE;
use crate::intersect;
use crate::point::{Point, Size, StrokePoint};
use crate::render::Primitive;

pub use box_shape::BoxProps;
pub use dot::DotProps;
pub use draw::DrawProps;
pub use ellipse::EllipseProps;
pub use polygon::PolygonProps;
pub use registry::{ShapeClass, ShapeRegistry};
pub use star::StarProps;

pub type ShapeId = String;

// =============================================================================
// Variants
// =============================================================================

/// Variant-specific props, tagged by `type` in the serialized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShapeKind {
    Box(BoxProps),
    Ellipse(EllipseProps),
    Dot(DotProps),
    Polygon(PolygonProps),
    Star(StarProps),
    Draw(DrawProps),
}

impl ShapeKind {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Box(_) => "box",
            Self::Ellipse(_) => "ellipse",
            Self::Dot(_) => "dot",
            Self::Polygon(_) => "polygon",
            Self::Star(_) => "star",
            Self::Draw(_) => "draw",
        }
    }

    /// Selection chrome this variant opts out of.
    #[must_use]
    pub fn ui(&self) -> ShapeUi {
        match self {
            Self::Dot(_) => ShapeUi {
                hide_bounds: true,
                hide_bounds_detail: true,
                hide_resize_handles: true,
                hide_rotate_handle: true,
                hide_context_bar: false,
            },
            _ => ShapeUi::default(),
        }
    }

    #[must_use]
    pub fn can_change_aspect_ratio(&self) -> bool {
        !matches!(self, Self::Dot(_))
    }

    fn bounds(&self, point: Point) -> Bounds {
        match self {
            Self::Box(p) => box_shape::bounds(point, p),
            Self::Ellipse(p) => ellipse::bounds(point, p),
            Self::Dot(p) => dot::bounds(point, p),
            Self::Polygon(p) => polygon::bounds(point, p),
            Self::Star(p) => star::bounds(point, p),
            Self::Draw(p) => draw::bounds(point, p),
        }
    }

    fn rotated_bounds(&self, point: Point, rotation: f64) -> Bounds {
        match self {
            Self::Ellipse(p) => ellipse::rotated_bounds(point, rotation, p),
            Self::Draw(p) => draw::rotated_bounds(point, rotation, p),
            _ => self.bounds(point).rotated(rotation),
        }
    }

    fn outline(&self, point: Point, rotation: f64) -> Outline {
        match self {
            Self::Box(p) => box_shape::outline(point, rotation, p),
            Self::Ellipse(p) => ellipse::outline(point, rotation, p),
            Self::Dot(p) => dot::outline(point, p),
            Self::Polygon(p) => polygon::outline(point, rotation, p),
            Self::Star(p) => star::outline(point, rotation, p),
            Self::Draw(p) => draw::outline(point, rotation, p),
        }
    }

    fn component(&self) -> Primitive {
        match self {
            Self::Box(p) => box_shape::component(p),
            Self::Ellipse(p) => ellipse::component(p),
            Self::Dot(p) => dot::component(p),
            Self::Polygon(p) => polygon::component(p),
            Self::Star(p) => star::component(p),
            Self::Draw(p) => draw::component(p),
        }
    }

    fn indicator(&self) -> Primitive {
        match self {
            Self::Draw(p) => draw::indicator(p),
            other => other.component(),
        }
    }
}

/// Selection chrome flags a variant can hide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ShapeUi {
    pub hide_bounds: bool,
    pub hide_bounds_detail: bool,
    pub hide_resize_handles: bool,
    pub hide_rotate_handle: bool,
    pub hide_context_bar: bool,
}

/// Page-space outline used for hit-testing.
#[derive(Debug, Clone)]
pub(crate) enum Outline {
    Polygon(Vec<Point>),
    Ellipse { center: Point, rx: f64, ry: f64, rotation: f64 },
    Stroke(Vec<Point>),
}

impl Outline {
    fn hit_point(&self, p: Point) -> bool {
        match self {
            Self::Polygon(poly) => intersect::point_in_polygon(p, poly),
            Self::Ellipse { center, rx, ry, rotation } => intersect::point_in_ellipse(p, *center, *rx, *ry, *rotation),
            Self::Stroke(points) => intersect::dist_to_polyline(p, points) <= DRAW_HIT_TOLERANCE,
        }
    }

    fn hit_segment(&self, a: Point, b: Point) -> bool {
        match self {
            Self::Polygon(poly) => intersect::segment_intersects_polygon(a, b, poly) || self.hit_point(a),
            Self::Ellipse { center, rx, ry, rotation } => {
                intersect::segment_intersects_ellipse(a, b, *center, *rx, *ry, *rotation) || self.hit_point(a)
            }
            Self::Stroke(points) => match points.as_slice() {
                [only] => only.dist_to_segment(a, b) <= DRAW_HIT_TOLERANCE,
                _ => intersect::segment_intersects_polyline(a, b, points),
            },
        }
    }

    fn intersects_bounds(&self, b: &Bounds) -> bool {
        match self {
            Self::Polygon(poly) => intersect::polygon_intersects_bounds(poly, b),
            Self::Ellipse { center, rx, ry, rotation } => intersect::ellipse_intersects_bounds(*center, *rx, *ry, *rotation, b),
            Self::Stroke(points) => intersect::polyline_intersects_bounds(points, b),
        }
    }
}

// =============================================================================
// Serialized record and sparse updates
// =============================================================================

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(v: &bool) -> bool {
    !*v
}

/// Plain-data record of a shape: common props plus the tagged variant props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct SerializedShape {
    pub id: ShapeId,
    pub parent_id: String,
    pub point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_hidden: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_ghost: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_aspect_ratio_locked: bool,
    #[serde(default)]
    pub nonce: u64,
    #[serde(flatten)]
    pub kind: ShapeKind,
}

/// Sparse update: every `Some` field overwrites the matching prop.
/// Variant props that do not apply to the shape's variant are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ghost: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_aspect_ratio_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sides: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star_points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_flipped_y: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<StrokePoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
}

impl ShapePatch {
    #[must_use]
    pub fn point(point: Point) -> Self {
        Self { point: Some(point), ..Self::default() }
    }

    fn apply_to(&self, data: &mut SerializedShape) {
        if let Some(v) = &self.parent_id {
            data.parent_id.clone_from(v);
        }
        if let Some(v) = self.point {
            data.point = v;
        }
        if let Some(v) = self.rotation {
            data.rotation = Some(v);
        }
        if let Some(v) = &self.name {
            data.name = Some(v.clone());
        }
        if let Some(v) = self.is_hidden {
            data.is_hidden = v;
        }
        if let Some(v) = self.is_locked {
            data.is_locked = v;
        }
        if let Some(v) = self.is_ghost {
            data.is_ghost = v;
        }
        if let Some(v) = self.is_aspect_ratio_locked {
            data.is_aspect_ratio_locked = v;
        }

        match &mut data.kind {
            ShapeKind::Box(p) => {
                if let Some(s) = self.size {
                    p.size = s;
                }
            }
            ShapeKind::Ellipse(p) => {
                if let Some(s) = self.size {
                    p.size = s;
                }
            }
            ShapeKind::Dot(p) => {
                if let Some(r) = self.radius {
                    p.radius = r;
                }
            }
            ShapeKind::Polygon(p) => {
                if let Some(s) = self.size {
                    p.size = s;
                }
                if let Some(n) = self.sides {
                    p.sides = polygon::clamp_vertex_count(n);
                }
                if let Some(r) = self.ratio {
                    p.ratio = r;
                }
                if let Some(f) = self.is_flipped_y {
                    p.is_flipped_y = f;
                }
            }
            ShapeKind::Star(p) => {
                if let Some(s) = self.size {
                    p.size = s;
                }
                if let Some(n) = self.star_points {
                    p.points = polygon::clamp_vertex_count(n);
                }
                if let Some(r) = self.ratio {
                    p.ratio = r;
                }
                if let Some(f) = self.is_flipped_y {
                    p.is_flipped_y = f;
                }
            }
            ShapeKind::Draw(p) => {
                if let Some(pts) = &self.points {
                    p.points.clone_from(pts);
                }
                if let Some(c) = self.is_complete {
                    p.is_complete = c;
                }
            }
        }
    }
}

/// Context passed to [`Shape::on_resize`].
#[derive(Debug, Clone, Copy)]
pub struct ResizeInfo<'a> {
    pub handle: ResizeAnchor,
    pub scale_x: f64,
    pub scale_y: f64,
    /// The shape's center as a fraction of the selection's center hull.
    pub transform_origin: Point,
    pub initial_bounds: Bounds,
    pub initial_props: &'a SerializedShape,
}

// =============================================================================
// Shape
// =============================================================================

#[derive(Debug, Clone)]
pub struct Shape {
    data: SerializedShape,
    cache: OnceCell<SerializedShape>,
    normalized: Option<Vec<StrokePoint>>,
}

impl Shape {
    pub fn new(id: impl Into<ShapeId>, parent_id: impl Into<String>, point: Point, kind: ShapeKind) -> Self {
        Self::from_serialized(SerializedShape {
            id: id.into(),
            parent_id: parent_id.into(),
            point,
            rotation: None,
            name: None,
            is_hidden: false,
            is_locked: false,
            is_ghost: false,
            is_aspect_ratio_locked: false,
            nonce: 0,
            kind,
        })
    }

    #[must_use]
    pub fn from_serialized(data: SerializedShape) -> Self {
        let cache = OnceCell::from(data.clone());
        Self { data, cache, normalized: None }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.data.rotation = Some(rotation);
        self.cache = OnceCell::from(self.data.clone());
        self
    }

    // ── Props ───────────────────────────────────────────────────

    #[must_use]
    pub fn id(&self) -> &str {
        &self.data.id
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.data.kind.type_name()
    }

    #[must_use]
    pub fn kind(&self) -> &ShapeKind {
        &self.data.kind
    }

    #[must_use]
    pub fn parent_id(&self) -> &str {
        &self.data.parent_id
    }

    #[must_use]
    pub fn point(&self) -> Point {
        self.data.point
    }

    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.data.rotation.unwrap_or(0.0)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.data.is_hidden
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.data.is_locked
    }

    #[must_use]
    pub fn is_ghost(&self) -> bool {
        self.data.is_ghost
    }

    #[must_use]
    pub fn is_aspect_ratio_locked(&self) -> bool {
        self.data.is_aspect_ratio_locked
    }

    #[must_use]
    pub fn can_change_aspect_ratio(&self) -> bool {
        self.data.kind.can_change_aspect_ratio()
    }

    #[must_use]
    pub fn nonce(&self) -> u64 {
        self.data.nonce
    }

    #[must_use]
    pub fn ui(&self) -> ShapeUi {
        self.data.kind.ui()
    }

    // ── Geometry ────────────────────────────────────────────────

    /// Unrotated page-space bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.data.kind.bounds(self.data.point)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Axis-aligned bounds of the shape after rotation.
    #[must_use]
    pub fn rotated_bounds(&self) -> Bounds {
        self.data.kind.rotated_bounds(self.data.point, self.rotation())
    }

    fn outline(&self) -> Outline {
        self.data.kind.outline(self.data.point, self.rotation())
    }

    #[must_use]
    pub fn hit_test_point(&self, p: Point) -> bool {
        self.rotated_bounds().expand(DRAW_HIT_TOLERANCE).contains_point(p) && self.outline().hit_point(p)
    }

    #[must_use]
    pub fn hit_test_segment(&self, a: Point, b: Point) -> bool {
        self.outline().hit_segment(a, b)
    }

    /// True when `b` encloses the shape or crosses its outline.
    #[must_use]
    pub fn hit_test_bounds(&self, b: &Bounds) -> bool {
        let rotated = self.rotated_bounds();
        if b.contains(&rotated) {
            return true;
        }
        rotated.collides(b) && self.outline().intersects_bounds(b)
    }

    // ── Mutation ────────────────────────────────────────────────

    /// Apply a sparse update. Always marks the shape dirty.
    pub fn update(&mut self, patch: &ShapePatch) {
        patch.apply_to(&mut self.data);
        self.touch();
    }

    /// Overwrite every prop with `snapshot`, keeping this shape's id.
    pub fn restore(&mut self, snapshot: &SerializedShape) {
        let nonce = self.data.nonce;
        let id = std::mem::take(&mut self.data.id);
        self.data = snapshot.clone();
        self.data.id = id;
        self.data.nonce = nonce;
        self.touch();
    }

    fn touch(&mut self) {
        self.data.nonce += 1;
        self.cache.take();
    }

    /// Capture per-gesture state ahead of a resize.
    pub fn on_resize_start(&mut self) {
        self.normalized = match &self.data.kind {
            ShapeKind::Draw(p) => Some(draw::normalized(p)),
            _ => None,
        };
    }

    /// Fit the shape to `bounds` as part of a resize gesture.
    pub fn on_resize(&mut self, bounds: &Bounds, info: &ResizeInfo<'_>) {
        let patch = match &self.data.kind {
            ShapeKind::Box(_) => box_shape::resize(bounds),
            ShapeKind::Ellipse(_) => ellipse::resize(bounds),
            ShapeKind::Dot(p) => dot::resize(bounds, p),
            ShapeKind::Polygon(_) => polygon::resize(bounds, info.scale_y, info.initial_props),
            ShapeKind::Star(_) => star::resize(bounds, info.scale_y, info.initial_props),
            ShapeKind::Draw(_) => draw::resize(bounds, info, self.normalized.as_deref()),
        };
        self.update(&patch);
    }

    // ── Serialization ───────────────────────────────────────────

    /// Deep copy of the current props, rebuilt only after a mutation.
    #[must_use]
    pub fn serialized(&self) -> &SerializedShape {
        self.cache.get_or_init(|| self.data.clone())
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.cache.get().is_none()
    }

    // ── Rendering ───────────────────────────────────────────────

    #[must_use]
    pub fn component(&self) -> Primitive {
        self.data.kind.component()
    }

    #[must_use]
    pub fn indicator(&self) -> Primitive {
        self.data.kind.indicator()
    }
}
