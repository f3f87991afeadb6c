//! Selection chrome visibility and host-side hit testing.
//!
//! Browser hosts learn what a pointer landed on from the DOM. Hosts without
//! one ask [`targets_at`] for the stack of targets under a page point and
//! deliver the event to each in turn.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::bounds::{Bounds, ResizeAnchor};
use crate::editor::Editor;
use crate::input::{BoundsHandle, Target};
use crate::point::Point;
use crate::shape::{Shape, ShapeUi};

/// Which parts of the selection box are visible for the active state.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chrome {
    pub bounds: bool,
    pub bounds_detail: bool,
    pub bounds_rotation: bool,
    pub resize_handles: bool,
    pub rotate_handle: bool,
    pub context_bar: bool,
}

impl Chrome {
    /// Chrome for the current selection while the selected tool sits in
    /// `tool_state`. Handles and the context bar only show at rest, and a
    /// flag stays off when every selected shape opts out of it.
    #[must_use]
    pub fn compute(editor: &Editor, tool_state: Option<&str>) -> Self {
        let shapes = editor.selected_shapes();
        if shapes.is_empty() {
            return Self { bounds_rotation: tool_state == Some("pointingRotateHandle"), ..Self::default() };
        }
        let shown = |hidden: fn(&ShapeUi) -> bool| !shapes.iter().all(|s| hidden(&s.ui()));
        let idle = tool_state == Some("idle");
        Self {
            bounds: shown(|ui| ui.hide_bounds),
            bounds_detail: shown(|ui| ui.hide_bounds_detail),
            bounds_rotation: matches!(tool_state, Some("rotatingShapes" | "pointingRotateHandle")),
            resize_handles: idle && shown(|ui| ui.hide_resize_handles),
            rotate_handle: idle && shown(|ui| ui.hide_rotate_handle),
            context_bar: idle && shown(|ui| ui.hide_context_bar),
        }
    }
}

/// Where the rotate handle sits on `bounds` before rotation.
#[must_use]
pub fn rotate_handle_position(bounds: &Bounds, offset: f64) -> Point {
    Point::new(bounds.center().x, bounds.min_y - offset)
}

/// The selection-box handle under `local`, a point already expressed in
/// the box's unrotated frame. Corners win over edges.
fn handle_at(bounds: &Bounds, local: Point, radius: f64, chrome: &Chrome, rotate_offset: f64) -> Option<BoundsHandle> {
    if chrome.rotate_handle && local.dist(rotate_handle_position(bounds, rotate_offset)) <= radius {
        return Some(BoundsHandle::Rotate);
    }
    if !chrome.resize_handles {
        return None;
    }
    let corner = ResizeAnchor::ALL.into_iter().filter(|a| a.is_corner()).find(|a| local.dist(a.position(bounds)) <= radius);
    if let Some(anchor) = corner {
        return Some(BoundsHandle::Resize(anchor));
    }
    let [tl, tr, br, bl] = bounds.corners();
    let edges = [(ResizeAnchor::N, tl, tr), (ResizeAnchor::E, tr, br), (ResizeAnchor::S, br, bl), (ResizeAnchor::W, bl, tl)];
    edges.into_iter().find(|(_, a, b)| local.dist_to_segment(*a, *b) <= radius).map(|(anchor, ..)| BoundsHandle::Resize(anchor))
}

/// Event targets stacked under page point `point`, topmost first: a
/// selection handle, visible shapes in reverse paint order, the selection
/// background, and always the canvas last.
#[must_use]
pub fn targets_at(editor: &Editor, point: Point, chrome: &Chrome) -> Vec<Target> {
    let mut targets = Vec::new();
    let zoom = editor.viewport.camera().zoom;
    let selection = if chrome.bounds { editor.selected_bounds() } else { None };
    let local = selection.map(|b| (b, point.rot_with(b.center(), -b.rotation)));

    if let Some((bounds, local)) = local {
        let config = editor.config();
        let radius = config.handle_radius_px / zoom;
        let offset = config.rotate_handle_offset_px / zoom;
        if let Some(handle) = handle_at(&bounds, local, radius, chrome, offset) {
            targets.push(Target::Bounds(handle));
        }
    }

    if let Ok(page) = editor.current_page() {
        targets.extend(
            page.shapes()
                .iter()
                .rev()
                .filter(|s| !s.is_hidden() && s.hit_test_point(point))
                .map(|s: &Shape| Target::Shape(s.id().to_owned())),
        );
    }

    if let Some((bounds, local)) = local {
        if bounds.contains_point(local) {
            targets.push(Target::Bounds(BoundsHandle::Background));
        }
    }

    targets.push(Target::Canvas);
    targets
}
