//! Select tool: hover, click and marquee selection, plus the translate,
//! resize, and rotate gestures on the current selection.
//!
//! ```text
//! idle ─┬─ pointingCanvas ─────────── brushing
//!       ├─ pointingShape ──────────┐
//!       ├─ pointingSelectedShape ──┼─ translating
//!       ├─ pointingShapeBehindBounds
//!       ├─ pointingBoundsBackground┘
//!       ├─ pointingResizeHandle ──── resizing
//!       ├─ pointingRotateHandle ──── rotatingShapes
//!       └─ pinching
//! ```

mod brushing;
mod idle;
mod pinching;
mod pointing;
mod resizing;
mod rotating;
mod translating;

use super::{Tool, SELECT};
use crate::error::Result;
use crate::shape::SerializedShape;
use crate::state::{Ctx, Passive, StateNode, TransitionData};

pub const IDLE: &str = "idle";
pub const BRUSHING: &str = "brushing";
pub const POINTING_CANVAS: &str = "pointingCanvas";
pub const POINTING_SHAPE: &str = "pointingShape";
pub const POINTING_SELECTED_SHAPE: &str = "pointingSelectedShape";
pub const POINTING_SHAPE_BEHIND_BOUNDS: &str = "pointingShapeBehindBounds";
pub const POINTING_BOUNDS_BACKGROUND: &str = "pointingBoundsBackground";
pub const POINTING_RESIZE_HANDLE: &str = "pointingResizeHandle";
pub const POINTING_ROTATE_HANDLE: &str = "pointingRotateHandle";
pub const TRANSLATING: &str = "translating";
pub const RESIZING: &str = "resizing";
pub const ROTATING_SHAPES: &str = "rotatingShapes";
pub const PINCHING: &str = "pinching";

#[must_use]
pub fn tool() -> Tool {
    let node = StateNode::new(SELECT, Passive).with_children(
        IDLE,
        vec![
            idle::node(),
            StateNode::new(BRUSHING, brushing::Brushing::default()),
            StateNode::new(POINTING_CANVAS, pointing::PointingCanvas),
            StateNode::new(POINTING_SHAPE, pointing::PointingShape::default()),
            StateNode::new(POINTING_SELECTED_SHAPE, pointing::PointingSelectedShape::default()),
            StateNode::new(POINTING_SHAPE_BEHIND_BOUNDS, pointing::PointingShapeBehindBounds::default()),
            StateNode::new(POINTING_BOUNDS_BACKGROUND, pointing::PointingBoundsBackground),
            StateNode::new(POINTING_RESIZE_HANDLE, pointing::PointingResizeHandle::default()),
            StateNode::new(POINTING_ROTATE_HANDLE, pointing::PointingRotateHandle),
            StateNode::new(TRANSLATING, translating::Translating::default()),
            StateNode::new(RESIZING, resizing::Resizing::default()),
            StateNode::new(ROTATING_SHAPES, rotating::Rotating::default()),
            StateNode::new(PINCHING, pinching::Pinching::default()),
        ],
    );
    Tool::new(node, Some("v,1"))
}

/// Snapshots of the selected, unlocked shapes, taken when a gesture starts
/// so Escape can put them back.
fn snapshot_selection(ctx: &Ctx<'_>) -> Vec<SerializedShape> {
    ctx.editor.selected_shapes().into_iter().filter(|s| !s.is_locked()).map(|s| s.serialized().clone()).collect()
}

/// Undo an in-progress gesture and go back to idle.
fn cancel(ctx: &mut Ctx<'_>, snapshots: &[SerializedShape]) -> Result<()> {
    ctx.editor.restore_shapes(snapshots)?;
    ctx.transition(IDLE);
    Ok(())
}

/// Queue `target` once the pointer has left the drag threshold.
fn promote_on_drag(ctx: &mut Ctx<'_>, target: &'static str, data: TransitionData) {
    if ctx.editor.is_past_drag_threshold() {
        ctx.transition_with(target, data);
    }
}
