//! States shared by the shape-creating tools.

use super::SELECT;
use crate::error::{EditorError, Result};
use crate::input::{EventInfo, PinchInput, WheelInput};
use crate::shape::{ShapeId, ShapePatch};
use crate::state::{Ctx, StateHandler, StateNode, TransitionData};

/// Waits for a press. A pinch borrows the select tool's pinching state and
/// comes back here afterwards.
pub(super) struct Idle {
    pub tool: &'static str,
}

impl StateHandler for Idle {
    fn on_pointer_down(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo) -> Result<()> {
        if info.order > 0 {
            return Ok(());
        }
        ctx.transition("pointing");
        Ok(())
    }

    fn on_pinch_start(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &PinchInput) -> Result<()> {
        ctx.transition_root_with(SELECT, TransitionData::lend(self.tool));
        ctx.redispatch();
        Ok(())
    }
}

/// Idle node with the select-all shortcut every shape tool carries.
pub(super) fn idle(tool: &'static str) -> StateNode {
    StateNode::new("idle", Idle { tool }).with_shortcut("cmd+a,ctrl+a", |ctx| {
        ctx.editor.select_all();
        ctx.transition_root(SELECT);
        Ok(())
    })
}

/// What a press without a drag produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Click {
    Nothing,
    /// Drop a shape centered on the press.
    Place,
    /// A single-point freehand stroke.
    Stroke,
}

/// Pressed but not yet dragged past the threshold.
pub(super) struct Pointing {
    pub shape_type: &'static str,
    pub click: Click,
}

impl StateHandler for Pointing {
    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        if ctx.editor.is_past_drag_threshold() {
            ctx.transition("creating");
            ctx.editor.deselect_all();
        }
        Ok(())
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, _input: &WheelInput) -> Result<()> {
        self.on_pointer_move(ctx, info)
    }

    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.transition("idle");
        Ok(())
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        let origin = ctx.editor.inputs.origin_point;
        match self.click {
            Click::Nothing => ctx.transition("idle"),
            Click::Place => {
                let id = ctx.editor.create_shape(self.shape_type, origin)?;
                center_on(ctx, &id, origin)?;
                finish(ctx, &id);
            }
            Click::Stroke => {
                let patch = ShapePatch {
                    points: Some(vec![crate::point::StrokePoint::new(0.0, 0.0, ctx.editor.inputs.pressure)]),
                    is_complete: Some(true),
                    ..ShapePatch::default()
                };
                ctx.editor.create_shape_with(self.shape_type, origin, &patch)?;
                ctx.transition("idle");
            }
        }
        Ok(())
    }
}

/// Move a shape so its bounds center sits on `center`.
pub(super) fn center_on(ctx: &mut Ctx<'_>, id: &str, center: crate::point::Point) -> Result<()> {
    let shape = ctx.editor.shape(id).ok_or_else(|| EditorError::ShapeNotFound(id.to_owned()))?;
    let offset = center - shape.center();
    let point = shape.point() + offset;
    ctx.editor.update_shape(id, &ShapePatch::point(point))
}

/// Select the new shape, go idle, and hand back to the select tool unless
/// the tool is locked.
pub(super) fn finish(ctx: &mut Ctx<'_>, id: &str) {
    ctx.editor.select(&[id.to_owned()]);
    ctx.transition("idle");
    if !ctx.editor.is_tool_locked() {
        ctx.transition_root(SELECT);
    }
}

/// The in-progress shape, or an error if the state lost track of it.
pub(super) fn creating_id(id: Option<&ShapeId>) -> Result<ShapeId> {
    id.cloned().ok_or_else(|| EditorError::Invariant("expected a creating shape".into()))
}
