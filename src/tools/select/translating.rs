use super::{cancel, snapshot_selection, IDLE};
use crate::error::Result;
use crate::input::{EventInfo, KeyInput, WheelInput};
use crate::shape::{SerializedShape, ShapePatch};
use crate::state::{Ctx, StateHandler, TransitionInfo};

/// Drag the selection. Shift locks movement to the dominant axis.
#[derive(Default)]
pub(super) struct Translating {
    snapshots: Vec<SerializedShape>,
}

impl Translating {
    fn apply(&self, ctx: &mut Ctx<'_>) -> Result<()> {
        let mut delta = ctx.editor.inputs.drag_delta();
        if ctx.editor.inputs.shift {
            if delta.x.abs() > delta.y.abs() {
                delta.y = 0.0;
            } else {
                delta.x = 0.0;
            }
        }
        let updates: Vec<_> =
            self.snapshots.iter().map(|s| (s.id.clone(), ShapePatch::point(s.point + delta))).collect();
        if updates.is_empty() {
            return Ok(());
        }
        ctx.editor.update_shapes(&updates)
    }
}

impl StateHandler for Translating {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        ctx.editor.pause_history();
        self.snapshots = snapshot_selection(ctx);
        self.apply(ctx)
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.snapshots.clear();
        ctx.editor.resume_history();
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        self.apply(ctx)
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, _input: &WheelInput) -> Result<()> {
        self.on_pointer_move(ctx, info)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.editor.resume_history();
        ctx.editor.persist();
        ctx.transition(IDLE);
        Ok(())
    }

    fn on_key_down(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, input: &KeyInput) -> Result<()> {
        if input.key.is("Escape") {
            self.on_cancel(ctx, info)?;
        }
        Ok(())
    }

    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        cancel(ctx, &self.snapshots)
    }
}

