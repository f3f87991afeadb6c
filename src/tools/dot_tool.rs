//! Dot tool: a click drops a dot, a drag places one that follows the pointer.

use super::shape_tool::{self, Click, Pointing};
use super::{Tool, DOT};
use crate::error::Result;
use crate::input::{EventInfo, KeyInput};
use crate::shape::ShapeId;
use crate::state::{Ctx, Passive, StateHandler, StateNode, TransitionInfo};

#[must_use]
pub fn tool() -> Tool {
    let node = StateNode::new(DOT, Passive).with_children(
        "idle",
        vec![
            shape_tool::idle(DOT),
            StateNode::new("pointing", Pointing { shape_type: "dot", click: Click::Place }),
            StateNode::new("creating", Creating::default()),
        ],
    );
    Tool::new(node, Some("t,6"))
}

#[derive(Default)]
struct Creating {
    id: Option<ShapeId>,
}

impl Creating {
    fn follow(&self, ctx: &mut Ctx<'_>) -> Result<()> {
        let Some(id) = &self.id else {
            return Ok(());
        };
        let current = ctx.editor.inputs.current_point;
        shape_tool::center_on(ctx, id, current)
    }
}

impl StateHandler for Creating {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        ctx.editor.pause_history();
        let current = ctx.editor.inputs.current_point;
        let id = ctx.editor.create_shape("dot", current)?;
        ctx.editor.select(std::slice::from_ref(&id));
        self.id = Some(id);
        self.follow(ctx)
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.id = None;
        ctx.editor.resume_history();
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        self.follow(ctx)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        let id = shape_tool::creating_id(self.id.as_ref())?;
        ctx.editor.resume_history();
        ctx.editor.persist();
        shape_tool::finish(ctx, &id);
        Ok(())
    }

    fn on_key_down(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, input: &KeyInput) -> Result<()> {
        if input.key.is("Escape") {
            self.on_cancel(ctx, info)?;
        }
        Ok(())
    }

    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        if let Some(id) = self.id.take() {
            ctx.editor.delete_shapes(&[id])?;
        }
        ctx.transition("idle");
        Ok(())
    }
}
