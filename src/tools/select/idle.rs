use super::{
    PINCHING, POINTING_BOUNDS_BACKGROUND, POINTING_CANVAS, POINTING_RESIZE_HANDLE, POINTING_ROTATE_HANDLE,
    POINTING_SELECTED_SHAPE, POINTING_SHAPE, POINTING_SHAPE_BEHIND_BOUNDS,
};
use crate::error::Result;
use crate::input::{BoundsHandle, EventInfo, PinchInput, Target};
use crate::state::{Ctx, StateHandler, StateNode, TransitionData, TransitionInfo};

pub(super) fn node() -> StateNode {
    StateNode::new(super::IDLE, Idle::default())
        .with_shortcut("Delete,Backspace", |ctx| {
            if !ctx.editor.selected_ids().is_empty() {
                ctx.editor.delete_shapes(&[])?;
            }
            Ok(())
        })
        .with_shortcut("cmd+a,ctrl+a", |ctx| {
            ctx.editor.select_all();
            Ok(())
        })
}

/// Resting state. Tracks hover and routes a press by what it landed on.
#[derive(Default)]
pub(super) struct Idle {
    /// Tool that lent us a pinch and wants it back afterwards.
    return_to: Option<&'static str>,
}

impl StateHandler for Idle {
    fn on_enter(&mut self, _ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        self.return_to = info.data.return_to;
        Ok(())
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        ctx.editor.hover(None);
        Ok(())
    }

    fn on_pointer_enter(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo) -> Result<()> {
        if info.order > 0 {
            return Ok(());
        }
        if let Target::Shape(id) = &info.target {
            ctx.editor.hover(Some(id));
        }
        Ok(())
    }

    fn on_pointer_leave(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo) -> Result<()> {
        if info.order > 0 {
            return Ok(());
        }
        if matches!(info.target, Target::Shape(_)) {
            ctx.editor.hover(None);
        }
        Ok(())
    }

    fn on_pointer_down(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo) -> Result<()> {
        // Ctrl ignores shapes and starts a marquee.
        if ctx.editor.inputs.ctrl {
            ctx.transition(POINTING_CANVAS);
            return Ok(());
        }
        match &info.target {
            Target::Bounds(BoundsHandle::Center) => {}
            Target::Bounds(BoundsHandle::Background) => ctx.transition(POINTING_BOUNDS_BACKGROUND),
            Target::Bounds(BoundsHandle::Rotate) => ctx.transition(POINTING_ROTATE_HANDLE),
            Target::Bounds(BoundsHandle::Resize(anchor)) => {
                ctx.transition_with(POINTING_RESIZE_HANDLE, TransitionData::handle(*anchor));
            }
            Target::Shape(id) => {
                let data = TransitionData::shape(id.clone());
                if ctx.editor.is_selected(id) {
                    ctx.transition_with(POINTING_SELECTED_SHAPE, data);
                } else {
                    let current = ctx.editor.inputs.current_point;
                    let behind = ctx
                        .editor
                        .selected_bounds()
                        .is_some_and(|b| b.contains_point(current.rot_with(b.center(), -b.rotation)));
                    let next = if behind { POINTING_SHAPE_BEHIND_BOUNDS } else { POINTING_SHAPE };
                    ctx.transition_with(next, data);
                }
            }
            Target::Canvas => ctx.transition(POINTING_CANVAS),
        }
        Ok(())
    }

    fn on_pinch_start(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &PinchInput) -> Result<()> {
        let data = TransitionData { return_to: self.return_to.take(), ..TransitionData::default() };
        ctx.transition_with(PINCHING, data);
        Ok(())
    }
}
