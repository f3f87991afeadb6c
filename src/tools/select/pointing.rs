//! Pressed, not yet dragged. Each state waits for the pointer to pass the
//! drag threshold before handing over to a gesture, and treats a release
//! as a click.

use super::{promote_on_drag, BRUSHING, IDLE, PINCHING, RESIZING, ROTATING_SHAPES, TRANSLATING};
use crate::bounds::ResizeAnchor;
use crate::error::{EditorError, Result};
use crate::input::{EventInfo, PinchInput, WheelInput};
use crate::shape::ShapeId;
use crate::state::{Ctx, StateHandler, TransitionData, TransitionInfo};

fn pointed_shape(id: Option<&ShapeId>) -> Result<ShapeId> {
    id.cloned().ok_or_else(|| EditorError::Invariant("expected a pointed shape".into()))
}

/// Pressed on empty canvas.
pub(super) struct PointingCanvas;

impl StateHandler for PointingCanvas {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        if !ctx.editor.inputs.shift {
            ctx.editor.deselect_all();
        }
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        promote_on_drag(ctx, BRUSHING, TransitionData::default());
        Ok(())
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, _input: &WheelInput) -> Result<()> {
        self.on_pointer_move(ctx, info)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.editor.deselect_all();
        ctx.transition(IDLE);
        Ok(())
    }

    fn on_pinch_start(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &PinchInput) -> Result<()> {
        ctx.transition(PINCHING);
        Ok(())
    }

    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.transition(IDLE);
        Ok(())
    }
}

/// Pressed on an unselected shape outside the selection box. The shape is
/// selected straight away so a drag moves it.
#[derive(Default)]
pub(super) struct PointingShape {
    id: Option<ShapeId>,
}

impl StateHandler for PointingShape {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        let id = pointed_shape(info.data.shape_id.as_ref())?;
        if ctx.editor.inputs.shift {
            let mut ids = ctx.editor.selected_ids().to_vec();
            ids.push(id.clone());
            ctx.editor.select(&ids);
        } else {
            ctx.editor.select(std::slice::from_ref(&id));
        }
        self.id = Some(id);
        Ok(())
    }

    fn on_exit(&mut self, _ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.id = None;
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        promote_on_drag(ctx, TRANSLATING, TransitionData::default());
        Ok(())
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, _input: &WheelInput) -> Result<()> {
        self.on_pointer_move(ctx, info)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.transition(IDLE);
        Ok(())
    }

    fn on_pinch_start(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &PinchInput) -> Result<()> {
        ctx.transition(PINCHING);
        Ok(())
    }

    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.transition(IDLE);
        Ok(())
    }
}

/// Pressed on a shape that is already selected. A click narrows the
/// selection to it, or with shift removes it.
#[derive(Default)]
pub(super) struct PointingSelectedShape {
    id: Option<ShapeId>,
}

impl StateHandler for PointingSelectedShape {
    fn on_enter(&mut self, _ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        self.id = info.data.shape_id.clone();
        Ok(())
    }

    fn on_exit(&mut self, _ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.id = None;
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        promote_on_drag(ctx, TRANSLATING, TransitionData::default());
        Ok(())
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, _input: &WheelInput) -> Result<()> {
        self.on_pointer_move(ctx, info)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        let id = pointed_shape(self.id.as_ref())?;
        if ctx.editor.inputs.shift {
            ctx.editor.deselect(&[id]);
        } else {
            ctx.editor.select(&[id]);
        }
        ctx.transition(IDLE);
        Ok(())
    }

    fn on_pinch_start(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &PinchInput) -> Result<()> {
        ctx.transition(PINCHING);
        Ok(())
    }

    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.transition(IDLE);
        Ok(())
    }
}

/// Pressed on an unselected shape that sits inside the selection box. A
/// drag moves the selection; a click picks the shape.
#[derive(Default)]
pub(super) struct PointingShapeBehindBounds {
    id: Option<ShapeId>,
}

impl StateHandler for PointingShapeBehindBounds {
    fn on_enter(&mut self, _ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        self.id = info.data.shape_id.clone();
        Ok(())
    }

    fn on_exit(&mut self, _ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.id = None;
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        promote_on_drag(ctx, TRANSLATING, TransitionData::default());
        Ok(())
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, _input: &WheelInput) -> Result<()> {
        self.on_pointer_move(ctx, info)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        let id = pointed_shape(self.id.as_ref())?;
        if ctx.editor.inputs.shift {
            let mut ids = ctx.editor.selected_ids().to_vec();
            ids.push(id);
            ctx.editor.select(&ids);
        } else {
            ctx.editor.select(&[id]);
        }
        ctx.transition(IDLE);
        Ok(())
    }

    fn on_pinch_start(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &PinchInput) -> Result<()> {
        ctx.transition(PINCHING);
        Ok(())
    }

    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.transition(IDLE);
        Ok(())
    }
}

/// Pressed inside the selection box but on no shape.
pub(super) struct PointingBoundsBackground;

impl StateHandler for PointingBoundsBackground {
    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        promote_on_drag(ctx, TRANSLATING, TransitionData::default());
        Ok(())
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, _input: &WheelInput) -> Result<()> {
        self.on_pointer_move(ctx, info)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.editor.deselect_all();
        ctx.transition(IDLE);
        Ok(())
    }

    fn on_pinch_start(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &PinchInput) -> Result<()> {
        ctx.transition(PINCHING);
        Ok(())
    }

    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.transition(IDLE);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct PointingResizeHandle {
    handle: Option<ResizeAnchor>,
}

impl StateHandler for PointingResizeHandle {
    fn on_enter(&mut self, _ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        self.handle = info.data.handle;
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        let data = TransitionData { handle: self.handle, ..TransitionData::default() };
        promote_on_drag(ctx, RESIZING, data);
        Ok(())
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, _input: &WheelInput) -> Result<()> {
        self.on_pointer_move(ctx, info)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.transition(IDLE);
        Ok(())
    }

    fn on_pinch_start(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &PinchInput) -> Result<()> {
        ctx.transition(PINCHING);
        Ok(())
    }

    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.transition(IDLE);
        Ok(())
    }
}

pub(super) struct PointingRotateHandle;

impl StateHandler for PointingRotateHandle {
    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        promote_on_drag(ctx, ROTATING_SHAPES, TransitionData::default());
        Ok(())
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, _input: &WheelInput) -> Result<()> {
        self.on_pointer_move(ctx, info)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.transition(IDLE);
        Ok(())
    }

    fn on_pinch_start(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &PinchInput) -> Result<()> {
        ctx.transition(PINCHING);
        Ok(())
    }

    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.transition(IDLE);
        Ok(())
    }
}
