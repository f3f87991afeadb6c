use super::IDLE;
use crate::error::Result;
use crate::input::{EventInfo, PinchInput};
use crate::state::{Ctx, StateHandler, TransitionData, TransitionInfo};

/// Two-finger pan and zoom. A shape tool that lent us the gesture gets the
/// pointer back once it ends.
#[derive(Default)]
pub(super) struct Pinching {
    return_to: Option<&'static str>,
}

impl Pinching {
    fn end(&mut self, ctx: &mut Ctx<'_>) {
        ctx.transition(IDLE);
        if let Some(tool) = self.return_to.take() {
            ctx.transition_root_with(tool, TransitionData::hand_back());
        }
    }
}

impl StateHandler for Pinching {
    fn on_enter(&mut self, _ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        self.return_to = info.data.return_to;
        Ok(())
    }

    fn on_pinch(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, input: &PinchInput) -> Result<()> {
        ctx.editor.pinch_camera(input.origin, input.delta, input.zoom);
        Ok(())
    }

    fn on_pinch_end(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &PinchInput) -> Result<()> {
        self.end(ctx);
        Ok(())
    }

    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        self.end(ctx);
        Ok(())
    }
}
