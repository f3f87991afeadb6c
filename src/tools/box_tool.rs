//! Drag-to-size creation for box-like shapes: box, ellipse, polygon, star.

use super::shape_tool::{self, Click, Pointing};
use super::Tool;
use crate::bounds::{Bounds, ResizeAnchor};
use crate::error::Result;
use crate::input::{EventInfo, KeyInput, WheelInput};
use crate::point::Point;
use crate::shape::{ResizeInfo, SerializedShape, ShapeId};
use crate::state::{Ctx, Passive, StateHandler, StateNode, TransitionInfo};

/// Build a tool whose drag spans a new `shape_type` shape.
#[must_use]
pub fn tool(id: &'static str, shape_type: &'static str, keys: &'static str) -> Tool {
    let node = StateNode::new(id, Passive).with_children(
        "idle",
        vec![
            shape_tool::idle(id),
            StateNode::new("pointing", Pointing { shape_type, click: Click::Nothing }),
            StateNode::new("creating", Creating::new(shape_type)),
        ],
    );
    Tool::new(node, Some(keys))
}

/// Drag from `origin` to `current`, squared up while shift is held.
fn drag_box(origin: Point, current: Point, square: bool) -> (Bounds, Point) {
    let mut delta = current - origin;
    if square {
        let side = delta.x.abs().max(delta.y.abs());
        delta = Point::new(side.copysign(delta.x), side.copysign(delta.y));
    }
    (Bounds::from_points(&[origin, origin + delta], 0.0), delta)
}

struct Creating {
    shape_type: &'static str,
    id: Option<ShapeId>,
    initial: Option<(SerializedShape, Bounds)>,
}

impl Creating {
    fn new(shape_type: &'static str) -> Self {
        Self { shape_type, id: None, initial: None }
    }

    fn fit(&self, ctx: &mut Ctx<'_>) -> Result<()> {
        let (Some(id), Some((props, initial_bounds))) = (&self.id, &self.initial) else {
            return Ok(());
        };
        let inputs = &ctx.editor.inputs;
        let (bounds, delta) = drag_box(inputs.origin_point, inputs.current_point, inputs.shift);
        let info = ResizeInfo {
            handle: ResizeAnchor::Se,
            scale_x: if delta.x < 0.0 { -1.0 } else { 1.0 },
            scale_y: if delta.y < 0.0 { -1.0 } else { 1.0 },
            transform_origin: Point::new(0.0, 0.0),
            initial_bounds: *initial_bounds,
            initial_props: props,
        };
        ctx.editor.with_shape_mut(id, |shape| shape.on_resize(&bounds, &info))
    }
}

impl StateHandler for Creating {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        ctx.editor.pause_history();
        let origin = ctx.editor.inputs.origin_point;
        let id = ctx.editor.create_shape(self.shape_type, origin)?;
        self.initial = ctx.editor.shape(&id).map(|s| (s.serialized().clone(), s.bounds()));
        self.id = Some(id);
        self.fit(ctx)
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.id = None;
        self.initial = None;
        ctx.editor.resume_history();
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        self.fit(ctx)
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &WheelInput) -> Result<()> {
        self.fit(ctx)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        let id = shape_tool::creating_id(self.id.as_ref())?;
        ctx.editor.select(std::slice::from_ref(&id));
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
