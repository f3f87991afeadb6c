use super::{cancel, IDLE};
use crate::bounds::{Bounds, ResizeAnchor};
use crate::error::{EditorError, Result};
use crate::input::{EventInfo, KeyInput, WheelInput};
use crate::point::Point;
use crate::shape::{ResizeInfo, SerializedShape, ShapeId};
use crate::state::{Ctx, StateHandler, TransitionInfo};

/// Per-shape state captured when the drag starts.
struct Member {
    id: ShapeId,
    props: SerializedShape,
    bounds: Bounds,
    transform_origin: Point,
}

/// Drag a selection handle. The selection box is transformed as a whole and
/// each shape is re-fitted to its share of the new box.
#[derive(Default)]
pub(super) struct Resizing {
    handle: Option<ResizeAnchor>,
    initial_bounds: Bounds,
    rotation: f64,
    members: Vec<Member>,
}

impl Resizing {
    fn apply(&self, ctx: &mut Ctx<'_>) -> Result<()> {
        let Some(handle) = self.handle else {
            return Ok(());
        };
        let inputs = &ctx.editor.inputs;
        let delta = inputs.drag_delta();
        let lock_aspect = inputs.shift || self.members.iter().any(|m| m.props.is_aspect_ratio_locked);
        let next = self.initial_bounds.transformed(handle, delta, self.rotation, lock_aspect);
        let (flip_x, flip_y) = (next.scale_x < 0.0, next.scale_y < 0.0);

        for member in &self.members {
            let bounds = next.bounds.relative_transformed(&self.initial_bounds, &member.bounds, flip_x, flip_y);
            let info = ResizeInfo {
                handle,
                scale_x: next.scale_x,
                scale_y: next.scale_y,
                transform_origin: member.transform_origin,
                initial_bounds: member.bounds,
                initial_props: &member.props,
            };
            ctx.editor.with_shape_mut(&member.id, |shape| shape.on_resize(&bounds, &info))?;
        }
        Ok(())
    }
}

impl StateHandler for Resizing {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        let handle = info.data.handle.ok_or_else(|| EditorError::Invariant("expected a resize handle".into()))?;
        let selected_bounds =
            ctx.editor.selected_bounds().ok_or_else(|| EditorError::Invariant("expected a selected bounds".into()))?;

        let shapes = ctx.editor.selected_shapes();
        let centers: Vec<Point> = shapes.iter().map(|s| s.center()).collect();
        let inner = Bounds::from_points(&centers, 0.0);
        let origin_of = |c: Point| {
            let x = if inner.width == 0.0 { 0.5 } else { (c.x - inner.min_x) / inner.width };
            let y = if inner.height == 0.0 { 0.5 } else { (c.y - inner.min_y) / inner.height };
            Point::new(x, y)
        };
        self.rotation = match shapes.as_slice() {
            [one] => one.rotation(),
            _ => 0.0,
        };
        self.members = shapes
            .iter()
            .filter(|s| !s.is_locked())
            .map(|s| Member {
                id: s.id().to_owned(),
                props: s.serialized().clone(),
                bounds: s.bounds(),
                transform_origin: origin_of(s.center()),
            })
            .collect();
        self.initial_bounds = selected_bounds;
        self.handle = Some(handle);

        ctx.editor.pause_history();
        let ids: Vec<ShapeId> = self.members.iter().map(|m| m.id.clone()).collect();
        ctx.editor.prepare_resize(&ids)?;
        tracing::debug!(handle = ?handle, shapes = ids.len(), "resize started");
        self.apply(ctx)
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.handle = None;
        self.members.clear();
        self.rotation = 0.0;
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
        let snapshots: Vec<SerializedShape> = self.members.iter().map(|m| m.props.clone()).collect();
        cancel(ctx, &snapshots)
    }
}
