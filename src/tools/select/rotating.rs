use super::{cancel, IDLE};
use crate::bounds::Bounds;
use crate::error::{EditorError, Result};
use crate::input::{EventInfo, KeyInput, WheelInput};
use crate::point::{normalize_angle, snap_angle, Point};
use crate::shape::{SerializedShape, ShapePatch};
use crate::state::{Ctx, StateHandler, TransitionInfo};

/// Drag the rotate handle. Every shape turns by the same angle and its
/// center orbits the selection's common center.
#[derive(Default)]
pub(super) struct Rotating {
    snapshots: Vec<(SerializedShape, Point)>,
    common_center: Point,
    initial_angle: f64,
    /// Rotation of a lone shape, so snapping lands on absolute angles.
    single_rotation: Option<f64>,
}

impl Rotating {
    fn apply(&self, ctx: &mut Ctx<'_>) -> Result<()> {
        let inputs = &ctx.editor.inputs;
        let mut delta = self.common_center.angle_to(inputs.current_point) - self.initial_angle;
        if inputs.shift {
            let step = ctx.editor.config().rotation_snap;
            delta = match self.single_rotation {
                Some(initial) => snap_angle(initial + delta, step) - initial,
                None => snap_angle(delta, step),
            };
        }
        let updates: Vec<_> = self
            .snapshots
            .iter()
            .map(|(props, center)| {
                let moved = center.rot_with(self.common_center, delta);
                let patch = ShapePatch {
                    point: Some(props.point + (moved - *center)),
                    rotation: Some(normalize_angle(props.rotation.unwrap_or(0.0) + delta)),
                    ..ShapePatch::default()
                };
                (props.id.clone(), patch)
            })
            .collect();
        if updates.is_empty() {
            return Ok(());
        }
        ctx.editor.update_shapes(&updates)
    }
}

impl StateHandler for Rotating {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        let shapes = ctx.editor.selected_shapes();
        let common = Bounds::common(shapes.iter().map(|s| s.rotated_bounds()))
            .ok_or_else(|| EditorError::Invariant("expected a selection to rotate".into()))?;
        self.single_rotation = match shapes.as_slice() {
            [one] => Some(one.rotation()),
            _ => None,
        };
        self.snapshots =
            shapes.iter().filter(|s| !s.is_locked()).map(|s| (s.serialized().clone(), s.center())).collect();
        self.common_center = common.center();
        self.initial_angle = self.common_center.angle_to(ctx.editor.inputs.origin_point);
        ctx.editor.pause_history();
        self.apply(ctx)
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.snapshots.clear();
        self.single_rotation = None;
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
        let snapshots: Vec<SerializedShape> = self.snapshots.iter().map(|(props, _)| props.clone()).collect();
        cancel(ctx, &snapshots)
    }
}
