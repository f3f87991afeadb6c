//! Freehand drawing. Finished strokes are simplified and left unselected so
//! the next stroke can start right away.

use super::shape_tool::{self, Click, Pointing};
use super::{Tool, DRAW};
use crate::consts::SIMPLIFY_TOLERANCE;
use crate::error::{EditorError, Result};
use crate::input::{EventInfo, KeyInput};
use crate::point::{Point, StrokePoint};
use crate::shape::{draw, ShapeId, ShapePatch};
use crate::state::{Ctx, Passive, StateHandler, StateNode, TransitionInfo};

/// The draw tool with the default simplify tolerance.
#[must_use]
pub fn tool() -> Tool {
    build(SIMPLIFY_TOLERANCE)
}

/// The draw tool simplifying finished strokes with `tolerance` page units;
/// zero keeps every sample.
///
/// # Errors
///
/// [`EditorError::Config`] for a negative or non-finite tolerance.
pub fn with_simplify_tolerance(tolerance: f64) -> Result<Tool> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(EditorError::Config(format!("simplifyTolerance must be a non-negative number, got {tolerance}")));
    }
    Ok(build(tolerance))
}

fn build(simplify_tolerance: f64) -> Tool {
    let node = StateNode::new(DRAW, Passive).with_children(
        "idle",
        vec![
            shape_tool::idle(DRAW),
            StateNode::new("pointing", Pointing { shape_type: "draw", click: Click::Stroke }),
            StateNode::new("creating", Creating { simplify_tolerance, id: None, samples: Vec::new() }),
        ],
    );
    Tool::new(node, Some("d,p,5"))
}

/// Samples are kept in page space; the shape's `point` is rebased to their
/// top-left on every move so stored points stay non-negative.
struct Creating {
    simplify_tolerance: f64,
    id: Option<ShapeId>,
    samples: Vec<StrokePoint>,
}

impl Creating {
    fn relative(&self) -> (Point, Vec<StrokePoint>) {
        let offset = self
            .samples
            .iter()
            .fold(Point::new(f64::INFINITY, f64::INFINITY), |m, s| Point::new(m.x.min(s.x), m.y.min(s.y)));
        let points = self.samples.iter().map(|s| s.with_point(s.point() - offset)).collect();
        (offset, points)
    }

    fn add_sample(&mut self, ctx: &mut Ctx<'_>) -> Result<()> {
        let Some(id) = self.id.clone() else {
            return Ok(());
        };
        let inputs = &ctx.editor.inputs;
        let p = inputs.current_point;
        self.samples.push(StrokePoint::new(p.x, p.y, inputs.pressure));
        let (offset, points) = self.relative();
        let patch = ShapePatch { point: Some(offset), points: Some(points), ..ShapePatch::default() };
        ctx.editor.update_shape(&id, &patch)
    }
}

impl StateHandler for Creating {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        ctx.editor.pause_history();
        let inputs = &ctx.editor.inputs;
        let origin = inputs.origin_point;
        self.samples = vec![StrokePoint::new(origin.x, origin.y, inputs.pressure)];
        let patch = ShapePatch { points: Some(vec![StrokePoint::new(0.0, 0.0, inputs.pressure)]), ..ShapePatch::default() };
        self.id = Some(ctx.editor.create_shape_with("draw", origin, &patch)?);
        self.add_sample(ctx)
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.id = None;
        self.samples.clear();
        ctx.editor.resume_history();
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        self.add_sample(ctx)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        let id = shape_tool::creating_id(self.id.as_ref())?;
        let (offset, mut points) = self.relative();
        if self.simplify_tolerance > 0.0 {
            points = draw::simplify(&points, self.simplify_tolerance);
        }
        let patch = ShapePatch { point: Some(offset), points: Some(points), is_complete: Some(true), ..ShapePatch::default() };
        ctx.editor.update_shape(&id, &patch)?;
        ctx.editor.resume_history();
        ctx.editor.persist();
        ctx.transition("idle");
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
