use std::collections::HashSet;

use super::IDLE;
use crate::bounds::Bounds;
use crate::error::Result;
use crate::input::{EventInfo, KeyInput, WheelInput};
use crate::shape::ShapeId;
use crate::spatial::SpatialIndex;
use crate::state::{Ctx, StateHandler, TransitionInfo};

/// Marquee selection. The page's shapes are indexed once on enter; every
/// move queries the index with the brush and rebuilds the selection from
/// the hits and the selection the gesture started with.
#[derive(Default)]
pub(super) struct Brushing {
    initial: Vec<ShapeId>,
    tree: SpatialIndex<ShapeId>,
}

impl Brushing {
    /// Shapes the brush catches, in paint order. With `strict` a shape must
    /// lie wholly inside the brush.
    fn hits(&self, ctx: &Ctx<'_>, brush: &Bounds, strict: bool) -> Result<Vec<ShapeId>> {
        let candidates: HashSet<ShapeId> = self.tree.search(brush).into_iter().collect();
        let page = ctx.editor.current_page()?;
        Ok(page
            .shapes()
            .iter()
            .filter(|s| !s.is_hidden() && candidates.contains(s.id()))
            .filter(|s| if strict { brush.contains(&s.rotated_bounds()) } else { s.hit_test_bounds(brush) })
            .map(|s| s.id().to_owned())
            .collect())
    }

    fn apply(&self, ctx: &mut Ctx<'_>) -> Result<()> {
        let inputs = &ctx.editor.inputs;
        let (shift, strict) = (inputs.shift, inputs.ctrl);
        let brush = Bounds::from_points(&[inputs.origin_point, inputs.current_point], 0.0);
        ctx.editor.set_brush(brush);

        if brush.width == 0.0 && brush.height == 0.0 {
            ctx.editor.select(&self.initial);
            return Ok(());
        }

        let hits = self.hits(ctx, &brush, strict)?;
        let next: Vec<ShapeId> = if !shift {
            hits
        } else if hits.iter().all(|h| self.initial.contains(h)) {
            self.initial.iter().filter(|id| !hits.contains(id)).cloned().collect()
        } else {
            let mut union = self.initial.clone();
            union.extend(hits.into_iter().filter(|h| !self.initial.contains(h)));
            union
        };
        ctx.editor.select(&next);
        Ok(())
    }
}

impl StateHandler for Brushing {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.initial = ctx.editor.selected_ids().to_vec();
        let page = ctx.editor.current_page()?;
        self.tree = SpatialIndex::from_items(page.shapes().iter().map(|s| (s.id().to_owned(), s.rotated_bounds())));
        tracing::debug!(shapes = self.tree.len(), "brush index loaded");
        self.apply(ctx)
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.initial.clear();
        self.tree.clear();
        ctx.editor.clear_brush();
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        self.apply(ctx)
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, _input: &WheelInput) -> Result<()> {
        self.on_pointer_move(ctx, info)
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        ctx.editor.clear_brush();
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
        ctx.editor.clear_brush();
        ctx.editor.select(&self.initial);
        ctx.transition(IDLE);
        Ok(())
    }
}
