//! The document world the state machine operates on.
//!
//! [`Editor`] owns pages, selection, hover, brush, camera, inputs, and
//! history. State handlers receive it through [`crate::state::Ctx`] and
//! mutate it through the methods here, each of which records the
//! [`Change`]s it caused.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bounds::Bounds;
use crate::camera::{Camera, Viewport};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::events::{AppEvent, Change, ChangeLog, Listener, Subscriptions, Unsubscribe};
use crate::history::History;
use crate::input::Inputs;
use crate::page::{Page, SerializedPage};
use crate::point::Point;
use crate::shape::{SerializedShape, Shape, ShapeId, ShapePatch, ShapeRegistry};

/// Persisted form of the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedApp {
    pub current_page_id: String,
    #[serde(default)]
    pub selected_ids: Vec<ShapeId>,
    pub pages: Vec<SerializedPage>,
}

#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    registry: ShapeRegistry,
    pages: Vec<Page>,
    current_page_id: String,
    selected_ids: Vec<ShapeId>,
    hovered_id: Option<ShapeId>,
    brush: Option<Bounds>,
    is_tool_locked: bool,
    pub viewport: Viewport,
    pub inputs: Inputs,
    history: History,
    saving: bool,
    subscriptions: Subscriptions,
    changes: ChangeLog,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Editor {
    /// An editor holding one empty page.
    #[must_use]
    pub fn new(config: EditorConfig, registry: ShapeRegistry) -> Self {
        let page = Page::new(new_id(), "Page 1");
        let mut editor = Self {
            viewport: Viewport::new(&config),
            config,
            registry,
            current_page_id: page.id().to_owned(),
            pages: vec![page],
            selected_ids: Vec::new(),
            hovered_id: None,
            brush: None,
            is_tool_locked: false,
            inputs: Inputs::new(),
            history: History::new(),
            saving: false,
            subscriptions: Subscriptions::default(),
            changes: ChangeLog::default(),
        };
        editor.history.reset(editor.serialized());
        editor
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ShapeRegistry {
        &mut self.registry
    }

    pub fn record(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Take every change recorded since the last drain.
    pub fn drain_changes(&mut self) -> Vec<Change> {
        self.changes.drain()
    }

    // ── Pages ───────────────────────────────────────────────────

    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[must_use]
    pub fn current_page_id(&self) -> &str {
        &self.current_page_id
    }

    /// # Errors
    ///
    /// [`EditorError::PageNotFound`] if the current page id dangles.
    pub fn current_page(&self) -> Result<&Page> {
        self.pages
            .iter()
            .find(|p| p.id() == self.current_page_id)
            .ok_or_else(|| EditorError::PageNotFound(self.current_page_id.clone()))
    }

    fn current_page_mut(&mut self) -> Result<&mut Page> {
        let id = &self.current_page_id;
        self.pages.iter_mut().find(|p| p.id() == id).ok_or_else(|| EditorError::PageNotFound(id.clone()))
    }

    /// # Errors
    ///
    /// Fails if a page id is already present; nothing is added then.
    pub fn add_pages(&mut self, pages: Vec<Page>) -> Result<()> {
        for (i, page) in pages.iter().enumerate() {
            let clash = self.pages.iter().chain(&pages[..i]).any(|p| p.id() == page.id());
            if clash {
                return Err(EditorError::Invariant(format!("duplicate page id {}", page.id())));
            }
        }
        self.pages.extend(pages);
        self.record_pages();
        self.save_state();
        Ok(())
    }

    /// Remove pages by id. Removing the current page switches to the first
    /// remaining one.
    ///
    /// # Errors
    ///
    /// Refuses to remove every page.
    pub fn remove_pages(&mut self, ids: &[String]) -> Result<()> {
        if self.pages.iter().all(|p| ids.iter().any(|id| id == p.id())) {
            return Err(EditorError::Invariant("cannot remove every page".into()));
        }
        let before = self.pages.len();
        self.pages.retain(|p| !ids.iter().any(|id| id == p.id()));
        if before == self.pages.len() {
            return Ok(());
        }
        if !self.pages.iter().any(|p| p.id() == self.current_page_id) {
            let first = self.pages.first().map(|p| p.id().to_owned());
            if let Some(id) = first {
                self.change_page(&id)?;
            }
        }
        self.record_pages();
        self.save_state();
        Ok(())
    }

    /// # Errors
    ///
    /// [`EditorError::PageNotFound`] for an unknown id.
    pub fn change_page(&mut self, id: &str) -> Result<()> {
        if !self.pages.iter().any(|p| p.id() == id) {
            return Err(EditorError::PageNotFound(id.to_owned()));
        }
        if self.current_page_id == id {
            return Ok(());
        }
        self.current_page_id = id.to_owned();
        self.set_selection(Vec::new());
        self.hover(None);
        self.clear_brush();
        self.record(Change::PageChanged { id: id.to_owned() });
        Ok(())
    }

    fn record_pages(&mut self) {
        let ids = self.pages.iter().map(|p| p.id().to_owned()).collect();
        self.record(Change::PagesChanged { ids });
    }

    // ── Shapes ──────────────────────────────────────────────────

    /// Shape on the current page.
    #[must_use]
    pub fn shape(&self, id: &str) -> Option<&Shape> {
        let Ok(page) = self.current_page() else {
            return None;
        };
        page.shape(id)
    }

    /// Build a shape of a registered type at `point` and add it to the
    /// current page.
    ///
    /// # Errors
    ///
    /// [`EditorError::NoShapeClass`] for an unregistered type.
    pub fn create_shape(&mut self, type_name: &str, point: Point) -> Result<ShapeId> {
        self.create_shape_with(type_name, point, &ShapePatch::default())
    }

    /// Like [`Self::create_shape`], overriding default props with `patch`.
    ///
    /// # Errors
    ///
    /// [`EditorError::NoShapeClass`] for an unregistered type.
    pub fn create_shape_with(&mut self, type_name: &str, point: Point, patch: &ShapePatch) -> Result<ShapeId> {
        let mut shape = self.registry.create(type_name, new_id(), self.current_page_id.clone(), point)?;
        if *patch != ShapePatch::default() {
            shape.update(patch);
        }
        let id = shape.id().to_owned();
        self.create_shapes(vec![shape])?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Duplicate ids or missing parents; nothing is added on error.
    pub fn create_shapes(&mut self, shapes: Vec<Shape>) -> Result<Vec<ShapeId>> {
        let ids = self.current_page_mut()?.add_shapes(shapes)?;
        if !ids.is_empty() {
            tracing::debug!(count = ids.len(), "shapes created");
            self.record(Change::ShapesCreated { ids: ids.clone() });
            self.save_state();
        }
        Ok(ids)
    }

    /// Create shapes from `{type, ...props}` records. Every record is
    /// resolved before any is added.
    ///
    /// # Errors
    ///
    /// Unregistered or missing types and malformed props.
    pub fn create_serialized(&mut self, records: Vec<serde_json::Value>) -> Result<Vec<ShapeId>> {
        let shapes = records.into_iter().map(|r| self.registry.deserialize(r)).collect::<Result<Vec<_>>>()?;
        self.create_shapes(shapes)
    }

    /// # Errors
    ///
    /// [`EditorError::ShapeNotFound`] if any id is missing, and
    /// [`EditorError::OrphanShape`] or [`EditorError::ParentCycle`] for a
    /// `parent_id` that would detach a shape from the page. Nothing is
    /// updated on error.
    pub fn update_shapes(&mut self, updates: &[(ShapeId, ShapePatch)]) -> Result<()> {
        let page = self.current_page()?;
        if let Some((id, _)) = updates.iter().find(|(id, _)| !page.contains(id)) {
            return Err(EditorError::ShapeNotFound(id.clone()));
        }
        page.check_parents(updates.iter().filter_map(|(id, patch)| patch.parent_id.as_deref().map(|p| (id.as_str(), p))))?;
        let page = self.current_page_mut()?;
        for (id, patch) in updates {
            if let Some(shape) = page.shape_mut(id) {
                shape.update(patch);
            }
        }
        let ids = updates.iter().map(|(id, _)| id.clone()).collect();
        self.record(Change::ShapesUpdated { ids });
        self.save_state();
        Ok(())
    }

    /// # Errors
    ///
    /// As [`Self::update_shapes`].
    pub fn update_shape(&mut self, id: &str, patch: &ShapePatch) -> Result<()> {
        self.update_shapes(&[(id.to_owned(), patch.clone())])
    }

    /// Run `f` against one shape on the current page, recording the update.
    pub(crate) fn with_shape_mut<R>(&mut self, id: &str, f: impl FnOnce(&mut Shape) -> R) -> Result<R> {
        let shape = self.current_page_mut()?.shape_mut(id).ok_or_else(|| EditorError::ShapeNotFound(id.to_owned()))?;
        let out = f(shape);
        self.record(Change::ShapesUpdated { ids: vec![id.to_owned()] });
        self.save_state();
        Ok(out)
    }

    /// Let shapes capture per-gesture state ahead of a resize. Not an edit,
    /// so nothing is recorded.
    pub(crate) fn prepare_resize(&mut self, ids: &[ShapeId]) -> Result<()> {
        let page = self.current_page_mut()?;
        for id in ids {
            if let Some(shape) = page.shape_mut(id) {
                shape.on_resize_start();
            }
        }
        Ok(())
    }

    /// Put shapes back to earlier snapshots, matched by id.
    ///
    /// # Errors
    ///
    /// [`EditorError::ShapeNotFound`] if any snapshot's shape is gone, or a
    /// parent check failure as in [`Self::update_shapes`].
    pub fn restore_shapes(&mut self, snapshots: &[SerializedShape]) -> Result<()> {
        let page = self.current_page()?;
        if let Some(s) = snapshots.iter().find(|s| !page.contains(&s.id)) {
            return Err(EditorError::ShapeNotFound(s.id.clone()));
        }
        page.check_parents(snapshots.iter().map(|s| (s.id.as_str(), s.parent_id.as_str())))?;
        for snapshot in snapshots {
            self.with_shape_mut(&snapshot.id, |shape| shape.restore(snapshot))?;
        }
        Ok(())
    }

    /// Delete shapes (and their children). With no ids, deletes the
    /// selection, or every shape on the page when nothing is selected.
    ///
    /// # Errors
    ///
    /// [`EditorError::PageNotFound`] if the current page is gone.
    pub fn delete_shapes(&mut self, ids: &[ShapeId]) -> Result<Vec<ShapeId>> {
        let targets: Vec<ShapeId> = if !ids.is_empty() {
            ids.to_vec()
        } else if !self.selected_ids.is_empty() {
            self.selected_ids.clone()
        } else {
            self.current_page()?.shapes().iter().map(|s| s.id().to_owned()).collect()
        };
        let removed = self.current_page_mut()?.remove_shapes(&targets);
        if removed.is_empty() {
            return Ok(removed);
        }
        let kept = self.selected_ids.iter().filter(|id| !removed.contains(id)).cloned().collect();
        self.set_selection(kept);
        if self.hovered_id.as_ref().is_some_and(|id| removed.contains(id)) {
            self.hover(None);
        }
        tracing::debug!(count = removed.len(), "shapes deleted");
        self.record(Change::ShapesDeleted { ids: removed.clone() });
        self.save_state();
        Ok(removed)
    }

    /// Visible shapes whose rotated bounds touch the current view.
    #[must_use]
    pub fn shapes_in_viewport(&self) -> Vec<&Shape> {
        let view = self.viewport.current_view();
        let Ok(page) = self.current_page() else {
            return Vec::new();
        };
        page.shapes().iter().filter(|s| !s.is_hidden() && s.rotated_bounds().collides(&view)).collect()
    }

    // ── Selection, hover, brush ─────────────────────────────────

    #[must_use]
    pub fn selected_ids(&self) -> &[ShapeId] {
        &self.selected_ids
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }

    /// Selected shapes in paint order.
    #[must_use]
    pub fn selected_shapes(&self) -> Vec<&Shape> {
        let Ok(page) = self.current_page() else {
            return Vec::new();
        };
        page.shapes().iter().filter(|s| self.is_selected(s.id())).collect()
    }

    /// Box around the selection. A single shape keeps its rotation; several
    /// shapes yield the union of their rotated bounds.
    #[must_use]
    pub fn selected_bounds(&self) -> Option<Bounds> {
        match self.selected_shapes().as_slice() {
            [] => None,
            [one] => Some(one.bounds().with_rotation(one.rotation())),
            many => Bounds::common(many.iter().map(|s| s.rotated_bounds())),
        }
    }

    fn set_selection(&mut self, ids: Vec<ShapeId>) {
        if ids != self.selected_ids {
            self.selected_ids = ids;
            self.record(Change::SelectionChanged { ids: self.selected_ids.clone() });
        }
    }

    /// Replace the selection. Ids not on the current page are dropped.
    pub fn select(&mut self, ids: &[ShapeId]) {
        let Ok(page) = self.current_page() else {
            return;
        };
        let mut next: Vec<ShapeId> = Vec::with_capacity(ids.len());
        for id in ids {
            if page.contains(id) && !next.contains(id) {
                next.push(id.clone());
            }
        }
        self.set_selection(next);
    }

    pub fn deselect(&mut self, ids: &[ShapeId]) {
        let next = self.selected_ids.iter().filter(|id| !ids.contains(id)).cloned().collect();
        self.set_selection(next);
    }

    pub fn select_all(&mut self) {
        let all: Vec<ShapeId> = match self.current_page() {
            Ok(page) => page.shapes().iter().map(|s| s.id().to_owned()).collect(),
            Err(_) => return,
        };
        self.set_selection(all);
    }

    pub fn deselect_all(&mut self) {
        self.set_selection(Vec::new());
    }

    #[must_use]
    pub fn hovered_id(&self) -> Option<&str> {
        self.hovered_id.as_deref()
    }

    pub fn hover(&mut self, id: Option<&str>) {
        if self.hovered_id.as_deref() != id {
            self.hovered_id = id.map(str::to_owned);
            self.record(Change::HoverChanged { id: self.hovered_id.clone() });
        }
    }

    #[must_use]
    pub fn brush(&self) -> Option<Bounds> {
        self.brush
    }

    pub fn set_brush(&mut self, brush: Bounds) {
        if self.brush != Some(brush) {
            self.brush = Some(brush);
            self.record(Change::BrushChanged { brush: self.brush });
        }
    }

    pub fn clear_brush(&mut self) {
        if self.brush.is_some() {
            self.brush = None;
            self.record(Change::BrushChanged { brush: None });
        }
    }

    #[must_use]
    pub fn is_tool_locked(&self) -> bool {
        self.is_tool_locked
    }

    pub fn set_tool_lock(&mut self, locked: bool) {
        self.is_tool_locked = locked;
    }

    /// True once the pointer has travelled past the drag threshold, measured
    /// in screen pixels.
    #[must_use]
    pub fn is_past_drag_threshold(&self) -> bool {
        let travel = self.inputs.current_point.dist(self.inputs.origin_point) * self.viewport.camera().zoom;
        travel > self.config.drag_threshold_px
    }

    // ── Camera ──────────────────────────────────────────────────

    fn camera_changed(&mut self, before: Camera) {
        let camera = self.viewport.camera();
        if camera != before {
            self.record(Change::CameraChanged { camera });
        }
    }

    pub fn set_viewport_bounds(&mut self, bounds: Bounds) {
        self.viewport.update_bounds(bounds);
    }

    pub fn set_camera(&mut self, point: Point, zoom: f64) {
        let before = self.viewport.camera();
        self.viewport.update(point, zoom);
        self.camera_changed(before);
    }

    pub fn pan_camera(&mut self, delta: Point) {
        let before = self.viewport.camera();
        self.viewport.pan_camera(delta);
        self.camera_changed(before);
    }

    pub fn pinch_camera(&mut self, origin: Point, delta: Point, zoom: f64) {
        let before = self.viewport.camera();
        self.viewport.pinch_camera(origin, delta, zoom);
        self.camera_changed(before);
    }

    pub fn zoom_in(&mut self) {
        let before = self.viewport.camera();
        self.viewport.zoom_in();
        self.camera_changed(before);
    }

    pub fn zoom_out(&mut self) {
        let before = self.viewport.camera();
        self.viewport.zoom_out();
        self.camera_changed(before);
    }

    pub fn reset_zoom(&mut self) {
        let before = self.viewport.camera();
        self.viewport.reset_zoom();
        self.camera_changed(before);
    }

    /// Fit every shape on the page. No-op on an empty page.
    pub fn zoom_to_fit(&mut self) {
        let target = match self.current_page() {
            Ok(page) => Bounds::common(page.shapes().iter().map(Shape::rotated_bounds)),
            Err(_) => None,
        };
        if let Some(target) = target {
            let before = self.viewport.camera();
            self.viewport.zoom_to_bounds(&target);
            self.camera_changed(before);
        }
    }

    pub fn zoom_to_selection(&mut self) {
        let target = Bounds::common(self.selected_shapes().iter().map(|s| s.rotated_bounds()));
        if let Some(target) = target {
            let before = self.viewport.camera();
            self.viewport.zoom_to_bounds(&target);
            self.camera_changed(before);
        }
    }

    // ── History ─────────────────────────────────────────────────

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn pause_history(&mut self) {
        self.history.pause();
    }

    pub fn resume_history(&mut self) {
        self.history.resume();
    }

    /// Schedule a snapshot for the next [`Self::tick`]. No-op while paused.
    pub fn save_state(&mut self) {
        if self.history.is_paused() {
            return;
        }
        self.saving = true;
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Flush a scheduled snapshot.
    pub fn tick(&mut self) {
        if self.saving {
            self.persist();
        }
    }

    /// Push the current document onto the history stack and notify
    /// `persist` listeners. Skipped while paused.
    pub fn persist(&mut self) {
        if self.history.is_paused() {
            return;
        }
        let snapshot = self.serialized();
        self.history.push(snapshot.clone());
        self.saving = false;
        self.record(Change::Persisted { pointer: self.history.pointer() });
        self.subscriptions.notify(AppEvent::Persist, &snapshot);
    }

    /// Step back one snapshot. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Fails if the snapshot names an unregistered shape type; the document
    /// and history pointer are left as they were.
    pub fn undo(&mut self) -> Result<bool> {
        if self.history.is_paused() {
            tracing::warn!("undo ignored while history is paused");
            return Ok(false);
        }
        self.tick();
        let Some(snapshot) = self.history.undo().cloned() else {
            return Ok(false);
        };
        if let Err(e) = self.apply_snapshot(&snapshot) {
            self.history.redo();
            return Err(e);
        }
        tracing::debug!(pointer = self.history.pointer(), "undo");
        Ok(true)
    }

    /// Step forward one snapshot. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// As for [`Self::undo`].
    pub fn redo(&mut self) -> Result<bool> {
        if self.history.is_paused() {
            tracing::warn!("redo ignored while history is paused");
            return Ok(false);
        }
        self.tick();
        let Some(snapshot) = self.history.redo().cloned() else {
            return Ok(false);
        };
        if let Err(e) = self.apply_snapshot(&snapshot) {
            self.history.undo();
            return Err(e);
        }
        tracing::debug!(pointer = self.history.pointer(), "redo");
        Ok(true)
    }

    // ── Serialization ───────────────────────────────────────────

    #[must_use]
    pub fn serialized(&self) -> SerializedApp {
        SerializedApp {
            current_page_id: self.current_page_id.clone(),
            selected_ids: self.selected_ids.clone(),
            pages: self.pages.iter().map(Page::serialized).collect(),
        }
    }

    /// Replace the document and restart history from it.
    ///
    /// # Errors
    ///
    /// As for [`Self::apply_snapshot`].
    pub fn load(&mut self, snapshot: &SerializedApp) -> Result<()> {
        self.apply_snapshot(snapshot)?;
        self.saving = false;
        self.history.reset(self.serialized());
        Ok(())
    }

    /// Rebuild pages and shapes from a snapshot. Shapes whose id and nonce
    /// match a live instance keep that instance.
    ///
    /// # Errors
    ///
    /// [`EditorError::PageNotFound`] when the current page id is not among
    /// the pages, [`EditorError::NoShapeClass`] for unregistered types, and
    /// the page insertion errors. Nothing changes on error.
    pub fn apply_snapshot(&mut self, snapshot: &SerializedApp) -> Result<()> {
        if !snapshot.pages.iter().any(|p| p.id == snapshot.current_page_id) {
            return Err(EditorError::PageNotFound(snapshot.current_page_id.clone()));
        }
        let mut pages =
            snapshot.pages.iter().map(|record| Page::from_serialized(record, &self.registry)).collect::<Result<Vec<_>>>()?;

        let mut live: HashMap<ShapeId, Shape> =
            self.pages.iter_mut().flat_map(Page::take_shapes).map(|s| (s.id().to_owned(), s)).collect();
        for page in &mut pages {
            let shapes = page
                .take_shapes()
                .into_iter()
                .map(|fresh| match live.remove(fresh.id()) {
                    Some(old) if old.nonce() == fresh.nonce() && old.type_name() == fresh.type_name() => old,
                    _ => fresh,
                })
                .collect();
            page.replace_shapes(shapes);
        }

        self.pages = pages;
        self.current_page_id.clone_from(&snapshot.current_page_id);
        self.select(&snapshot.selected_ids);
        if let Some(id) = self.hovered_id.clone() {
            if self.shape(&id).is_none() {
                self.hover(None);
            }
        }
        self.clear_brush();
        self.record(Change::DocumentLoaded);
        Ok(())
    }

    // ── Subscriptions ───────────────────────────────────────────

    pub fn subscribe(&self, event: AppEvent, listener: Listener) -> Unsubscribe {
        self.subscriptions.subscribe(event, listener)
    }

    pub(crate) fn notify(&self, event: AppEvent) {
        self.subscriptions.notify(event, &self.serialized());
    }
}
