//! The application root: the editor document plus the tool state tree.
//!
//! [`App`] is what a host talks to. Each input method converts the host's
//! screen-space payload to page space, updates [`crate::input::Inputs`],
//! routes the event through the state tree, and hands back every
//! [`Change`] the call produced.
//!
//! A pointer press is delivered once per target under the pointer, topmost
//! first, with an increasing `order`. Moves, releases, and everything else
//! are delivered once.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use crate::bounds::Bounds;
use crate::config::EditorConfig;
use crate::editor::{Editor, SerializedApp};
use crate::error::Result;
use crate::events::{AppEvent, Change, Listener, Unsubscribe};
use crate::hit::{targets_at, Chrome};
use crate::input::{Capture, EventInfo, KeyInput, PinchInput, PointerInput, Target, WheelInput};
use crate::page::Page;
use crate::point::Point;
use crate::render::{Frame, Overlay, RenderItem};
use crate::shape::{Shape, ShapeClass, ShapeId, ShapePatch, ShapeRegistry};
use crate::state::{Ctx, Shortcut, StateEvent, StateHandler, StateNode, TransitionData, TransitionInfo};
use crate::tools::{default_tools, Tool, SELECT};

pub const ROOT: &str = "root";

/// Handler for the root node: wheel panning and tool-change bookkeeping.
struct Root;

impl StateHandler for Root {
    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, input: &WheelInput) -> Result<()> {
        if info.order > 0 {
            return Ok(());
        }
        ctx.editor.pan_camera(input.delta);
        let page = ctx.editor.viewport.page_point(ctx.editor.inputs.current_screen_point);
        ctx.editor.inputs.rebase(page);
        Ok(())
    }

    fn on_transition(&mut self, ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        if info.data.is_handoff {
            tracing::debug!(from = info.from_id.unwrap_or("-"), to = info.to_id, "gesture handed over");
            return Ok(());
        }
        ctx.editor.set_tool_lock(false);
        tracing::debug!(from = info.from_id.unwrap_or("-"), to = info.to_id, "tool selected");
        Ok(())
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Assembles an [`App`] from config, extra shape classes and tools, an
/// initial document, and lifecycle listeners.
#[derive(Default)]
pub struct AppBuilder {
    config: EditorConfig,
    shapes: Vec<ShapeClass>,
    tools: Vec<Tool>,
    document: Option<SerializedApp>,
    listeners: Vec<(AppEvent, Listener)>,
}

impl AppBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a shape class on top of the built-ins; a class with a
    /// built-in's id replaces it.
    #[must_use]
    pub fn shape(mut self, class: ShapeClass) -> Self {
        self.shapes.push(class);
        self
    }

    /// Mount an extra tool; a tool with a built-in's id replaces it.
    #[must_use]
    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    #[must_use]
    pub fn document(mut self, document: SerializedApp) -> Self {
        self.document = Some(document);
        self
    }

    /// Listener that lives as long as the app.
    #[must_use]
    pub fn on(mut self, event: AppEvent, listener: Listener) -> Self {
        self.listeners.push((event, listener));
        self
    }

    /// Build the state tree, enter it, load the document, and fire `mount`.
    ///
    /// # Errors
    ///
    /// Invalid config, a document that fails to load, or a tool tree whose
    /// initial states do not exist.
    pub fn build(self) -> Result<App> {
        self.config.validate()?;
        let mut registry = ShapeRegistry::with_builtins();
        for class in self.shapes {
            registry.register(class);
        }
        let mut editor = Editor::new(self.config, registry);
        for (event, listener) in self.listeners {
            drop(editor.subscribe(event, listener));
        }

        let mut root = StateNode::new(ROOT, Root);
        let mut nodes: Vec<StateNode> = Vec::new();
        for tool in default_tools().into_iter().chain(self.tools) {
            let id = tool.id();
            if let Some(keys) = tool.keys {
                root.add_shortcut(Shortcut::new(keys, move |ctx| {
                    ctx.transition_child(id);
                    Ok(())
                }));
            }
            match nodes.iter_mut().find(|n| n.id() == id) {
                Some(existing) => *existing = tool.node,
                None => nodes.push(tool.node),
            }
        }
        let mut root = root.with_children(SELECT, nodes);

        let mut ctx = Ctx::new(&mut editor);
        let info = TransitionInfo { from_id: None, to_id: ROOT, data: TransitionData::default() };
        root.enter(&mut ctx, &info)?;
        root.settle(&mut ctx)?;

        if let Some(document) = &self.document {
            editor.load(document)?;
        }
        editor.notify(AppEvent::Mount);
        editor.drain_changes();

        let last_path = path_of(&root);
        tracing::debug!(path = %last_path, tools = root.children().len(), "app mounted");
        Ok(App { editor, root, pointer_over: None, last_path })
    }
}

fn path_of(root: &StateNode) -> String {
    root.active_path().join(".")
}

// =============================================================================
// App
// =============================================================================

#[derive(Debug)]
pub struct App {
    editor: Editor,
    root: StateNode,
    /// Topmost shape under the pointer at the last move, for enter/leave.
    pointer_over: Option<ShapeId>,
    last_path: String,
}

impl App {
    /// An app with the built-in shapes and tools and an empty page.
    ///
    /// # Errors
    ///
    /// Invalid config.
    pub fn new(config: EditorConfig) -> Result<Self> {
        AppBuilder::new().config(config).build()
    }

    #[must_use]
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    #[must_use]
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Direct editor access. Changes made here are drained on the next call
    /// like any other.
    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    #[must_use]
    pub fn root(&self) -> &StateNode {
        &self.root
    }

    // --- State queries ---

    /// Active path through the state tree, e.g. `"root.select.idle"`.
    #[must_use]
    pub fn state_path(&self) -> String {
        path_of(&self.root)
    }

    #[must_use]
    pub fn current_tool(&self) -> Option<&'static str> {
        self.root.current_id()
    }

    /// Whether the active path below the root starts with `path`, a
    /// dot-separated list of ids such as `"select.brushing"`.
    #[must_use]
    pub fn is_in(&self, path: &str) -> bool {
        let active = self.root.active_path();
        let wanted: Vec<&str> = path.split('.').collect();
        active.len() > wanted.len() && active[1..=wanted.len()] == wanted[..]
    }

    /// Whether the active leaf is an `idle` state.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.root.leaf().id() == "idle"
    }

    // --- Routing ---

    fn run(&mut self, event: &StateEvent, info: &EventInfo) -> Result<()> {
        let mut ctx = Ctx::new(&mut self.editor);
        self.root.dispatch(&mut ctx, event, info)?;
        self.root.settle(&mut ctx)?;
        if ctx.take_redispatch() {
            tracing::debug!(event = event.name(), "redispatch");
            self.root.dispatch(&mut ctx, event, info)?;
            self.root.settle(&mut ctx)?;
        }
        Ok(())
    }

    fn record_capture(&mut self, capture: Option<Capture>) {
        match capture {
            Some(Capture::Set(pointer_id)) => self.editor.record(Change::PointerCaptured { pointer_id }),
            Some(Capture::Release(pointer_id)) => self.editor.record(Change::PointerReleased { pointer_id }),
            None => {}
        }
    }

    /// Record a state change if the active path moved, then hand back
    /// everything recorded since the last call.
    fn finish(&mut self) -> Vec<Change> {
        let path = self.state_path();
        if path != self.last_path {
            tracing::debug!(from = %self.last_path, to = %path, "state changed");
            self.editor.record(Change::StateChanged { path: path.clone() });
            self.last_path = path;
        }
        self.editor.drain_changes()
    }

    /// Chrome for the current selection. Handles only show while the select
    /// tool is at rest.
    #[must_use]
    pub fn chrome(&self) -> Chrome {
        let tool = self.root.current();
        let state = tool.filter(|t| t.id() == SELECT).and_then(StateNode::current_id);
        Chrome::compute(&self.editor, state)
    }

    /// Targets stacked under page point `point`, topmost first.
    #[must_use]
    pub fn targets_at(&self, point: Point) -> Vec<Target> {
        targets_at(&self.editor, point, &self.chrome())
    }

    fn topmost_shape(targets: &[Target]) -> Option<ShapeId> {
        targets.iter().find_map(|t| t.shape_id().map(str::to_owned))
    }

    // --- Input events ---

    /// # Errors
    ///
    /// Propagates handler and transition errors.
    pub fn pointer_down(&mut self, input: PointerInput) -> Result<Vec<Change>> {
        let page = self.editor.viewport.page_point(input.point);
        let capture = self.editor.inputs.on_pointer_down(page, &input);
        self.record_capture(capture);
        let targets = self.targets_at(page);
        for (order, target) in (0u32..).zip(targets) {
            self.run(&StateEvent::PointerDown, &EventInfo { target, order })?;
        }
        Ok(self.finish())
    }

    /// Also synthesizes pointer-leave and pointer-enter when the topmost
    /// shape under the pointer changes.
    ///
    /// # Errors
    ///
    /// Propagates handler and transition errors.
    pub fn pointer_move(&mut self, input: PointerInput) -> Result<Vec<Change>> {
        let page = self.editor.viewport.page_point(input.point);
        self.editor.inputs.on_pointer_move(page, &input);
        let targets = self.targets_at(page);
        let over = Self::topmost_shape(&targets);
        if over != self.pointer_over {
            if let Some(id) = self.pointer_over.take() {
                self.run(&StateEvent::PointerLeave, &EventInfo { target: Target::Shape(id), order: 0 })?;
            }
            if let Some(id) = &over {
                self.run(&StateEvent::PointerEnter, &EventInfo { target: Target::Shape(id.clone()), order: 0 })?;
            }
            self.pointer_over = over;
        }
        let target = targets.into_iter().next().unwrap_or(Target::Canvas);
        self.run(&StateEvent::PointerMove, &EventInfo { target, order: 0 })?;
        Ok(self.finish())
    }

    /// # Errors
    ///
    /// Propagates handler and transition errors.
    pub fn pointer_up(&mut self, input: PointerInput) -> Result<Vec<Change>> {
        let page = self.editor.viewport.page_point(input.point);
        let capture = self.editor.inputs.on_pointer_up(page, &input);
        let target = self.targets_at(page).into_iter().next().unwrap_or(Target::Canvas);
        self.run(&StateEvent::PointerUp, &EventInfo { target, order: 0 })?;
        self.record_capture(capture);
        Ok(self.finish())
    }

    /// The platform took the pointer away. Releases capture and abandons
    /// any gesture in progress the way Escape does: drags are rolled back,
    /// half-made shapes removed, and the tool returns to idle.
    ///
    /// # Errors
    ///
    /// Propagates handler and transition errors.
    pub fn pointer_cancel(&mut self, pointer_id: i32) -> Result<Vec<Change>> {
        let capture = self.editor.inputs.on_pointer_cancel(pointer_id);
        self.record_capture(capture);
        self.run(&StateEvent::Cancel, &EventInfo::canvas())?;
        Ok(self.finish())
    }

    /// The host's own enter event for a shape element.
    ///
    /// # Errors
    ///
    /// Propagates handler errors.
    pub fn pointer_enter(&mut self, target: Target) -> Result<Vec<Change>> {
        self.run(&StateEvent::PointerEnter, &EventInfo { target, order: 0 })?;
        Ok(self.finish())
    }

    /// # Errors
    ///
    /// Propagates handler errors.
    pub fn pointer_leave(&mut self, target: Target) -> Result<Vec<Change>> {
        self.run(&StateEvent::PointerLeave, &EventInfo { target, order: 0 })?;
        Ok(self.finish())
    }

    /// Pans the camera, then lets the active state treat the scroll as a
    /// pointer move.
    ///
    /// # Errors
    ///
    /// Propagates handler and transition errors.
    pub fn wheel(&mut self, input: WheelInput) -> Result<Vec<Change>> {
        let page = self.editor.viewport.page_point(input.point);
        self.editor.inputs.on_wheel(page, &input);
        self.run(&StateEvent::Wheel(input), &EventInfo::canvas())?;
        Ok(self.finish())
    }

    /// Delivers the key to the active path, then runs matching shortcuts.
    ///
    /// # Errors
    ///
    /// Propagates handler, shortcut, and transition errors.
    pub fn key_down(&mut self, input: KeyInput) -> Result<Vec<Change>> {
        self.editor.inputs.on_key_down(&input);
        self.run(&StateEvent::KeyDown(input.clone()), &EventInfo::canvas())?;
        let mut ctx = Ctx::new(&mut self.editor);
        if self.root.run_shortcuts(&mut ctx, &input)? {
            tracing::debug!(key = input.key.as_str(), "shortcut");
        }
        self.root.settle(&mut ctx)?;
        Ok(self.finish())
    }

    /// # Errors
    ///
    /// Propagates handler and transition errors.
    pub fn key_up(&mut self, input: KeyInput) -> Result<Vec<Change>> {
        self.editor.inputs.on_key_up(&input);
        self.run(&StateEvent::KeyUp(input), &EventInfo::canvas())?;
        Ok(self.finish())
    }

    /// # Errors
    ///
    /// Propagates handler and transition errors.
    pub fn pinch_start(&mut self, input: PinchInput) -> Result<Vec<Change>> {
        let page = self.editor.viewport.page_point(input.origin);
        self.editor.inputs.on_pinch_start(page, &input);
        self.run(&StateEvent::PinchStart(input), &EventInfo::canvas())?;
        Ok(self.finish())
    }

    /// # Errors
    ///
    /// Propagates handler errors.
    pub fn pinch(&mut self, input: PinchInput) -> Result<Vec<Change>> {
        let page = self.editor.viewport.page_point(input.origin);
        self.editor.inputs.on_pinch(page, &input);
        self.run(&StateEvent::Pinch(input), &EventInfo::canvas())?;
        Ok(self.finish())
    }

    /// # Errors
    ///
    /// Propagates handler and transition errors.
    pub fn pinch_end(&mut self, input: PinchInput) -> Result<Vec<Change>> {
        let page = self.editor.viewport.page_point(input.origin);
        self.editor.inputs.on_pinch_end(page, &input);
        self.run(&StateEvent::PinchEnd(input), &EventInfo::canvas())?;
        Ok(self.finish())
    }

    // --- Tools ---

    /// Switch to tool `id`. Selecting the active tool again re-enters it.
    ///
    /// # Errors
    ///
    /// [`crate::error::EditorError::UnknownState`] for an unknown tool.
    pub fn select_tool(&mut self, id: &str) -> Result<Vec<Change>> {
        let mut ctx = Ctx::new(&mut self.editor);
        self.root.transition(&mut ctx, id, TransitionData::default())?;
        self.root.settle(&mut ctx)?;
        Ok(self.finish())
    }

    /// Keep a shape tool active after it creates a shape. Reset whenever
    /// the tool changes.
    pub fn set_tool_lock(&mut self, locked: bool) -> Vec<Change> {
        self.editor.set_tool_lock(locked);
        self.finish()
    }

    // --- Document ---

    /// # Errors
    ///
    /// Duplicate ids or missing parents; nothing is added then.
    pub fn create_shapes(&mut self, shapes: Vec<Shape>) -> Result<Vec<Change>> {
        self.editor.create_shapes(shapes)?;
        Ok(self.finish())
    }

    /// Create shapes from `{type, ...props}` records.
    ///
    /// # Errors
    ///
    /// Unregistered types and malformed props; nothing is added then.
    pub fn create_serialized(&mut self, records: Vec<serde_json::Value>) -> Result<Vec<Change>> {
        self.editor.create_serialized(records)?;
        Ok(self.finish())
    }

    /// # Errors
    ///
    /// Unknown shape ids; nothing is updated then.
    pub fn update_shapes(&mut self, updates: &[(ShapeId, ShapePatch)]) -> Result<Vec<Change>> {
        self.editor.update_shapes(updates)?;
        Ok(self.finish())
    }

    /// With no ids, deletes the selection, or the whole page when nothing is
    /// selected.
    ///
    /// # Errors
    ///
    /// A dangling current page.
    pub fn delete_shapes(&mut self, ids: &[ShapeId]) -> Result<Vec<Change>> {
        self.editor.delete_shapes(ids)?;
        Ok(self.finish())
    }

    pub fn select(&mut self, ids: &[ShapeId]) -> Vec<Change> {
        self.editor.select(ids);
        self.finish()
    }

    pub fn deselect(&mut self, ids: &[ShapeId]) -> Vec<Change> {
        self.editor.deselect(ids);
        self.finish()
    }

    pub fn select_all(&mut self) -> Vec<Change> {
        self.editor.select_all();
        self.finish()
    }

    pub fn deselect_all(&mut self) -> Vec<Change> {
        self.editor.deselect_all();
        self.finish()
    }

    pub fn hover(&mut self, id: Option<&str>) -> Vec<Change> {
        self.editor.hover(id);
        self.finish()
    }

    pub fn set_brush(&mut self, brush: Bounds) -> Vec<Change> {
        self.editor.set_brush(brush);
        self.finish()
    }

    pub fn clear_brush(&mut self) -> Vec<Change> {
        self.editor.clear_brush();
        self.finish()
    }

    #[must_use]
    pub fn selected_bounds(&self) -> Option<Bounds> {
        self.editor.selected_bounds()
    }

    #[must_use]
    pub fn shapes_in_viewport(&self) -> Vec<&Shape> {
        self.editor.shapes_in_viewport()
    }

    // --- Pages ---

    /// # Errors
    ///
    /// Duplicate page ids.
    pub fn add_pages(&mut self, pages: Vec<Page>) -> Result<Vec<Change>> {
        self.editor.add_pages(pages)?;
        Ok(self.finish())
    }

    /// # Errors
    ///
    /// Removing every page.
    pub fn remove_pages(&mut self, ids: &[String]) -> Result<Vec<Change>> {
        self.editor.remove_pages(ids)?;
        Ok(self.finish())
    }

    /// # Errors
    ///
    /// Unknown page id.
    pub fn change_page(&mut self, id: &str) -> Result<Vec<Change>> {
        self.editor.change_page(id)?;
        self.pointer_over = None;
        Ok(self.finish())
    }

    // --- Camera ---

    /// Size of the host's drawing surface in screen pixels.
    pub fn set_viewport_bounds(&mut self, bounds: Bounds) -> Vec<Change> {
        self.editor.set_viewport_bounds(bounds);
        self.finish()
    }

    pub fn set_camera(&mut self, point: Point, zoom: f64) -> Vec<Change> {
        self.editor.set_camera(point, zoom);
        self.finish()
    }

    pub fn zoom_in(&mut self) -> Vec<Change> {
        self.editor.zoom_in();
        self.finish()
    }

    pub fn zoom_out(&mut self) -> Vec<Change> {
        self.editor.zoom_out();
        self.finish()
    }

    pub fn reset_zoom(&mut self) -> Vec<Change> {
        self.editor.reset_zoom();
        self.finish()
    }

    pub fn zoom_to_fit(&mut self) -> Vec<Change> {
        self.editor.zoom_to_fit();
        self.finish()
    }

    pub fn zoom_to_selection(&mut self) -> Vec<Change> {
        self.editor.zoom_to_selection();
        self.finish()
    }

    // --- View flags ---

    #[must_use]
    pub fn show_bounds(&self) -> bool {
        self.chrome().bounds
    }

    #[must_use]
    pub fn show_bounds_detail(&self) -> bool {
        self.chrome().bounds_detail
    }

    #[must_use]
    pub fn show_bounds_rotation(&self) -> bool {
        self.chrome().bounds_rotation
    }

    #[must_use]
    pub fn show_resize_handles(&self) -> bool {
        self.chrome().resize_handles
    }

    #[must_use]
    pub fn show_rotate_handle(&self) -> bool {
        self.chrome().rotate_handle
    }

    #[must_use]
    pub fn show_context_bar(&self) -> bool {
        self.chrome().context_bar
    }

    /// Shapes in the current view, in paint order, plus the selection overlay.
    #[must_use]
    pub fn render(&self) -> Frame {
        let hovered = self.editor.hovered_id();
        let items = self
            .editor
            .shapes_in_viewport()
            .into_iter()
            .map(|shape| RenderItem {
                id: shape.id().to_owned(),
                shape_type: shape.type_name(),
                point: shape.point(),
                rotation: shape.rotation(),
                bounds: shape.bounds(),
                component: shape.component(),
                indicator: shape.indicator(),
                is_selected: self.editor.is_selected(shape.id()),
                is_hovered: hovered == Some(shape.id()),
                is_ghost: shape.is_ghost(),
            })
            .collect();
        let chrome = self.chrome();
        let overlay = Overlay {
            selected_bounds: self.editor.selected_bounds(),
            brush: self.editor.brush(),
            show_selection: chrome.bounds,
            show_selection_detail: chrome.bounds_detail,
            show_selection_rotation: chrome.bounds_rotation,
            show_resize_handles: chrome.resize_handles,
            show_rotate_handle: chrome.rotate_handle,
            show_context_bar: chrome.context_bar,
        };
        Frame { items, overlay }
    }

    // --- History ---

    /// Step back one snapshot. Ignored mid-gesture.
    ///
    /// # Errors
    ///
    /// A snapshot naming an unregistered shape type.
    pub fn undo(&mut self) -> Result<Vec<Change>> {
        if !self.is_idle() {
            tracing::warn!(state = %self.state_path(), "undo ignored outside idle");
            return Ok(self.finish());
        }
        self.editor.undo()?;
        Ok(self.finish())
    }

    /// Step forward one snapshot. Ignored mid-gesture.
    ///
    /// # Errors
    ///
    /// A snapshot naming an unregistered shape type.
    pub fn redo(&mut self) -> Result<Vec<Change>> {
        if !self.is_idle() {
            tracing::warn!(state = %self.state_path(), "redo ignored outside idle");
            return Ok(self.finish());
        }
        self.editor.redo()?;
        Ok(self.finish())
    }

    /// Push a snapshot now.
    pub fn persist(&mut self) -> Vec<Change> {
        self.editor.persist();
        self.finish()
    }

    /// Animation-frame hook: flushes a scheduled snapshot.
    pub fn tick(&mut self) -> Vec<Change> {
        self.editor.tick();
        self.finish()
    }

    // --- Serialization ---

    #[must_use]
    pub fn serialized(&self) -> SerializedApp {
        self.editor.serialized()
    }

    /// Replace the document and restart history from it.
    ///
    /// # Errors
    ///
    /// Unknown current page or unregistered shape types; nothing changes then.
    pub fn load_app_state(&mut self, snapshot: &SerializedApp) -> Result<Vec<Change>> {
        self.editor.load(snapshot)?;
        self.pointer_over = None;
        Ok(self.finish())
    }

    pub fn subscribe(&self, event: AppEvent, listener: Listener) -> Unsubscribe {
        self.editor.subscribe(event, listener)
    }

    /// Changes recorded outside the methods above, such as through
    /// [`Self::editor_mut`].
    pub fn drain_changes(&mut self) -> Vec<Change> {
        self.finish()
    }
}
