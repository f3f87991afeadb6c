//! Hierarchical state machine.
//!
//! A [`StateNode`] owns its children and tracks which one is current. Input
//! events enter at the root and travel root to leaf: each node runs its own
//! handler, then forwards the same event to its current child.
//!
//! Handlers never hold references to their parents. They ask for transitions
//! through [`Ctx`], which queues a request tagged with the depth of the node
//! that should switch children. Each node applies the requests addressed to
//! it once its own handler, or its child's, has returned.
//!
//! | Request | Switches children of |
//! |---------|----------------------|
//! | [`Ctx::transition`] | the parent (sibling states) |
//! | [`Ctx::transition_child`] | the node itself |
//! | [`Ctx::transition_root`] | the root (tools) |

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

pub mod shortcut;

use std::fmt;

use crate::bounds::ResizeAnchor;
use crate::editor::Editor;
use crate::error::{EditorError, Result};
use crate::input::{EventInfo, KeyInput, PinchInput, WheelInput};
use crate::shape::ShapeId;

pub use shortcut::{KeyCombo, Shortcut};

// =============================================================================
// Transition payloads
// =============================================================================

/// Data handed from the state that requested a transition to the state
/// being entered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionData {
    pub shape_id: Option<ShapeId>,
    pub handle: Option<ResizeAnchor>,
    /// Tool to come back to when a borrowed gesture ends.
    pub return_to: Option<&'static str>,
    /// Set when a tool lends a gesture to another tool or takes it back.
    /// The root keeps the tool lock across such a switch.
    pub is_handoff: bool,
}

impl TransitionData {
    #[must_use]
    pub fn shape(id: impl Into<ShapeId>) -> Self {
        Self { shape_id: Some(id.into()), ..Self::default() }
    }

    #[must_use]
    pub fn handle(handle: ResizeAnchor) -> Self {
        Self { handle: Some(handle), ..Self::default() }
    }

    /// Lend the current gesture to another tool, coming back to `tool`.
    #[must_use]
    pub fn lend(tool: &'static str) -> Self {
        Self { return_to: Some(tool), is_handoff: true, ..Self::default() }
    }

    /// Hand a borrowed gesture back to the tool that lent it.
    #[must_use]
    pub fn hand_back() -> Self {
        Self { is_handoff: true, ..Self::default() }
    }
}

/// Passed to `on_exit`, `on_transition`, and `on_enter`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionInfo {
    pub from_id: Option<&'static str>,
    pub to_id: &'static str,
    pub data: TransitionData,
}

#[derive(Debug, Clone)]
struct TransitionRequest {
    depth: usize,
    id: &'static str,
    data: TransitionData,
}

// =============================================================================
// Context
// =============================================================================

/// What a handler sees: the editor plus the transition queue.
pub struct Ctx<'a> {
    pub editor: &'a mut Editor,
    depth: usize,
    requests: Vec<TransitionRequest>,
    redispatch: bool,
}

impl fmt::Debug for Ctx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ctx").field("depth", &self.depth).field("requests", &self.requests).finish_non_exhaustive()
    }
}

impl<'a> Ctx<'a> {
    pub fn new(editor: &'a mut Editor) -> Self {
        Self { editor, depth: 0, requests: Vec::new(), redispatch: false }
    }

    /// Depth of the node whose handler is running; the root is 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn request(&mut self, depth: usize, id: &'static str, data: TransitionData) {
        self.requests.push(TransitionRequest { depth, id, data });
    }

    /// Move the parent to sibling state `id`.
    pub fn transition(&mut self, id: &'static str) {
        self.transition_with(id, TransitionData::default());
    }

    pub fn transition_with(&mut self, id: &'static str, data: TransitionData) {
        self.request(self.depth.saturating_sub(1), id, data);
    }

    /// Move this node to its child state `id`.
    pub fn transition_child(&mut self, id: &'static str) {
        self.request(self.depth, id, TransitionData::default());
    }

    /// Switch the app to tool `id`.
    pub fn transition_root(&mut self, id: &'static str) {
        self.transition_root_with(id, TransitionData::default());
    }

    pub fn transition_root_with(&mut self, id: &'static str, data: TransitionData) {
        self.request(0, id, data);
    }

    /// Deliver the current event again from the root once dispatch ends.
    pub fn redispatch(&mut self) {
        self.redispatch = true;
    }

    pub(crate) fn take_redispatch(&mut self) -> bool {
        std::mem::take(&mut self.redispatch)
    }

    #[must_use]
    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }

    fn take_request(&mut self, depth: usize) -> Option<TransitionRequest> {
        let index = self.requests.iter().position(|r| r.depth == depth)?;
        Some(self.requests.remove(index))
    }

    fn has_requests_above(&self, depth: usize) -> bool {
        self.requests.iter().any(|r| r.depth < depth)
    }
}

// =============================================================================
// Events and handlers
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerEnter,
    PointerLeave,
    Wheel(WheelInput),
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    PinchStart(PinchInput),
    Pinch(PinchInput),
    PinchEnd(PinchInput),
    /// The platform took the pointer away mid-gesture.
    Cancel,
}

impl StateEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointerDown => "pointer_down",
            Self::PointerMove => "pointer_move",
            Self::PointerUp => "pointer_up",
            Self::PointerEnter => "pointer_enter",
            Self::PointerLeave => "pointer_leave",
            Self::Wheel(_) => "wheel",
            Self::KeyDown(_) => "key_down",
            Self::KeyUp(_) => "key_up",
            Self::PinchStart(_) => "pinch_start",
            Self::Pinch(_) => "pinch",
            Self::PinchEnd(_) => "pinch_end",
            Self::Cancel => "cancel",
        }
    }
}

/// Behaviour of one state. Every method defaults to doing nothing.
///
/// Pointer positions and modifier flags are already in
/// `ctx.editor.inputs` when a handler runs.
#[allow(unused_variables)]
pub trait StateHandler {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        Ok(())
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        Ok(())
    }

    /// Runs on a parent after its current child changed, before the new
    /// child is entered.
    fn on_transition(&mut self, ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        Ok(())
    }

    fn on_pointer_down(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo) -> Result<()> {
        Ok(())
    }

    fn on_pointer_move(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo) -> Result<()> {
        Ok(())
    }

    fn on_pointer_up(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo) -> Result<()> {
        Ok(())
    }

    fn on_pointer_enter(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo) -> Result<()> {
        Ok(())
    }

    fn on_pointer_leave(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo) -> Result<()> {
        Ok(())
    }

    fn on_wheel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, input: &WheelInput) -> Result<()> {
        Ok(())
    }

    fn on_key_down(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, input: &KeyInput) -> Result<()> {
        Ok(())
    }

    fn on_key_up(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, input: &KeyInput) -> Result<()> {
        Ok(())
    }

    fn on_pinch_start(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, input: &PinchInput) -> Result<()> {
        Ok(())
    }

    fn on_pinch(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, input: &PinchInput) -> Result<()> {
        Ok(())
    }

    fn on_pinch_end(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo, input: &PinchInput) -> Result<()> {
        Ok(())
    }

    /// Abandon the gesture in progress. Escape routes here too.
    fn on_cancel(&mut self, ctx: &mut Ctx<'_>, info: &EventInfo) -> Result<()> {
        Ok(())
    }
}

/// Handler for nodes whose behaviour lives entirely in their children.
#[derive(Debug, Default)]
pub struct Passive;

impl StateHandler for Passive {}

// =============================================================================
// Nodes
// =============================================================================

pub struct StateNode {
    id: &'static str,
    initial: Option<&'static str>,
    children: Vec<StateNode>,
    current: Option<usize>,
    is_active: bool,
    shortcuts: Vec<Shortcut>,
    handler: Box<dyn StateHandler>,
}

impl fmt::Debug for StateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("id", &self.id)
            .field("current", &self.current_id())
            .field("is_active", &self.is_active)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl StateNode {
    pub fn new(id: &'static str, handler: impl StateHandler + 'static) -> Self {
        Self {
            id,
            initial: None,
            children: Vec::new(),
            current: None,
            is_active: false,
            shortcuts: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Attach child states; entering this node lands in `initial`.
    #[must_use]
    pub fn with_children(mut self, initial: &'static str, children: Vec<StateNode>) -> Self {
        self.initial = Some(initial);
        self.children = children;
        self
    }

    /// Add a child after construction, as when registering an extra tool.
    /// A child with the same id is replaced.
    pub fn add_child(&mut self, child: StateNode) {
        if let Some(existing) = self.children.iter_mut().find(|c| c.id == child.id) {
            *existing = child;
        } else {
            self.children.push(child);
        }
    }

    #[must_use]
    pub fn with_shortcut(mut self, keys: &str, action: impl Fn(&mut Ctx<'_>) -> Result<()> + 'static) -> Self {
        self.shortcuts.push(Shortcut::new(keys, action));
        self
    }

    pub fn add_shortcut(&mut self, shortcut: Shortcut) {
        self.shortcuts.push(shortcut);
    }

    // ── Queries ─────────────────────────────────────────────────

    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn children(&self) -> &[StateNode] {
        &self.children
    }

    #[must_use]
    pub fn child(&self, id: &str) -> Option<&StateNode> {
        self.children.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    #[must_use]
    pub fn current(&self) -> Option<&StateNode> {
        self.current.and_then(|i| self.children.get(i))
    }

    #[must_use]
    pub fn current_id(&self) -> Option<&'static str> {
        self.current().map(StateNode::id)
    }

    /// Ids from this node down to the active leaf.
    #[must_use]
    pub fn active_path(&self) -> Vec<&'static str> {
        let mut path = vec![self.id];
        let mut node = self;
        while let Some(child) = node.current() {
            path.push(child.id);
            node = child;
        }
        path
    }

    /// The deepest current descendant, or this node if it has none.
    #[must_use]
    pub fn leaf(&self) -> &StateNode {
        let mut node = self;
        while let Some(child) = node.current() {
            node = child;
        }
        node
    }

    // ── Transitions ─────────────────────────────────────────────

    /// Make child `id` current: exit the old child, run this node's
    /// `on_transition`, then enter the new child.
    ///
    /// # Errors
    ///
    /// [`EditorError::NoStates`] if this node has no children and
    /// [`EditorError::UnknownState`] if `id` is not one of them.
    pub fn transition(&mut self, ctx: &mut Ctx<'_>, id: &str, data: TransitionData) -> Result<()> {
        if self.children.is_empty() {
            return Err(EditorError::NoStates { state: self.id.to_owned(), target: id.to_owned() });
        }
        let Some(next) = self.children.iter().position(|c| c.id == id) else {
            return Err(EditorError::UnknownState { parent: self.id.to_owned(), id: id.to_owned() });
        };
        let depth = ctx.depth;
        let from_id = self.current_id();
        let info = TransitionInfo { from_id, to_id: self.children[next].id, data };

        if let Some(prev) = self.current.and_then(|i| self.children.get_mut(i)) {
            if prev.is_active {
                ctx.depth = depth + 1;
                prev.exit(ctx, &info)?;
            }
        }
        self.current = Some(next);
        ctx.depth = depth;
        self.handler.on_transition(ctx, &info)?;
        ctx.depth = depth + 1;
        self.children[next].enter(ctx, &info)?;
        ctx.depth = depth;
        tracing::debug!(state = self.id, from = from_id.unwrap_or("-"), to = info.to_id, "transition");
        Ok(())
    }

    /// Activate this node, settle into its initial child, then run its own
    /// `on_enter`.
    ///
    /// # Errors
    ///
    /// Propagates handler errors and bad initial ids.
    pub fn enter(&mut self, ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        let depth = ctx.depth;
        self.is_active = true;
        if let Some(initial) = self.initial {
            self.transition(ctx, initial, info.data.clone())?;
        }
        self.handler.on_enter(ctx, info)?;
        self.apply_requests(ctx, depth)
    }

    /// Deactivate the active subtree, deepest first.
    ///
    /// # Errors
    ///
    /// Propagates handler errors.
    pub fn exit(&mut self, ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        let depth = ctx.depth;
        if let Some(child) = self.current.and_then(|i| self.children.get_mut(i)) {
            if child.is_active {
                ctx.depth = depth + 1;
                child.exit(ctx, info)?;
                ctx.depth = depth;
            }
        }
        self.handler.on_exit(ctx, info)?;
        self.is_active = false;
        Ok(())
    }

    fn apply_requests(&mut self, ctx: &mut Ctx<'_>, depth: usize) -> Result<()> {
        while let Some(request) = ctx.take_request(depth) {
            ctx.depth = depth;
            self.transition(ctx, request.id, request.data)?;
        }
        ctx.depth = depth;
        Ok(())
    }

    /// Apply every queued request along the active path. At the root, any
    /// request left over targets a node that is no longer active and is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Propagates transition errors.
    pub fn settle(&mut self, ctx: &mut Ctx<'_>) -> Result<()> {
        let depth = ctx.depth;
        self.apply_requests(ctx, depth)?;
        if let Some(i) = self.current {
            ctx.depth = depth + 1;
            self.children[i].settle(ctx)?;
            self.apply_requests(ctx, depth)?;
        }
        if depth == 0 && ctx.has_requests() {
            for request in ctx.requests.drain(..) {
                tracing::warn!(depth = request.depth, id = request.id, "dropping stale transition request");
            }
        }
        Ok(())
    }

    // ── Dispatch ────────────────────────────────────────────────

    /// Deliver `event` to this node and then down the active path.
    ///
    /// # Errors
    ///
    /// Propagates handler and transition errors.
    pub fn dispatch(&mut self, ctx: &mut Ctx<'_>, event: &StateEvent, info: &EventInfo) -> Result<()> {
        let depth = ctx.depth;
        self.handle(ctx, event, info)?;
        self.apply_requests(ctx, depth)?;
        if ctx.has_requests_above(depth) {
            return Ok(());
        }
        if let Some(i) = self.current {
            ctx.depth = depth + 1;
            self.children[i].dispatch(ctx, event, info)?;
            self.apply_requests(ctx, depth)?;
        }
        Ok(())
    }

    fn handle(&mut self, ctx: &mut Ctx<'_>, event: &StateEvent, info: &EventInfo) -> Result<()> {
        let handler = &mut self.handler;
        match event {
            StateEvent::PointerDown => handler.on_pointer_down(ctx, info),
            StateEvent::PointerMove => handler.on_pointer_move(ctx, info),
            StateEvent::PointerUp => handler.on_pointer_up(ctx, info),
            StateEvent::PointerEnter => handler.on_pointer_enter(ctx, info),
            StateEvent::PointerLeave => handler.on_pointer_leave(ctx, info),
            StateEvent::Wheel(input) => handler.on_wheel(ctx, info, input),
            StateEvent::KeyDown(input) => {
                if input.key.is_modifier() {
                    handler.on_pointer_move(ctx, info)?;
                }
                handler.on_key_down(ctx, info, input)
            }
            StateEvent::KeyUp(input) => {
                if input.key.is_modifier() {
                    handler.on_pointer_move(ctx, info)?;
                }
                handler.on_key_up(ctx, info, input)
            }
            StateEvent::PinchStart(input) => handler.on_pinch_start(ctx, info, input),
            StateEvent::Pinch(input) => handler.on_pinch(ctx, info, input),
            StateEvent::PinchEnd(input) => handler.on_pinch_end(ctx, info, input),
            StateEvent::Cancel => handler.on_cancel(ctx, info),
        }
    }

    /// Run the shortcuts matching `input` on every active node, root first.
    /// Descent stops once a shortcut has queued a transition. Returns
    /// whether any shortcut fired.
    ///
    /// # Errors
    ///
    /// Propagates shortcut action errors.
    pub fn run_shortcuts(&mut self, ctx: &mut Ctx<'_>, input: &KeyInput) -> Result<bool> {
        let depth = ctx.depth;
        let mut fired = false;
        for shortcut in self.shortcuts.iter().filter(|s| s.matches(input)) {
            ctx.depth = depth;
            shortcut.run(ctx)?;
            fired = true;
        }
        if ctx.has_requests() {
            return Ok(fired);
        }
        if let Some(i) = self.current {
            ctx.depth = depth + 1;
            fired |= self.children[i].run_shortcuts(ctx, input)?;
            ctx.depth = depth;
        }
        Ok(fired)
    }
}
