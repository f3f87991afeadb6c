//! Change notifications and lifecycle subscriptions.
//!
//! Every mutating editor call records [`Change`]s; hosts drain them after
//! each call instead of observing fields. Lifecycle listeners (`mount`,
//! `persist`) are registered separately and receive the serialized app.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::camera::Camera;
use crate::editor::SerializedApp;
use crate::shape::ShapeId;

/// What changed as the result of one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Change {
    ShapesCreated { ids: Vec<ShapeId> },
    ShapesUpdated { ids: Vec<ShapeId> },
    ShapesDeleted { ids: Vec<ShapeId> },
    SelectionChanged { ids: Vec<ShapeId> },
    HoverChanged { id: Option<ShapeId> },
    BrushChanged { brush: Option<Bounds> },
    CameraChanged { camera: Camera },
    /// Active path through the state tree, e.g. `"root.select.idle"`.
    StateChanged { path: String },
    PageChanged { id: String },
    PagesChanged { ids: Vec<String> },
    PointerCaptured { pointer_id: i32 },
    PointerReleased { pointer_id: i32 },
    Persisted { pointer: usize },
    DocumentLoaded,
}

/// Pending changes, with consecutive shape updates folded together.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    pending: Vec<Change>,
}

impl ChangeLog {
    pub fn push(&mut self, change: Change) {
        if let (Some(Change::ShapesUpdated { ids: prev }), Change::ShapesUpdated { ids }) = (self.pending.last_mut(), &change) {
            for id in ids {
                if !prev.contains(id) {
                    prev.push(id.clone());
                }
            }
            return;
        }
        self.pending.push(change);
    }

    pub fn drain(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

// =============================================================================
// Subscriptions
// =============================================================================

/// Lifecycle events a host can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEvent {
    Mount,
    Persist,
}

pub type Listener = Rc<dyn Fn(&SerializedApp)>;

/// Handle returned by [`Subscriptions::subscribe`]; call it to unsubscribe.
pub type Unsubscribe = Box<dyn FnOnce()>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, AppEvent, Listener)>,
}

#[derive(Clone, Default)]
pub struct Subscriptions {
    inner: Rc<RefCell<Registry>>,
}

impl fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions").field("len", &self.len()).finish()
    }
}

impl Subscriptions {
    pub fn subscribe(&self, event: AppEvent, listener: Listener) -> Unsubscribe {
        let id = {
            let mut registry = self.inner.borrow_mut();
            registry.next_id += 1;
            let id = registry.next_id;
            registry.entries.push((id, event, listener));
            id
        };
        let weak = Rc::downgrade(&self.inner);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().entries.retain(|(entry, ..)| *entry != id);
            }
        })
    }

    /// Call every listener for `event`. Listeners may unsubscribe while running.
    pub fn notify(&self, event: AppEvent, snapshot: &SerializedApp) {
        let listeners: Vec<Listener> =
            self.inner.borrow().entries.iter().filter(|(_, e, _)| *e == event).map(|(_, _, l)| Rc::clone(l)).collect();
        tracing::debug!(?event, count = listeners.len(), "notify");
        for listener in listeners {
            listener(snapshot);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
