//! Undo stack of serialized app snapshots.
//!
//! The stack always holds at least the snapshot the app was loaded with.
//! `pointer` indexes the snapshot that matches the live document; entries
//! above it form the redo tail.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::editor::SerializedApp;

#[derive(Debug, Clone, Default)]
pub struct History {
    stack: Vec<SerializedApp>,
    pointer: usize,
    paused: bool,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry and start over from `snapshot`, unpaused.
    pub fn reset(&mut self, snapshot: SerializedApp) {
        self.stack = vec![snapshot];
        self.pointer = 0;
        self.paused = false;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suppress pushes until [`Self::resume`].
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Push a snapshot, discarding the redo tail. Returns `false` while paused.
    pub fn push(&mut self, snapshot: SerializedApp) -> bool {
        if self.paused {
            return false;
        }
        if !self.stack.is_empty() {
            self.stack.truncate(self.pointer + 1);
        }
        self.stack.push(snapshot);
        self.pointer = self.stack.len() - 1;
        tracing::debug!(pointer = self.pointer, "history push");
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.stack.len()
    }

    /// Step back and return the snapshot now current.
    pub fn undo(&mut self) -> Option<&SerializedApp> {
        if !self.can_undo() {
            return None;
        }
        self.pointer -= 1;
        self.stack.get(self.pointer)
    }

    /// Step forward and return the snapshot now current.
    pub fn redo(&mut self) -> Option<&SerializedApp> {
        if !self.can_redo() {
            return None;
        }
        self.pointer += 1;
        self.stack.get(self.pointer)
    }

    #[must_use]
    pub fn current(&self) -> Option<&SerializedApp> {
        self.stack.get(self.pointer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[must_use]
    pub fn pointer(&self) -> usize {
        self.pointer
    }
}
