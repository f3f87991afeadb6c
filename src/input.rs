//! Input model: event payloads from the host, pointer targets, and the
//! normalizer that tracks pointer and keyboard state between events.
//!
//! Hosts send screen-space coordinates. The app converts them to page space
//! through the viewport and feeds the result into [`Inputs`] before any state
//! handler runs, so handlers always read current values.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::bounds::ResizeAnchor;
use crate::consts::DEFAULT_PRESSURE;
use crate::point::Point;
use crate::shape::ShapeId;

// =============================================================================
// Event payloads
// =============================================================================

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as named by the host (e.g. `"Delete"`, `"Escape"`, `"a"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shift, Alt, Control, or Meta.
    #[must_use]
    pub fn is_modifier(&self) -> bool {
        matches!(self.0.as_str(), "Shift" | "Alt" | "Control" | "Ctrl" | "Meta")
    }

    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

fn default_pressure() -> f64 {
    DEFAULT_PRESSURE
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerInput {
    pub point: Point,
    #[serde(default = "default_pressure")]
    pub pressure: f64,
    #[serde(default)]
    pub pointer_id: i32,
    #[serde(default)]
    pub button: Button,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerInput {
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self { point: Point::new(x, y), pressure: DEFAULT_PRESSURE, pointer_id: 0, button: Button::Primary, modifiers: Modifiers::default() }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInput {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: Key::new(key), modifiers: Modifiers::default() }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Wheel / trackpad scroll at a screen point; `delta` is in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelInput {
    pub point: Point,
    pub delta: Point,
    #[serde(default)]
    pub modifiers: Modifiers,
}

/// Two-finger pinch: screen-space origin, pan delta, and absolute target zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinchInput {
    pub origin: Point,
    #[serde(default)]
    pub delta: Point,
    pub zoom: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

// =============================================================================
// Targets
// =============================================================================

/// Part of the selection box a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "anchor", rename_all = "camelCase")]
pub enum BoundsHandle {
    Resize(ResizeAnchor),
    Rotate,
    Center,
    Background,
}

/// What a pointer event landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Target {
    Canvas,
    Shape(ShapeId),
    Bounds(BoundsHandle),
}

impl Target {
    #[must_use]
    pub fn shape_id(&self) -> Option<&str> {
        match self {
            Self::Shape(id) => Some(id),
            _ => None,
        }
    }
}

/// Routing info for one delivery of an event. A single physical event hits
/// several targets, topmost first; `order` counts deliveries so handlers can
/// ignore all but the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInfo {
    pub target: Target,
    pub order: u32,
}

impl EventInfo {
    #[must_use]
    pub fn canvas() -> Self {
        Self { target: Target::Canvas, order: 0 }
    }
}

// =============================================================================
// Normalizer
// =============================================================================

/// Coarse gesture phase tracked by the normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputPhase {
    #[default]
    Idle,
    Pointing,
    Pinching,
}

/// Pointer capture changes the host must mirror on the DOM element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    Set(i32),
    Release(i32),
}

/// Current pointer/keyboard state in page space.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub current_point: Point,
    pub previous_point: Point,
    pub origin_point: Point,
    pub current_screen_point: Point,
    pub origin_screen_point: Point,
    pub pressure: f64,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub phase: InputPhase,
    keys: BTreeSet<Key>,
    pointer_ids: BTreeSet<i32>,
    captured: Option<i32>,
}

impl Inputs {
    #[must_use]
    pub fn new() -> Self {
        Self { pressure: DEFAULT_PRESSURE, ..Self::default() }
    }

    fn set_modifiers(&mut self, m: Modifiers) {
        self.shift = m.shift;
        self.ctrl = m.ctrl;
        self.alt = m.alt;
        self.meta = m.meta;
    }

    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        Modifiers { shift: self.shift, ctrl: self.ctrl, alt: self.alt, meta: self.meta }
    }

    fn move_to(&mut self, page: Point, screen: Point) {
        self.previous_point = self.current_point;
        self.current_point = page;
        self.current_screen_point = screen;
    }

    /// Record a press. Capture is requested for the first pointer only.
    pub fn on_pointer_down(&mut self, page: Point, input: &PointerInput) -> Option<Capture> {
        self.set_modifiers(input.modifiers);
        self.pressure = input.pressure;
        self.move_to(page, input.point);
        self.origin_point = page;
        self.origin_screen_point = input.point;
        self.pointer_ids.insert(input.pointer_id);
        if self.phase == InputPhase::Idle {
            self.phase = InputPhase::Pointing;
        }
        if self.captured.is_none() {
            self.captured = Some(input.pointer_id);
            return Some(Capture::Set(input.pointer_id));
        }
        None
    }

    pub fn on_pointer_move(&mut self, page: Point, input: &PointerInput) {
        self.set_modifiers(input.modifiers);
        self.pressure = input.pressure;
        self.move_to(page, input.point);
    }

    /// Record a release, handing back the capture to undo if this pointer held it.
    pub fn on_pointer_up(&mut self, page: Point, input: &PointerInput) -> Option<Capture> {
        self.set_modifiers(input.modifiers);
        self.move_to(page, input.point);
        self.release(input.pointer_id)
    }

    /// Forget a pointer the platform cancelled.
    pub fn on_pointer_cancel(&mut self, pointer_id: i32) -> Option<Capture> {
        self.release(pointer_id)
    }

    fn release(&mut self, pointer_id: i32) -> Option<Capture> {
        self.pointer_ids.remove(&pointer_id);
        if self.pointer_ids.is_empty() && self.phase == InputPhase::Pointing {
            self.phase = InputPhase::Idle;
        }
        if self.captured == Some(pointer_id) {
            self.captured = None;
            return Some(Capture::Release(pointer_id));
        }
        None
    }

    /// Wheel panning moves the page under a stationary pointer.
    pub fn on_wheel(&mut self, page: Point, input: &WheelInput) {
        self.set_modifiers(input.modifiers);
        self.move_to(page, input.point);
    }

    pub fn on_key_down(&mut self, input: &KeyInput) {
        self.set_modifiers(input.modifiers);
        self.keys.insert(input.key.clone());
    }

    pub fn on_key_up(&mut self, input: &KeyInput) {
        self.set_modifiers(input.modifiers);
        self.keys.remove(&input.key);
    }

    pub fn on_pinch_start(&mut self, page: Point, input: &PinchInput) {
        self.set_modifiers(input.modifiers);
        self.move_to(page, input.origin);
        self.origin_point = page;
        self.origin_screen_point = input.origin;
        self.phase = InputPhase::Pinching;
    }

    pub fn on_pinch(&mut self, page: Point, input: &PinchInput) {
        self.set_modifiers(input.modifiers);
        self.move_to(page, input.origin);
    }

    pub fn on_pinch_end(&mut self, page: Point, input: &PinchInput) {
        self.set_modifiers(input.modifiers);
        self.move_to(page, input.origin);
        self.phase = if self.pointer_ids.is_empty() { InputPhase::Idle } else { InputPhase::Pointing };
    }

    /// Re-express the stored page points after the camera moved under them.
    pub fn rebase(&mut self, page: Point) {
        self.current_point = page;
    }

    #[must_use]
    pub fn is_pointer_down(&self) -> bool {
        !self.pointer_ids.is_empty()
    }

    #[must_use]
    pub fn is_key_down(&self, name: &str) -> bool {
        self.keys.iter().any(|k| k.is(name))
    }

    #[must_use]
    pub fn captured_pointer(&self) -> Option<i32> {
        self.captured
    }

    /// Page-space travel since the press.
    #[must_use]
    pub fn drag_delta(&self) -> Point {
        self.current_point - self.origin_point
    }
}
