//! Event scripts: one JSON object per line, tagged by `event`.
//!
//! ```text
//! {"event":"selectTool","tool":"box"}
//! {"event":"pointerDown","point":[10,10]}
//! {"event":"pointerMove","point":[60,50]}
//! {"event":"pointerUp","point":[60,50]}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use serde::Deserialize;
use sketchcore::input::{KeyInput, PinchInput, PointerInput, WheelInput};
use sketchcore::point::Point;
use sketchcore::shape::ShapeId;
use sketchcore::{App, Change, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Step {
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp(PointerInput),
    PointerCancel {
        #[serde(default, rename = "pointerId")]
        pointer_id: i32,
    },
    /// Press and release at the same point.
    Click(PointerInput),
    Wheel(WheelInput),
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    PinchStart(PinchInput),
    Pinch(PinchInput),
    PinchEnd(PinchInput),
    SelectTool {
        tool: String,
    },
    ToolLock {
        locked: bool,
    },
    Camera {
        point: Point,
        zoom: f64,
    },
    ZoomToFit,
    Select {
        ids: Vec<ShapeId>,
    },
    /// Deletes `ids`, or the selection when empty.
    Delete {
        #[serde(default)]
        ids: Vec<ShapeId>,
    },
    Undo,
    Redo,
    Tick,
    Persist,
}

/// Parse one script line; `None` for blanks and comments.
///
/// # Errors
///
/// Malformed JSON or an unknown event name.
pub fn parse_line(line: &str) -> serde_json::Result<Option<Step>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

/// Feed `step` to `app` the way a host would.
///
/// # Errors
///
/// Whatever the app rejects.
pub fn apply(app: &mut App, step: Step) -> Result<Vec<Change>> {
    match step {
        Step::PointerDown(input) => app.pointer_down(input),
        Step::PointerMove(input) => app.pointer_move(input),
        Step::PointerUp(input) => app.pointer_up(input),
        Step::PointerCancel { pointer_id } => app.pointer_cancel(pointer_id),
        Step::Click(input) => {
            let mut changes = app.pointer_down(input)?;
            changes.extend(app.pointer_up(input)?);
            Ok(changes)
        }
        Step::Wheel(input) => app.wheel(input),
        Step::KeyDown(input) => app.key_down(input),
        Step::KeyUp(input) => app.key_up(input),
        Step::PinchStart(input) => app.pinch_start(input),
        Step::Pinch(input) => app.pinch(input),
        Step::PinchEnd(input) => app.pinch_end(input),
        Step::SelectTool { tool } => app.select_tool(&tool),
        Step::ToolLock { locked } => Ok(app.set_tool_lock(locked)),
        Step::Camera { point, zoom } => Ok(app.set_camera(point, zoom)),
        Step::ZoomToFit => Ok(app.zoom_to_fit()),
        Step::Select { ids } => Ok(app.select(&ids)),
        Step::Delete { ids } => app.delete_shapes(&ids),
        Step::Undo => app.undo(),
        Step::Redo => app.redo(),
        Step::Tick => Ok(app.tick()),
        Step::Persist => Ok(app.persist()),
    }
}
