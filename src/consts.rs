//! Shared numeric constants for the editor core.

use std::f64::consts::PI;

// ── Math ────────────────────────────────────────────────────────

/// Full turn in radians.
pub const PI2: f64 = PI * 2.0;

/// Quarter turn in radians; polygons and stars start their first vertex here.
pub const TAU: f64 = PI / 2.0;

// ── Gestures ────────────────────────────────────────────────────

/// Pointer travel, in screen pixels, before a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// Screen-space hit slop in pixels for handles and thin edges.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the bounding box edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

/// Rotation snapping increment while shift is held (15°).
pub const ROTATION_SNAP: f64 = PI / 12.0;

// ── Camera ──────────────────────────────────────────────────────

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 8.0;

/// Discrete levels visited by zoom-in / zoom-out.
pub const ZOOM_STEPS: [f64; 7] = [0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0];

/// Screen-space margin kept around content by zoom-to-fit.
pub const FIT_PADDING_PX: f64 = 100.0;

// ── Shapes ──────────────────────────────────────────────────────

/// Smallest width or height a resized box may collapse to.
pub const MIN_SHAPE_SIZE: f64 = 1.0;

pub const DEFAULT_BOX_SIZE: f64 = 100.0;
pub const DEFAULT_DOT_RADIUS: f64 = 4.0;
pub const DEFAULT_POLYGON_SIDES: u32 = 3;

/// Fewest sides a polygon, or tips a star, may have.
pub const MIN_VERTICES: u32 = 3;

/// Most sides a polygon, or tips a star, may have. Larger counts are
/// clamped on load and on update.
pub const MAX_VERTICES: u32 = 1024;

/// Outer vertex count for the default star.
pub const DEFAULT_STAR_POINTS: u32 = 5;

/// Inner-to-outer radius ratio for the default 5-point star.
pub const STAR_INNER_RATIO: f64 = 0.5;

/// Pressure recorded for points that arrive without one.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// Half the stroke width used when hit-testing freehand lines, in page units.
pub const DRAW_HIT_TOLERANCE: f64 = 4.0;

/// Douglas-Peucker tolerance applied to finished freehand strokes.
pub const SIMPLIFY_TOLERANCE: f64 = 1.0;
