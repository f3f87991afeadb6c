//! Editor tuning knobs: gesture thresholds, handle sizes, zoom limits.
//!
//! Hosts pass a JSON object with any subset of the fields; missing fields
//! take the defaults from [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DRAG_THRESHOLD_PX, FIT_PADDING_PX, HANDLE_RADIUS_PX, MAX_ZOOM, MIN_ZOOM, ROTATE_HANDLE_OFFSET_PX, ROTATION_SNAP, ZOOM_STEPS,
};
use crate::error::{EditorError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Screen pixels a pointer must travel before a press becomes a drag.
    pub drag_threshold_px: f64,
    pub handle_radius_px: f64,
    pub rotate_handle_offset_px: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Ascending zoom levels for zoom-in / zoom-out.
    pub zoom_steps: Vec<f64>,
    pub fit_padding_px: f64,
    /// Rotation increment, in radians, while shift is held.
    pub rotation_snap: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: DRAG_THRESHOLD_PX,
            handle_radius_px: HANDLE_RADIUS_PX,
            rotate_handle_offset_px: ROTATE_HANDLE_OFFSET_PX,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_steps: ZOOM_STEPS.to_vec(),
            fit_padding_px: FIT_PADDING_PX,
            rotation_snap: ROTATION_SNAP,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config object.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or on values rejected by [`Self::validate`].
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that would otherwise produce NaN geometry.
    ///
    /// # Errors
    ///
    /// [`EditorError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("dragThresholdPx", self.drag_threshold_px),
            ("handleRadiusPx", self.handle_radius_px),
            ("rotateHandleOffsetPx", self.rotate_handle_offset_px),
            ("fitPaddingPx", self.fit_padding_px),
            ("rotationSnap", self.rotation_snap),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(EditorError::Config(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom && self.max_zoom.is_finite()) {
            return Err(EditorError::Config(format!(
                "zoom range must satisfy 0 < minZoom <= maxZoom, got {}..{}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_steps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(EditorError::Config("zoomSteps must be strictly ascending".into()));
        }
        Ok(())
    }
}
