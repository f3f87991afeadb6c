//! Camera state and the viewport that maps between screen and page space.
//!
//! The camera `point` is the page-space offset applied before scaling:
//! `screen = (page + point) * zoom`.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::config::EditorConfig;
use crate::point::Point;

/// Pan offset and zoom factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub point: Point,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { point: Point::ZERO, zoom: 1.0 }
    }
}

/// Screen rectangle of the canvas plus the camera looking into the page.
#[derive(Debug, Clone)]
pub struct Viewport {
    bounds: Bounds,
    camera: Camera,
    min_zoom: f64,
    max_zoom: f64,
    zoom_steps: Vec<f64>,
    fit_padding: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            bounds: Bounds::default(),
            camera: Camera::default(),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_steps: config.zoom_steps.clone(),
            fit_padding: config.fit_padding_px,
        }
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Screen-space rectangle occupied by the canvas.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn update_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Set the camera, clamping zoom into the configured range.
    pub fn update(&mut self, point: Point, zoom: f64) {
        if !point.is_finite() || !zoom.is_finite() {
            tracing::warn!(?point, zoom, "ignoring non-finite camera update");
            return;
        }
        self.camera = Camera { point, zoom: zoom.clamp(self.min_zoom, self.max_zoom) };
    }

    // ── Conversions ─────────────────────────────────────────────

    /// Convert a screen-space point to page space.
    #[must_use]
    pub fn page_point(&self, screen: Point) -> Point {
        screen / self.camera.zoom - self.camera.point
    }

    /// Convert a page-space point to screen space.
    #[must_use]
    pub fn screen_point(&self, page: Point) -> Point {
        (page + self.camera.point) * self.camera.zoom
    }

    /// Page-space rectangle currently visible.
    #[must_use]
    pub fn current_view(&self) -> Bounds {
        let Camera { point, zoom } = self.camera;
        let min_x = -point.x;
        let min_y = -point.y;
        Bounds::new(min_x, min_y, min_x + self.bounds.width / zoom, min_y + self.bounds.height / zoom)
    }

    // ── Navigation ──────────────────────────────────────────────

    /// Pan by a screen-space delta.
    pub fn pan_camera(&mut self, delta: Point) {
        let Camera { point, zoom } = self.camera;
        self.update(point - delta / zoom, zoom);
    }

    /// Pan by `delta` and zoom to `zoom`, keeping the page point under the
    /// screen-space `origin` fixed.
    pub fn pinch_camera(&mut self, origin: Point, delta: Point, zoom: f64) {
        let current = self.camera;
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        let next = current.point - delta / current.zoom;
        let p0 = origin / current.zoom - next;
        let p1 = origin / zoom - next;
        self.update(next + (p1 - p0), zoom);
    }

    /// Zoom about the viewport center.
    pub fn zoom_to(&mut self, zoom: f64) {
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        let center = Point::new(self.bounds.width / 2.0, self.bounds.height / 2.0);
        let Camera { point, zoom: current } = self.camera;
        let p0 = center / current - point;
        let p1 = center / zoom - point;
        self.update(point + (p1 - p0), zoom);
    }

    /// Step to the next configured zoom level above the current one.
    pub fn zoom_in(&mut self) {
        let zoom = self.camera.zoom;
        let next = self.zoom_steps.iter().copied().find(|&z| z > zoom).unwrap_or(self.max_zoom);
        self.zoom_to(next);
    }

    /// Step to the next configured zoom level below the current one.
    pub fn zoom_out(&mut self) {
        let zoom = self.camera.zoom;
        let next = self.zoom_steps.iter().rev().copied().find(|&z| z < zoom).unwrap_or(self.min_zoom);
        self.zoom_to(next);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom_to(1.0);
    }

    /// Fit `target` (page space) into the viewport with padding, centering it.
    pub fn zoom_to_bounds(&mut self, target: &Bounds) {
        let Bounds { width, height, .. } = self.bounds;
        let bw = target.width.max(1.0);
        let bh = target.height.max(1.0);
        let fit = ((width - self.fit_padding) / bw).min((height - self.fit_padding) / bh);
        let zoom = if fit.is_finite() && fit > 0.0 { fit } else { 1.0 }.clamp(self.min_zoom, self.max_zoom);
        let delta = Point::new((width - bw * zoom) / 2.0 / zoom, (height - bh * zoom) / 2.0 / zoom);
        self.update(Point::new(-target.min_x, -target.min_y) + delta, zoom);
    }
}
