//! Axis-aligned bounds and the transforms applied to them while resizing.
//!
//! All functions are pure; shapes, the brush, and the viewport share them.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// An axis-aligned rectangle. `width` and `height` always equal
/// `max - min`; `rotation` is carried for selection bounds of a single
/// rotated shape and is otherwise zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotation: f64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

/// Resize handle on a selection box: four corners and four edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [Self; 8] = [Self::Nw, Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W];

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    /// Where the handle sits on `bounds`, before rotation.
    #[must_use]
    pub fn position(self, b: &Bounds) -> Point {
        let cx = (b.min_x + b.max_x) / 2.0;
        let cy = (b.min_y + b.max_y) / 2.0;
        match self {
            Self::N => Point::new(cx, b.min_y),
            Self::Ne => Point::new(b.max_x, b.min_y),
            Self::E => Point::new(b.max_x, cy),
            Self::Se => Point::new(b.max_x, b.max_y),
            Self::S => Point::new(cx, b.max_y),
            Self::Sw => Point::new(b.min_x, b.max_y),
            Self::W => Point::new(b.min_x, cy),
            Self::Nw => Point::new(b.min_x, b.min_y),
        }
    }

    fn moves_min_y(self) -> bool {
        matches!(self, Self::N | Self::Nw | Self::Ne)
    }

    fn moves_max_y(self) -> bool {
        matches!(self, Self::S | Self::Sw | Self::Se)
    }

    fn moves_min_x(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    fn moves_max_x(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }
}

/// Result of [`Bounds::transformed`]: the new box plus signed scale factors.
/// A negative scale means the box flipped on that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformedBounds {
    pub bounds: Bounds,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y, width: max_x - min_x, height: max_y - min_y, rotation: 0.0 }
    }

    #[must_use]
    pub fn from_rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    /// Smallest box containing every point, grown by `padding` on each side.
    /// An empty slice yields zero bounds at the origin.
    #[must_use]
    pub fn from_points(points: &[Point], padding: f64) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self::new(min_x - padding, min_y - padding, max_x + padding, max_y + padding)
    }

    /// Union of all bounds, or `None` for an empty iterator.
    pub fn common<I: IntoIterator<Item = Bounds>>(bounds: I) -> Option<Self> {
        bounds.into_iter().reduce(|a, b| {
            Self::new(a.min_x.min(b.min_x), a.min_y.min(b.min_y), a.max_x.max(b.max_x), a.max_y.max(b.max_y))
        })
    }

    /// Bounds of an ellipse with radii `rx`/`ry` whose unrotated box starts
    /// at `point`, after rotating it about its own center.
    #[must_use]
    pub fn of_rotated_ellipse(point: Point, rx: f64, ry: f64, rotation: f64) -> Self {
        let (s, c) = rotation.sin_cos();
        let w = ((rx * c).powi(2) + (ry * s).powi(2)).sqrt();
        let h = ((rx * s).powi(2) + (ry * c).powi(2)).sqrt();
        let cx = point.x + rx;
        let cy = point.y + ry;
        Self::new(cx - w, cy - h, cx + w, cy + h)
    }

    #[must_use]
    pub fn min(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    #[must_use]
    pub fn max(&self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.min_x + self.width / 2.0, self.min_y + self.height / 2.0)
    }

    /// Corners in clockwise order starting top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    /// Corners rotated by `rotation` about the center.
    #[must_use]
    pub fn rotated_corners(&self, rotation: f64) -> [Point; 4] {
        let c = self.center();
        self.corners().map(|p| p.rot_with(c, rotation))
    }

    /// Axis-aligned box around the rotated corners.
    #[must_use]
    pub fn rotated(&self, rotation: f64) -> Self {
        if rotation == 0.0 {
            return Self::new(self.min_x, self.min_y, self.max_x, self.max_y);
        }
        Self::from_points(&self.rotated_corners(rotation), 0.0)
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// True when `other` lies entirely inside `self` (edges may touch).
    #[must_use]
    pub fn contains(&self, other: &Bounds) -> bool {
        self.min_x <= other.min_x && self.min_y <= other.min_y && self.max_x >= other.max_x && self.max_y >= other.max_y
    }

    /// True when the boxes overlap or touch.
    #[must_use]
    pub fn collides(&self, other: &Bounds) -> bool {
        !(self.max_x < other.min_x || self.min_x > other.max_x || self.max_y < other.min_y || self.min_y > other.max_y)
    }

    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    #[must_use]
    pub fn translate(&self, delta: Point) -> Self {
        Self::new(self.min_x + delta.x, self.min_y + delta.y, self.max_x + delta.x, self.max_y + delta.y)
            .with_rotation(self.rotation)
    }

    #[must_use]
    pub fn expand(&self, delta: f64) -> Self {
        Self::new(self.min_x - delta, self.min_y - delta, self.max_x + delta, self.max_y + delta)
    }

    /// The four edges as segments, clockwise from the top.
    #[must_use]
    pub fn edges(&self) -> [(Point, Point); 4] {
        let [tl, tr, br, bl] = self.corners();
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }

    /// Drag `handle` by `delta` (page space) on a box rotated by `rotation`.
    ///
    /// The delta is counter-rotated so edges move as if the box were axis
    /// aligned. With `lock_aspect` the original width/height ratio is kept.
    /// For rotated boxes the anchor opposite the handle stays put in page
    /// space. Flipped axes are swapped back so the result is normalized,
    /// with the flip reported through negative scale factors.
    #[must_use]
    pub fn transformed(&self, handle: ResizeAnchor, delta: Point, rotation: f64, lock_aspect: bool) -> TransformedBounds {
        let (ax0, ay0, ax1, ay1) = (self.min_x, self.min_y, self.max_x, self.max_y);
        let (mut bx0, mut by0, mut bx1, mut by1) = (ax0, ay0, ax1, ay1);

        let d = delta.rot(-rotation);

        if handle.moves_min_y() {
            by0 += d.y;
        }
        if handle.moves_max_y() {
            by1 += d.y;
        }
        if handle.moves_min_x() {
            bx0 += d.x;
        }
        if handle.moves_max_x() {
            bx1 += d.x;
        }

        let aw = ax1 - ax0;
        let ah = ay1 - ay0;

        let scale_x = (bx1 - bx0) / non_zero(aw);
        let scale_y = (by1 - by0) / non_zero(ah);
        let flip_x = scale_x < 0.0;
        let flip_y = scale_y < 0.0;

        let bw = (bx1 - bx0).abs();
        let bh = (by1 - by0).abs();

        if lock_aspect && aw != 0.0 && ah != 0.0 {
            let ar = aw / ah;
            let is_tall = bh == 0.0 || ar < bw / bh;
            let tw = bw * if flip_y { 1.0 } else { -1.0 } * (1.0 / ar);
            let th = bh * if flip_x { 1.0 } else { -1.0 } * ar;

            match handle {
                ResizeAnchor::Nw => {
                    if is_tall {
                        by0 = by1 + tw;
                    } else {
                        bx0 = bx1 + th;
                    }
                }
                ResizeAnchor::Ne => {
                    if is_tall {
                        by0 = by1 + tw;
                    } else {
                        bx1 = bx0 - th;
                    }
                }
                ResizeAnchor::Se => {
                    if is_tall {
                        by1 = by0 - tw;
                    } else {
                        bx1 = bx0 - th;
                    }
                }
                ResizeAnchor::Sw => {
                    if is_tall {
                        by1 = by0 - tw;
                    } else {
                        bx0 = bx1 + th;
                    }
                }
                ResizeAnchor::N | ResizeAnchor::S => {
                    let m = (bx0 + bx1) / 2.0;
                    let w = bh * ar;
                    bx0 = m - w / 2.0;
                    bx1 = m + w / 2.0;
                }
                ResizeAnchor::E | ResizeAnchor::W => {
                    let m = (by0 + by1) / 2.0;
                    let h = bw / ar;
                    by0 = m - h / 2.0;
                    by1 = m + h / 2.0;
                }
            }
        }

        if rotation % crate::consts::PI2 != 0.0 {
            let c0 = Point::new(ax0, ay0).med(Point::new(ax1, ay1));
            let c1 = Point::new(bx0, by0).med(Point::new(bx1, by1));

            // The anchor is the point opposite the dragged handle.
            let (before, after) = match handle {
                ResizeAnchor::Nw => (Point::new(ax1, ay1), Point::new(bx1, by1)),
                ResizeAnchor::Ne => (Point::new(ax0, ay1), Point::new(bx0, by1)),
                ResizeAnchor::Se => (Point::new(ax0, ay0), Point::new(bx0, by0)),
                ResizeAnchor::Sw => (Point::new(ax1, ay0), Point::new(bx1, by0)),
                ResizeAnchor::N => (
                    Point::new(ax0, ay1).med(Point::new(ax1, ay1)),
                    Point::new(bx0, by1).med(Point::new(bx1, by1)),
                ),
                ResizeAnchor::W => (
                    Point::new(ax1, ay0).med(Point::new(ax1, ay1)),
                    Point::new(bx1, by0).med(Point::new(bx1, by1)),
                ),
                ResizeAnchor::S => (
                    Point::new(ax0, ay0).med(Point::new(ax1, ay0)),
                    Point::new(bx0, by0).med(Point::new(bx1, by0)),
                ),
                ResizeAnchor::E => (
                    Point::new(ax0, ay0).med(Point::new(ax0, ay1)),
                    Point::new(bx0, by0).med(Point::new(bx0, by1)),
                ),
            };

            let cv = after.rot_with(c1, rotation) - before.rot_with(c0, rotation);
            bx0 -= cv.x;
            by0 -= cv.y;
            bx1 -= cv.x;
            by1 -= cv.y;
        }

        if bx1 < bx0 {
            std::mem::swap(&mut bx0, &mut bx1);
        }
        if by1 < by0 {
            std::mem::swap(&mut by0, &mut by1);
        }

        let bounds = Self::new(bx0, by0, bx1, by1);
        TransformedBounds {
            scale_x: (bounds.width / non_zero(aw)) * if flip_x { -1.0 } else { 1.0 },
            scale_y: (bounds.height / non_zero(ah)) * if flip_y { -1.0 } else { 1.0 },
            bounds,
        }
    }

    /// Project a member shape's initial bounds into the resized group box.
    ///
    /// `self` is the new group box, `initial` the group box when the resize
    /// began, `shape` the member's bounds at that time. Flipped axes measure
    /// the member's offset from the opposite edge.
    #[must_use]
    pub fn relative_transformed(&self, initial: &Bounds, shape: &Bounds, flip_x: bool, flip_y: bool) -> Self {
        let iw = non_zero(initial.width);
        let ih = non_zero(initial.height);
        let nx = if flip_x { initial.max_x - shape.max_x } else { shape.min_x - initial.min_x } / iw;
        let ny = if flip_y { initial.max_y - shape.max_y } else { shape.min_y - initial.min_y } / ih;
        let nw = if initial.width == 0.0 { 1.0 } else { shape.width / iw };
        let nh = if initial.height == 0.0 { 1.0 } else { shape.height / ih };

        let min_x = self.min_x + self.width * nx;
        let min_y = self.min_y + self.height * ny;
        Self::from_rect(min_x, min_y, self.width * nw, self.height * nh)
    }
}

fn non_zero(v: f64) -> f64 {
    if v == 0.0 { 1.0 } else { v }
}
