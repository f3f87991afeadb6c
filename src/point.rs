//! Points, sizes, and the small vector toolkit the geometry code leans on.
//!
//! Every coordinate pair serializes as a bare `[x, y]` array so documents stay
//! compatible with hosts that store points as number tuples.

#[cfg(test)]
#[path = "point_test.rs"]
mod point_test;

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PRESSURE;

/// A point (or vector) in screen or page space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn len(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn dist(self, other: Self) -> f64 {
        (other - self).len()
    }

    /// Midpoint between two points.
    #[must_use]
    pub fn med(self, other: Self) -> Self {
        (self + other) / 2.0
    }

    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// Component-wise product.
    #[must_use]
    pub fn mul_v(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Component-wise quotient.
    #[must_use]
    pub fn div_v(self, other: Self) -> Self {
        Self::new(self.x / other.x, self.y / other.y)
    }

    /// Rotate about the origin by `angle` radians.
    #[must_use]
    pub fn rot(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// Rotate about `center` by `angle` radians.
    #[must_use]
    pub fn rot_with(self, center: Self, angle: f64) -> Self {
        if angle == 0.0 {
            return self;
        }
        (self - center).rot(angle) + center
    }

    /// Angle of the ray from `self` towards `other`.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Move `self` towards `target` by `distance`, stopping at the target.
    #[must_use]
    pub fn nudge(self, target: Self, distance: f64) -> Self {
        let d = self.dist(target);
        if d <= distance || d == 0.0 {
            return target;
        }
        self.lerp(target, distance / d)
    }

    /// Shortest distance from `self` to the segment `a`-`b`.
    #[must_use]
    pub fn dist_to_segment(self, a: Self, b: Self) -> f64 {
        let ab = b - a;
        let len2 = ab.dot(ab);
        if len2 == 0.0 {
            return self.dist(a);
        }
        let t = ((self - a).dot(ab) / len2).clamp(0.0, 1.0);
        self.dist(a + ab * t)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Point {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Width and height, serialized as `[w, h]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    #[must_use]
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    #[must_use]
    pub fn to_point(self) -> Point {
        Point::new(self.w, self.h)
    }
}

impl From<[f64; 2]> for Size {
    fn from([w, h]: [f64; 2]) -> Self {
        Self { w, h }
    }
}

impl From<Size> for [f64; 2] {
    fn from(s: Size) -> Self {
        [s.w, s.h]
    }
}

/// A freehand sample: position relative to the owning shape plus pen pressure.
///
/// Serializes as `[x, y, pressure]`; a bare `[x, y]` reads back with the
/// default pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 3]")]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
}

impl StrokePoint {
    #[must_use]
    pub const fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    #[must_use]
    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn with_point(self, p: Point) -> Self {
        Self { x: p.x, y: p.y, pressure: self.pressure }
    }
}

impl TryFrom<Vec<f64>> for StrokePoint {
    type Error = String;

    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        match v.as_slice() {
            [x, y] => Ok(Self::new(*x, *y, DEFAULT_PRESSURE)),
            [x, y, p] => Ok(Self::new(*x, *y, *p)),
            other => Err(format!("stroke point needs 2 or 3 numbers, got {}", other.len())),
        }
    }
}

impl From<StrokePoint> for [f64; 3] {
    fn from(p: StrokePoint) -> Self {
        [p.x, p.y, p.pressure]
    }
}

/// Snap `angle` to the nearest multiple of `step`.
#[must_use]
pub fn snap_angle(angle: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return angle;
    }
    (angle / step).round() * step
}

/// Wrap an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(crate::consts::PI2)
}
