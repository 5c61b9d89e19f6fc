//! Continuous 2D points in raster pixel space.
//!
//! Pixel centres sit on integer coordinates: pixel `(3, 4)` is sampled at
//! `Point2D { x: 3.0, y: 4.0 }`. Points are not normalized and may lie
//! outside the raster; consumers clamp or reject them.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A point (or displacement vector) in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// Horizontal coordinate, growing right.
    pub x: f64,
    /// Vertical coordinate, growing down.
    pub y: f64,
}

impl Point2D {
    /// Origin / zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector.
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(self, other: Point2D) -> f64 {
        (self - other).length()
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Unit vector in the same direction.
    ///
    /// `None` for zero-length or non-finite vectors, so callers can fall back
    /// to "no displacement" instead of propagating NaN.
    #[inline]
    pub fn normalized(self) -> Option<Point2D> {
        let len = self.length();
        if !len.is_finite() || len < 1e-9 {
            return None;
        }
        Some(Point2D::new(self.x / len, self.y / len))
    }

    /// Linear interpolation towards `other`.
    #[inline]
    pub fn lerp(self, other: Point2D, t: f64) -> Point2D {
        self + (other - self) * t
    }
}

impl Add for Point2D {
    type Output = Point2D;

    #[inline]
    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    #[inline]
    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;

    #[inline]
    fn mul(self, rhs: f64) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point2D {
    type Output = Point2D;

    #[inline]
    fn neg(self) -> Point2D {
        Point2D::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Point2D::new(x, y)
    }
}
