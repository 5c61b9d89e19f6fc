//! Pixel rectangles used as affected-area bounding boxes.
//!
//! # Coordinate System
//!
//! Origin (0, 0) is the **top-left** pixel, X grows right, Y grows down.
//! A [`Rect`] covers the half-open pixel range
//! `[x, x + width) × [y, y + height)`.
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │ affected │
//!   │   │   box    │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use remold_core::{Point2D, Rect};
//!
//! // Box touched by a dab of radius 10 at (50, 50) in a 100x100 raster
//! let rect = Rect::around(Point2D::new(50.0, 50.0), 10.0, 100, 100).unwrap();
//! assert_eq!(rect, Rect::new(40, 40, 21, 21));
//!
//! // Entirely off-raster geometry has no box
//! assert!(Rect::around(Point2D::new(-500.0, 20.0), 10.0, 100, 100).is_none());
//! ```

use crate::Point2D;

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// A rectangle with zero width or height is considered empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at the origin covering a whole raster.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Builds the pixel box covering the continuous bounds
    /// `[min_x, max_x] × [min_y, max_y]`, clipped to a `width × height` raster.
    ///
    /// Returns `None` when the bounds are non-finite or miss the raster.
    pub fn from_float_bounds(
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        width: u32,
        height: u32,
    ) -> Option<Rect> {
        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
            return None;
        }
        if min_x > max_x || min_y > max_y {
            return None;
        }

        let x0 = min_x.floor().max(0.0);
        let y0 = min_y.floor().max(0.0);
        let x1 = (max_x.ceil() + 1.0).min(width as f64);
        let y1 = (max_y.ceil() + 1.0).min(height as f64);

        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        Some(Rect::new(
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }

    /// Pixel box of the disc of `radius` around `center`, clipped to the raster.
    #[inline]
    pub fn around(center: Point2D, radius: f64, width: u32, height: u32) -> Option<Rect> {
        Self::from_float_bounds(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
            width,
            height,
        )
    }

    /// Returns the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if the pixel `(px, py)` lies inside.
    #[inline]
    pub const fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Computes the overlap with another rectangle.
    #[inline]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Smallest rectangle containing both.
    #[inline]
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Clips the rectangle to a `max_width × max_height` raster.
    #[inline]
    pub fn clamp_to(&self, max_width: u32, max_height: u32) -> Option<Rect> {
        self.intersect(&Rect::from_size(max_width, max_height))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around_clips_to_raster() {
        let rect = Rect::around(Point2D::new(2.0, 3.0), 5.0, 20, 20).unwrap();
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, 0);
        assert_eq!(rect.right(), 8);
        assert_eq!(rect.bottom(), 9);
    }

    #[test]
    fn test_around_off_raster() {
        assert!(Rect::around(Point2D::new(-50.0, -50.0), 5.0, 20, 20).is_none());
        assert!(Rect::around(Point2D::new(f64::NAN, 1.0), 5.0, 20, 20).is_none());
    }

    #[test]
    fn test_intersect_and_union() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.union(&b), Rect::new(0, 0, 15, 15));
        assert_eq!(Rect::default().union(&b), b);
        assert!(a.intersect(&Rect::new(20, 20, 2, 2)).is_none());
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(10, 20, 5, 5);
        assert!(r.contains(10, 20));
        assert!(!r.contains(15, 20));
    }
}
