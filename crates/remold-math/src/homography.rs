//! Projective 3×3 transforms between the unit square and quadrilaterals.
//!
//! Matrices are applied to column vectors `(x, y, 1)` and the result is
//! divided by its third component:
//!
//! ```text
//! | a b c |   | u |   | a·u + b·v + c |          X = (a·u + b·v + c) / w
//! | d e f | * | v | = | d·u + e·v + f |   →      Y = (d·u + e·v + f) / w
//! | g h 1 |   | 1 |   | g·u + h·v + 1 | = w
//! ```
//!
//! [`Homography::square_to_quad`] is the closed-form projective solve, so all
//! four corners map exactly and interior points stay projectively consistent.
//!
//! # Usage
//!
//! ```rust
//! use remold_core::Point2D;
//! use remold_math::Homography;
//!
//! let quad = [
//!     Point2D::new(10.0, 10.0),
//!     Point2D::new(90.0, 20.0),
//!     Point2D::new(80.0, 90.0),
//!     Point2D::new(5.0, 70.0),
//! ];
//! let h = Homography::square_to_quad(quad).unwrap();
//! let p = h.map(Point2D::new(1.0, 1.0)).unwrap();
//! assert!((p.x - 80.0).abs() < 1e-9 && (p.y - 90.0).abs() < 1e-9);
//! ```

use glam::{DMat3, DVec3};
use remold_core::Point2D;

/// Below this magnitude a determinant or homogeneous `w` counts as zero.
const EPS: f64 = 1e-12;

/// A planar projective transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    /// Column-major glam matrix.
    pub matrix: DMat3,
}

impl Homography {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        matrix: DMat3::IDENTITY,
    };

    /// Axis-aligned scale.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            matrix: DMat3::from_diagonal(DVec3::new(sx, sy, 1.0)),
        }
    }

    /// Maps the unit square corners `(0,0), (1,0), (1,1), (0,1)` onto `quad`
    /// (same order: top-left, top-right, bottom-right, bottom-left).
    ///
    /// Returns `None` for degenerate quads (collinear or non-finite corners).
    pub fn square_to_quad(quad: [Point2D; 4]) -> Option<Self> {
        if !quad.iter().all(|p| p.is_finite()) {
            return None;
        }
        let [p0, p1, p2, p3] = quad;

        let sx = p0.x - p1.x + p2.x - p3.x;
        let sy = p0.y - p1.y + p2.y - p3.y;

        let (a, b, c, d, e, f, g, h);
        if sx.abs() < EPS && sy.abs() < EPS {
            // Parallelogram: the affine special case
            a = p1.x - p0.x;
            b = p3.x - p0.x;
            c = p0.x;
            d = p1.y - p0.y;
            e = p3.y - p0.y;
            f = p0.y;
            g = 0.0;
            h = 0.0;
        } else {
            let dx1 = p1.x - p2.x;
            let dx2 = p3.x - p2.x;
            let dy1 = p1.y - p2.y;
            let dy2 = p3.y - p2.y;
            let den = dx1 * dy2 - dx2 * dy1;
            if den.abs() < EPS {
                return None;
            }
            g = (sx * dy2 - dx2 * sy) / den;
            h = (dx1 * sy - sx * dy1) / den;
            a = p1.x - p0.x + g * p1.x;
            b = p3.x - p0.x + h * p3.x;
            c = p0.x;
            d = p1.y - p0.y + g * p1.y;
            e = p3.y - p0.y + h * p3.y;
            f = p0.y;
        }

        let matrix = DMat3::from_cols(
            DVec3::new(a, d, g),
            DVec3::new(b, e, h),
            DVec3::new(c, f, 1.0),
        );
        if matrix.determinant().abs() < EPS || !matrix.is_finite() {
            return None;
        }
        Some(Self { matrix })
    }

    /// Inverse transform, `None` if singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.matrix.determinant();
        if !det.is_finite() || det.abs() < EPS {
            return None;
        }
        Some(Self {
            matrix: self.matrix.inverse(),
        })
    }

    /// `self ∘ first`: applies `first`, then `self`.
    pub fn after(&self, first: &Homography) -> Self {
        Self {
            matrix: self.matrix * first.matrix,
        }
    }

    /// Applies the transform. `None` when the point maps to infinity.
    #[inline]
    pub fn map(&self, p: Point2D) -> Option<Point2D> {
        let v = self.matrix * DVec3::new(p.x, p.y, 1.0);
        if !v.z.is_finite() || v.z.abs() < EPS {
            return None;
        }
        let out = Point2D::new(v.x / v.z, v.y / v.z);
        out.is_finite().then_some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> [Point2D; 4] {
        [
            Point2D::new(12.0, 4.0),
            Point2D::new(95.0, 18.0),
            Point2D::new(70.0, 88.0),
            Point2D::new(3.0, 60.0),
        ]
    }

    #[test]
    fn test_corners_map_exactly() {
        let h = Homography::square_to_quad(quad()).unwrap();
        let unit = [
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(0.0, 1.0),
        ];
        for (u, q) in unit.iter().zip(quad()) {
            let p = h.map(*u).unwrap();
            assert_relative_eq!(p.x, q.x, epsilon = 1e-9);
            assert_relative_eq!(p.y, q.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_inverse_roundtrip() {
        let h = Homography::square_to_quad(quad()).unwrap();
        let inv = h.inverse().unwrap();
        let p = Point2D::new(0.3, 0.7);
        let back = inv.map(h.map(p).unwrap()).unwrap();
        assert_relative_eq!(back.x, 0.3, epsilon = 1e-9);
        assert_relative_eq!(back.y, 0.7, epsilon = 1e-9);
    }

    #[test]
    fn test_parallelogram_is_affine() {
        let h = Homography::square_to_quad([
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(12.0, 5.0),
            Point2D::new(2.0, 5.0),
        ])
        .unwrap();
        let mid = h.map(Point2D::new(0.5, 0.5)).unwrap();
        assert_relative_eq!(mid.x, 6.0, epsilon = 1e-12);
        assert_relative_eq!(mid.y, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_quad() {
        let line = [
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(2.0, 2.0),
            Point2D::new(3.0, 3.0),
        ];
        assert!(Homography::square_to_quad(line).is_none());
        let nan = [Point2D::new(f64::NAN, 0.0); 4];
        assert!(Homography::square_to_quad(nan).is_none());
    }

    #[test]
    fn test_scale_compose() {
        let s = Homography::scale(2.0, 3.0);
        let t = s.after(&Homography::scale(0.5, 0.5));
        let p = t.map(Point2D::new(4.0, 4.0)).unwrap();
        assert_relative_eq!(p.x, 4.0);
        assert_relative_eq!(p.y, 6.0);
    }
}
