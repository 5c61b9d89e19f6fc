//! Catmull-Rom path densification.
//!
//! Turns a sparse pointer stroke into a dense ordered path. Each segment
//! `p[i] → p[i+1]` is evaluated with neighbours `p[i-1]` and `p[i+2]`;
//! indices past either end repeat the endpoint.
//!
//! ```text
//! q(t) = 0.5 · ( 2·p1
//!              + (-p0 + p2)·t
//!              + (2·p0 - 5·p1 + 4·p2 - p3)·t²
//!              + (-p0 + 3·p1 - 3·p2 + p3)·t³ )
//! ```

use remold_core::Point2D;

/// Canonical Catmull-Rom blend of one axis at `t`.
#[inline]
pub fn catmull_rom_scalar(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Evaluates one segment at `t ∈ [0, 1]`, axes independently.
#[inline]
pub fn catmull_rom_point(p0: Point2D, p1: Point2D, p2: Point2D, p3: Point2D, t: f64) -> Point2D {
    Point2D::new(
        catmull_rom_scalar(p0.x, p1.x, p2.x, p3.x, t),
        catmull_rom_scalar(p0.y, p1.y, p2.y, p3.y, t),
    )
}

/// Densifies `points` into a path with `resolution` samples per segment.
///
/// The last control point is appended so the path ends exactly where the
/// stroke ended. An empty input yields an empty path, a single point yields
/// itself, and a `resolution` of 0 is treated as 1.
///
/// # Example
///
/// ```rust
/// use remold_core::Point2D;
/// use remold_math::catmull_rom;
///
/// let ctrl = [Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), Point2D::new(20.0, 5.0)];
/// let path = catmull_rom(&ctrl, 8);
/// assert_eq!(path.len(), 2 * 8 + 1);
/// assert_eq!(path[0], ctrl[0]);
/// assert_eq!(path[8], ctrl[1]);
/// assert_eq!(*path.last().unwrap(), ctrl[2]);
/// ```
pub fn catmull_rom(points: &[Point2D], resolution: usize) -> Vec<Point2D> {
    let n = points.len();
    if n < 2 {
        return points.to_vec();
    }
    let steps = resolution.max(1);

    let mut path = Vec::with_capacity((n - 1) * steps + 1);
    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];

        for k in 0..steps {
            let t = k as f64 / steps as f64;
            path.push(catmull_rom_point(p0, p1, p2, p3, t));
        }
    }
    path.push(points[n - 1]);
    path
}
