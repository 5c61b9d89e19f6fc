//! Four-corner perspective transform.
//!
//! The whole source raster is mapped onto a destination quadrilateral given
//! as `[top-left, top-right, bottom-right, bottom-left]`. Source corner
//! pixels land exactly on the quad corners; target pixels outside the quad
//! read from outside the source and come out transparent.

use remold_core::{Point2D, RasterBuffer};
use remold_math::Homography;
use tracing::trace;

use crate::parallel::shade_rect;
use crate::resample::sample;
use crate::{OpsError, OpsResult};

/// Projective map from source pixel space onto `corners`.
pub fn perspective_matrix(width: u32, height: u32, corners: [Point2D; 4]) -> OpsResult<Homography> {
    let to_quad = Homography::square_to_quad(corners)
        .ok_or_else(|| OpsError::InvalidParameter("degenerate perspective quad".into()))?;
    let sx = (width.max(2) - 1) as f64;
    let sy = (height.max(2) - 1) as f64;
    Ok(to_quad.after(&Homography::scale(1.0 / sx, 1.0 / sy)))
}

/// Warps `src` so that its corners land on `corners`.
///
/// # Example
///
/// ```rust
/// use remold_core::{Point2D, RasterBuffer};
/// use remold_ops::perspective::perspective_warp;
///
/// let src = RasterBuffer::filled(64, 64, [255, 255, 255, 255]).unwrap();
/// let quad = [
///     Point2D::new(16.0, 0.0),
///     Point2D::new(47.0, 0.0),
///     Point2D::new(63.0, 63.0),
///     Point2D::new(0.0, 63.0),
/// ];
/// let out = perspective_warp(&src, quad).unwrap();
/// assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]); // outside the quad
/// assert_eq!(out.pixel(32, 32), [255, 255, 255, 255]);
/// ```
pub fn perspective_warp(src: &RasterBuffer, corners: [Point2D; 4]) -> OpsResult<RasterBuffer> {
    let forward = perspective_matrix(src.width(), src.height(), corners)?;
    let inverse = forward
        .inverse()
        .ok_or_else(|| OpsError::InvalidParameter("perspective quad is not invertible".into()))?;
    trace!(width = src.width(), height = src.height(), "perspective_warp");

    let max_x = (src.width() - 1) as f64;
    let max_y = (src.height() - 1) as f64;
    let mut dst = RasterBuffer::new(src.width(), src.height())?;
    shade_rect(&mut dst, src.bounds(), |x, y| match inverse.map(Point2D::new(x as f64, y as f64)) {
        Some(s) => sample(src, snap(s.x, max_x), snap(s.y, max_y)),
        None => [0, 0, 0, 0],
    });
    Ok(dst)
}

/// Pulls coordinates that miss `[0, max]` only by rounding back onto the edge.
#[inline]
fn snap(v: f64, max: f64) -> f64 {
    const EDGE_EPS: f64 = 1e-6;
    if v < 0.0 && v > -EDGE_EPS {
        0.0
    } else if v > max && v < max + EDGE_EPS {
        max
    } else {
        v
    }
}
