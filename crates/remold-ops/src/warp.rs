//! Inverse-mapping warps.
//!
//! Every effect computes, for each target pixel, the source coordinate to
//! read, then samples through [`crate::resample::sample`]. Targets are always
//! a different buffer from the source.
//!
//! [`apply_warp`] is the shared driver used by the brush dabs as well; the
//! whole-image radial effects below wrap it:
//!
//! | Effect | Source coordinate |
//! |---|---|
//! | [`bulge`] | `c + (p-c) / (1 + s·sin²(π·d/r))` inside `r` |
//! | [`twist`] | `(p-c)` rotated by `angle·(1-d/r)²` inside `r` |
//! | [`ripple`] | `c + (p-c)·(d + A·sin(d·freq + phase)) / d` |
//! | [`fisheye`] | `c + dir·(d/R)^strength·R` inside `R` |
//! | [`barrel`] | `c + (p-c)·(1 + k1·rn² + k2·rn⁴)` |
//!
//! # Example
//!
//! ```rust
//! use remold_core::{Point2D, RasterBuffer};
//! use remold_ops::warp::twist;
//!
//! let src = RasterBuffer::filled(64, 64, [128, 64, 32, 255]).unwrap();
//! let out = twist(&src, Point2D::new(32.0, 32.0), 20.0, 90.0).unwrap();
//! assert_eq!(out.width(), 64);
//! ```

use std::f64::consts::PI;

use remold_core::{Point2D, RasterBuffer, Rect};
use tracing::trace;

use crate::error::{ensure_same_dimensions, require_finite, require_positive};
use crate::parallel::shade_rect;
use crate::resample::sample;
use crate::OpsResult;

/// Inverse-maps every pixel of `rect` from `src` into `dst`.
///
/// `coord_fn(p)` returns the source coordinate for target pixel `p`, or
/// `None` to copy the source pixel through unchanged. Pixels of `dst`
/// outside `rect` are not touched. `rect` is clipped to the raster.
pub fn apply_warp<F>(src: &RasterBuffer, dst: &mut RasterBuffer, rect: Rect, coord_fn: F) -> OpsResult<()>
where
    F: Fn(Point2D) -> Option<Point2D> + Sync + Send,
{
    ensure_same_dimensions(src, dst)?;
    let Some(rect) = rect.clamp_to(src.width(), src.height()) else {
        return Ok(());
    };

    shade_rect(dst, rect, |x, y| {
        let p = Point2D::new(x as f64, y as f64);
        match coord_fn(p) {
            Some(s) => sample(src, s.x, s.y),
            None => src.pixel(x, y),
        }
    });
    Ok(())
}

/// Runs a whole-image warp into a fresh buffer.
fn warp_whole<F>(src: &RasterBuffer, coord_fn: F) -> OpsResult<RasterBuffer>
where
    F: Fn(Point2D) -> Option<Point2D> + Sync + Send,
{
    let mut dst = src.clone();
    apply_warp(src, &mut dst, src.bounds(), coord_fn)?;
    Ok(dst)
}

/// Radial bulge (`strength > 0`) or pinch (`strength < 0`) inside `radius`.
pub fn bulge(src: &RasterBuffer, center: Point2D, radius: f64, strength: f64) -> OpsResult<RasterBuffer> {
    let radius = require_positive("radius", radius)?;
    let strength = require_finite("strength", strength)?;
    trace!(width = src.width(), height = src.height(), radius, strength, "bulge");

    warp_whole(src, |p| {
        let off = p - center;
        let d = off.length();
        if d >= radius {
            return None;
        }
        let s = (PI * d / radius).sin();
        let scale = 1.0 + strength * s * s;
        if scale.abs() < 1e-9 {
            return None;
        }
        Some(center + off * (1.0 / scale))
    })
}

/// Swirl around `center`, strongest at the centre and fading to zero at `radius`.
///
/// # Arguments
/// * `angle_deg` - Twist angle at the centre; sign sets the direction
pub fn twist(src: &RasterBuffer, center: Point2D, radius: f64, angle_deg: f64) -> OpsResult<RasterBuffer> {
    let radius = require_positive("radius", radius)?;
    let angle = require_finite("angle", angle_deg)?.to_radians();
    trace!(width = src.width(), height = src.height(), radius, angle_deg, "twist");

    warp_whole(src, |p| {
        let off = p - center;
        let d = off.length();
        if d >= radius {
            return None;
        }
        let t = 1.0 - d / radius;
        let (sin, cos) = (angle * t * t).sin_cos();
        Some(Point2D::new(
            center.x + off.x * cos - off.y * sin,
            center.y + off.x * sin + off.y * cos,
        ))
    })
}

/// Concentric ripple around `center`.
///
/// # Arguments
/// * `amplitude` - Radial displacement in pixels
/// * `frequency` - Angular frequency in radians per pixel of distance
/// * `phase` - Phase offset in radians
pub fn ripple(
    src: &RasterBuffer,
    center: Point2D,
    amplitude: f64,
    frequency: f64,
    phase: f64,
) -> OpsResult<RasterBuffer> {
    let amplitude = require_finite("amplitude", amplitude)?;
    let frequency = require_finite("frequency", frequency)?;
    let phase = require_finite("phase", phase)?;
    trace!(width = src.width(), height = src.height(), amplitude, frequency, "ripple");

    warp_whole(src, |p| {
        let off = p - center;
        let d = off.length();
        if d < 1e-9 {
            return None;
        }
        let factor = (d + amplitude * (d * frequency + phase).sin()) / d;
        Some(center + off * factor)
    })
}

/// Fisheye inside the disk of `radius` around `center`.
///
/// `strength > 1` pinches, `strength < 1` bulges, `1` is the identity.
/// Pixels outside the disk pass through unchanged.
pub fn fisheye(src: &RasterBuffer, center: Point2D, radius: f64, strength: f64) -> OpsResult<RasterBuffer> {
    let radius = require_positive("radius", radius)?;
    let strength = require_positive("strength", strength)?;
    trace!(width = src.width(), height = src.height(), radius, strength, "fisheye");

    warp_whole(src, |p| {
        let off = p - center;
        let dn = off.length() / radius;
        if dn >= 1.0 {
            return None;
        }
        let dir = off.normalized()?;
        Some(center + dir * (dn.powf(strength) * radius))
    })
}

/// Lens distortion about the image centre.
///
/// Radius is normalised by half the longer side. `k1 > 0` gives barrel,
/// `k1 < 0` pincushion.
pub fn barrel(src: &RasterBuffer, k1: f64, k2: f64) -> OpsResult<RasterBuffer> {
    let k1 = require_finite("k1", k1)?;
    let k2 = require_finite("k2", k2)?;
    trace!(width = src.width(), height = src.height(), k1, k2, "barrel");

    let center = Point2D::new(
        (src.width() - 1) as f64 / 2.0,
        (src.height() - 1) as f64 / 2.0,
    );
    let norm = src.width().max(src.height()) as f64 / 2.0;

    warp_whole(src, |p| {
        let off = p - center;
        let rn = off.length() / norm;
        let r2 = rn * rn;
        let factor = 1.0 + k1 * r2 + k2 * r2 * r2;
        Some(center + off * factor)
    })
}

/// Pincushion distortion: [`barrel`] with negated coefficients.
pub fn pincushion(src: &RasterBuffer, k1: f64, k2: f64) -> OpsResult<RasterBuffer> {
    barrel(src, -k1.abs(), -k2.abs())
}
