//! Point kernels ("dabs") for interactive tools.
//!
//! A dab is one application of an effect at a centre point with the shared
//! [`Falloff`]. Each dab reads `src`, writes the pixels of its bounding box
//! into `dst`, and returns that box, or `None` when the dab misses the raster.
//! Pixels of `dst` outside the returned box are never written, so callers
//! ping-ponging between two buffers only need to sync that box.
//!
//! Displacement dabs are inverse mappings, `source = p - disp`:
//!
//! | Dab | `disp` |
//! |---|---|
//! | [`pinch`] | `(p-c)·0.3·s`, negated to shrink |
//! | [`sculpt`] | `(p-c)·0.2·s`, negated to flatten |
//! | [`push`] | `v·s` for a fixed vector `v` |
//!
//! [`tone`] and [`smooth`] change colour instead of geometry.
//!
//! # Example
//!
//! ```rust
//! use remold_core::{Point2D, RasterBuffer};
//! use remold_ops::brush::{pinch, Dab};
//!
//! let src = RasterBuffer::filled(100, 100, [255, 0, 0, 255]).unwrap();
//! let mut dst = src.clone();
//! let dab = Dab::new(Point2D::new(50.0, 50.0), 30.0, 0.5, 0.0);
//! let rect = pinch(&src, &mut dst, &dab, true).unwrap().unwrap();
//! assert!(rect.contains(50, 50));
//! ```

use remold_core::{Point2D, RasterBuffer, Rect};
use remold_math::{lerp, to_u8, Falloff};
use tracing::trace;

use crate::error::ensure_same_dimensions;
use crate::filter::{blur_patch, gaussian_kernel};
use crate::parallel::shade_rect;
use crate::warp::apply_warp;
use crate::OpsResult;

/// Radial scale of the pinch dab at full strength.
pub const PINCH_FACTOR: f64 = 0.3;

/// Radial scale of the sculpt dab at full strength.
pub const SCULPT_FACTOR: f64 = 0.2;

/// Channel offset of the tone dab at full strength.
pub const TONE_STEP: f64 = 64.0;

/// One kernel application: a centre plus its falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dab {
    /// Effect centre in pixel space.
    pub center: Point2D,
    /// Radius, intensity and feather.
    pub falloff: Falloff,
}

impl Dab {
    /// Creates a dab. `intensity` is in [0, 1], `feather` in percent.
    pub fn new(center: Point2D, radius: f64, intensity: f64, feather: f64) -> Self {
        Self {
            center,
            falloff: Falloff::new(radius, intensity, feather),
        }
    }

    /// Pixel box the dab can touch on a `width × height` raster.
    pub fn bounds(&self, width: u32, height: u32) -> Option<Rect> {
        let r = self.falloff.radius;
        if !self.center.is_finite() || !r.is_finite() || r <= 0.0 {
            return None;
        }
        Rect::around(self.center, r, width, height)
    }

    /// Strength at pixel `p`.
    #[inline]
    pub fn strength(&self, p: Point2D) -> f64 {
        self.falloff.strength_at(p.distance(self.center))
    }
}

/// Shared radial dab: `disp = (p-c)·factor·s`.
fn radial(src: &RasterBuffer, dst: &mut RasterBuffer, dab: &Dab, factor: f64) -> OpsResult<Option<Rect>> {
    ensure_same_dimensions(src, dst)?;
    let Some(rect) = dab.bounds(src.width(), src.height()) else {
        return Ok(None);
    };
    let c = dab.center;
    apply_warp(src, dst, rect, |p| {
        let s = dab.strength(p);
        if s <= 0.0 {
            return None;
        }
        Some(p - (p - c) * (factor * s))
    })?;
    Ok(Some(rect))
}

/// Pinch dab: magnifies content around the centre (`enlarge`) or shrinks it.
pub fn pinch(src: &RasterBuffer, dst: &mut RasterBuffer, dab: &Dab, enlarge: bool) -> OpsResult<Option<Rect>> {
    trace!(x = dab.center.x, y = dab.center.y, radius = dab.falloff.radius, enlarge, "pinch");
    let factor = if enlarge { PINCH_FACTOR } else { -PINCH_FACTOR };
    radial(src, dst, dab, factor)
}

/// Sculpt dab: a gentler radial push, lifting or flattening the area.
pub fn sculpt(src: &RasterBuffer, dst: &mut RasterBuffer, dab: &Dab, lift: bool) -> OpsResult<Option<Rect>> {
    trace!(x = dab.center.x, y = dab.center.y, radius = dab.falloff.radius, lift, "sculpt");
    let factor = if lift { SCULPT_FACTOR } else { -SCULPT_FACTOR };
    radial(src, dst, dab, factor)
}

/// Directional dab: content moves along `vector`, scaled by strength.
///
/// A non-finite vector degrades to zero displacement.
pub fn push(src: &RasterBuffer, dst: &mut RasterBuffer, dab: &Dab, vector: Point2D) -> OpsResult<Option<Rect>> {
    ensure_same_dimensions(src, dst)?;
    trace!(x = dab.center.x, y = dab.center.y, dx = vector.x, dy = vector.y, "push");
    let Some(rect) = dab.bounds(src.width(), src.height()) else {
        return Ok(None);
    };
    let v = if vector.is_finite() { vector } else { Point2D::ZERO };
    apply_warp(src, dst, rect, |p| {
        let s = dab.strength(p);
        if s <= 0.0 {
            return None;
        }
        Some(p - v * s)
    })?;
    Ok(Some(rect))
}

/// Tone dab: adds `tone · 64 · s` to RGB (negative darkens); alpha is kept.
pub fn tone(src: &RasterBuffer, dst: &mut RasterBuffer, dab: &Dab, tone: f64) -> OpsResult<Option<Rect>> {
    ensure_same_dimensions(src, dst)?;
    trace!(x = dab.center.x, y = dab.center.y, tone, "tone");
    let Some(rect) = dab.bounds(src.width(), src.height()) else {
        return Ok(None);
    };
    let step = if tone.is_finite() { tone * TONE_STEP } else { 0.0 };
    shade_rect(dst, rect, |x, y| {
        let px = src.pixel(x, y);
        let s = dab.strength(Point2D::new(x as f64, y as f64));
        if s <= 0.0 {
            return px;
        }
        let delta = step * s;
        [
            to_u8(px[0] as f64 + delta),
            to_u8(px[1] as f64 + delta),
            to_u8(px[2] as f64 + delta),
            px[3],
        ]
    });
    Ok(Some(rect))
}

/// Smooth dab: blends towards a Gaussian-blurred patch (`radius / 8`, at
/// least 1) by strength.
pub fn smooth(src: &RasterBuffer, dst: &mut RasterBuffer, dab: &Dab) -> OpsResult<Option<Rect>> {
    ensure_same_dimensions(src, dst)?;
    let Some(rect) = dab.bounds(src.width(), src.height()) else {
        return Ok(None);
    };
    let blur_radius = (dab.falloff.radius / 8.0).max(1.0);
    trace!(x = dab.center.x, y = dab.center.y, blur_radius, "smooth");

    let kernel = gaussian_kernel(blur_radius)?;
    let patch = blur_patch(src, &kernel, rect);
    let pw = rect.width as usize;

    shade_rect(dst, rect, |x, y| {
        let px = src.pixel(x, y);
        let s = dab.strength(Point2D::new(x as f64, y as f64));
        if s <= 0.0 {
            return px;
        }
        let i = ((y - rect.y) as usize * pw + (x - rect.x) as usize) * 4;
        let mut out = px;
        for c in 0..4 {
            out[c] = to_u8(lerp(px[c] as f64, patch[i + c] as f64, s));
        }
        out
    });
    Ok(Some(rect))
}
