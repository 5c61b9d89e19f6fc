//! Separable Gaussian blur.
//!
//! The kernel for a blur radius `r` has `2⌈r⌉ + 1` taps and `σ = r / 3`,
//! normalised so the weights sum to 1. Blurring runs a horizontal pass into
//! an `f32` intermediate and then a vertical pass; coordinates past the
//! raster edge are clamped (edge pixels replicate).
//!
//! [`gaussian_blur_rect`] restricts the work to a rectangle while still
//! reading neighbours outside it, which is what the smooth brush and the
//! feather pass need.
//!
//! # Example
//!
//! ```rust
//! use remold_core::RasterBuffer;
//! use remold_ops::filter::{gaussian_blur, gaussian_kernel};
//!
//! let k = gaussian_kernel(2.0).unwrap();
//! assert_eq!(k.len(), 5);
//!
//! let src = RasterBuffer::filled(16, 16, [10, 20, 30, 255]).unwrap();
//! let out = gaussian_blur(&src, 2.0).unwrap();
//! assert_eq!(out, src); // flat images stay flat
//! ```

use remold_core::{RasterBuffer, Rect};
use tracing::trace;

use crate::error::{ensure_same_dimensions, require_positive};
use crate::parallel::for_each_row;
use crate::{OpsError, OpsResult};

/// Largest accepted blur radius in pixels.
pub const MAX_RADIUS: f64 = 512.0;

/// Builds a normalised 1-D Gaussian kernel for `radius`.
///
/// Fails with [`OpsError::InvalidParameter`] for non-positive, non-finite or
/// oversized radii.
pub fn gaussian_kernel(radius: f64) -> OpsResult<Vec<f64>> {
    let radius = require_positive("blur radius", radius)?;
    if radius > MAX_RADIUS {
        return Err(OpsError::InvalidParameter(format!(
            "blur radius {radius} exceeds {MAX_RADIUS}"
        )));
    }

    let half = radius.ceil() as i64;
    let sigma = radius / 3.0;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel: Vec<f64> = (-half..=half)
        .map(|i| (-((i * i) as f64) / two_sigma_sq).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    Ok(kernel)
}

/// Blurs the whole raster into a new buffer.
pub fn gaussian_blur(src: &RasterBuffer, radius: f64) -> OpsResult<RasterBuffer> {
    let mut dst = src.clone();
    gaussian_blur_rect(src, &mut dst, radius, src.bounds())?;
    Ok(dst)
}

/// Blurs the pixels of `rect` from `src` into `dst`.
///
/// Neighbours outside `rect` are read from `src`; pixels of `dst` outside
/// `rect` are left as they are.
pub fn gaussian_blur_rect(
    src: &RasterBuffer,
    dst: &mut RasterBuffer,
    radius: f64,
    rect: Rect,
) -> OpsResult<()> {
    ensure_same_dimensions(src, dst)?;
    let kernel = gaussian_kernel(radius)?;
    let Some(rect) = rect.clamp_to(src.width(), src.height()) else {
        return Ok(());
    };
    trace!(radius, rect = %rect, taps = kernel.len(), "gaussian_blur_rect");

    let patch = blur_patch(src, &kernel, rect);
    let rw = rect.width as usize * 4;
    let stride = dst.stride();
    let x0 = rect.x as usize * 4;
    let rows = dst.rows_mut(rect.y, rect.bottom());
    for_each_row(rows, stride, rect.y, |y, row| {
        let line = &patch[(y - rect.y) as usize * rw..][..rw];
        for (out, v) in row[x0..x0 + rw].iter_mut().zip(line) {
            *out = v.round().clamp(0.0, 255.0) as u8;
        }
    });
    Ok(())
}

/// Blurred RGBA values of `rect` (row-major, `rect.width * 4` per row).
///
/// `rect` must lie inside `src`.
pub(crate) fn blur_patch(src: &RasterBuffer, kernel: &[f64], rect: Rect) -> Vec<f32> {
    let w = src.width() as i64;
    let h = src.height() as i64;
    let half = (kernel.len() / 2) as i64;
    let kernel: Vec<f32> = kernel.iter().map(|&k| k as f32).collect();

    // Horizontal pass over the rows the vertical pass will read
    let band_y0 = (rect.y as i64 - half).max(0);
    let band_y1 = (rect.bottom() as i64 + half).min(h);
    let rw = rect.width as usize * 4;
    let mut band = vec![0.0f32; (band_y1 - band_y0) as usize * rw];

    for_each_row(&mut band, rw, band_y0 as u32, |y, row| {
        let line = src.row(y);
        for (i, x) in (rect.x..rect.right()).enumerate() {
            let mut acc = [0.0f32; 4];
            for (k, &kw) in kernel.iter().enumerate() {
                let sx = (x as i64 + k as i64 - half).clamp(0, w - 1) as usize * 4;
                for c in 0..4 {
                    acc[c] += line[sx + c] as f32 * kw;
                }
            }
            row[i * 4..i * 4 + 4].copy_from_slice(&acc);
        }
    });

    // Vertical pass
    let mut out = vec![0.0f32; rect.height as usize * rw];
    for_each_row(&mut out, rw, rect.y, |y, row| {
        for (k, &kw) in kernel.iter().enumerate() {
            let sy = (y as i64 + k as i64 - half).clamp(0, h - 1);
            let line = &band[(sy - band_y0) as usize * rw..][..rw];
            for (o, v) in row.iter_mut().zip(line) {
                *o += v * kw;
            }
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_normalized() {
        for r in [0.5f64, 1.0, 2.5, 7.0, 30.0] {
            let k = gaussian_kernel(r).unwrap();
            assert_eq!(k.len(), 2 * r.ceil() as usize + 1);
            assert_relative_eq!(k.iter().sum::<f64>(), 1.0, epsilon = 1e-6);
            // Symmetric and peaked at the centre
            let mid = k.len() / 2;
            for i in 0..mid {
                assert_relative_eq!(k[i], k[k.len() - 1 - i], epsilon = 1e-15);
                assert!(k[i] <= k[mid]);
            }
        }
    }

    #[test]
    fn test_kernel_rejects_bad_radius() {
        for r in [0.0, -1.0, f64::NAN, f64::INFINITY, 1000.0] {
            assert!(matches!(gaussian_kernel(r), Err(OpsError::InvalidParameter(_))));
        }
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let mut src = RasterBuffer::filled(21, 21, [0, 0, 0, 255]).unwrap();
        src.set_pixel(10, 10, [255, 255, 255, 255]);
        let out = gaussian_blur(&src, 3.0).unwrap();
        let centre = out.pixel(10, 10)[0];
        assert!(centre < 255 && centre > 0);
        assert!(out.pixel(11, 10)[0] > 0);
        assert!(out.pixel(11, 10)[0] <= centre);
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_blur_rect_leaves_outside_alone() {
        let mut src = RasterBuffer::filled(20, 20, [0, 0, 0, 255]).unwrap();
        for y in 0..20 {
            for x in 10..20 {
                src.set_pixel(x, y, [200, 200, 200, 255]);
            }
        }
        let mut dst = src.clone();
        let rect = Rect::new(5, 5, 10, 10);
        gaussian_blur_rect(&src, &mut dst, 2.0, rect).unwrap();

        // Edge inside the rect softened, reading neighbours outside it
        let left = dst.pixel(9, 8)[0];
        let right = dst.pixel(10, 8)[0];
        assert!(left > 0 && right < 200);
        // Outside the rect unchanged
        assert_eq!(dst.pixel(9, 2), src.pixel(9, 2));
        assert_eq!(dst.pixel(16, 8), src.pixel(16, 8));
    }

    #[test]
    fn test_blur_edge_clamping() {
        let src = RasterBuffer::filled(3, 2, [40, 80, 120, 200]).unwrap();
        let out = gaussian_blur(&src, 5.0).unwrap();
        assert_eq!(out, src);
    }
}
