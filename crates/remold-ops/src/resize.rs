//! Raster resizing for export presets.
//!
//! Every output pixel centre maps back into the source and is read with
//! [`sample_clamped`], so edges replicate instead of fading to transparent.
//! When shrinking, the source is Gaussian-blurred first (`σ ≈ scale / 2`) so
//! skipped source pixels still contribute.
//!
//! # Example
//!
//! ```rust
//! use remold_core::RasterBuffer;
//! use remold_ops::resize::resize;
//!
//! let src = RasterBuffer::filled(64, 48, [10, 20, 30, 255]).unwrap();
//! let dst = resize(&src, 128, 96).unwrap();
//! assert_eq!((dst.width(), dst.height()), (128, 96));
//! ```

use std::borrow::Cow;

use remold_core::RasterBuffer;
use tracing::trace;

use crate::filter::gaussian_blur;
use crate::parallel::for_each_row;
use crate::resample::sample_clamped;
use crate::{OpsError, OpsResult};

/// Resizes `src` to `width × height` with bilinear reconstruction.
pub fn resize(src: &RasterBuffer, width: u32, height: u32) -> OpsResult<RasterBuffer> {
    if width == 0 || height == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "destination size must be > 0, got {width}x{height}"
        )));
    }
    if width == src.width() && height == src.height() {
        return Ok(src.clone());
    }

    let sx = src.width() as f64 / width as f64;
    let sy = src.height() as f64 / height as f64;
    let shrink = sx.max(sy);
    trace!(from_w = src.width(), from_h = src.height(), to_w = width, to_h = height, shrink, "resize");

    // Blur radius is 3σ
    let source = if shrink > 1.0 {
        Cow::Owned(gaussian_blur(src, 1.5 * shrink)?)
    } else {
        Cow::Borrowed(src)
    };

    let mut dst = RasterBuffer::new(width, height)?;
    let stride = dst.stride();
    for_each_row(dst.as_bytes_mut(), stride, 0, |y, row| {
        let fy = (y as f64 + 0.5) * sy - 0.5;
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let fx = (x as f64 + 0.5) * sx - 0.5;
            px.copy_from_slice(&sample_clamped(&source, fx, fy));
        }
    });
    Ok(dst)
}

/// Dimensions after scaling by `scale`, rounded, at least 1×1.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> OpsResult<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(OpsError::InvalidParameter(format!("scale must be positive, got {scale}")));
    }
    let w = (width as f64 * scale).round();
    let h = (height as f64 * scale).round();
    if w > u32::MAX as f64 || h > u32::MAX as f64 {
        return Err(OpsError::InvalidDimensions(format!("{width}x{height} scaled by {scale} overflows")));
    }
    Ok(((w as u32).max(1), (h as u32).max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_same_size_is_copy() {
        let mut src = RasterBuffer::new(3, 2).unwrap();
        src.set_pixel(1, 1, [1, 2, 3, 4]);
        assert_eq!(resize(&src, 3, 2).unwrap(), src);
    }

    #[test]
    fn test_constant_stays_constant() {
        let src = RasterBuffer::filled(16, 9, [128, 64, 32, 255]).unwrap();
        for (w, h) in [(64, 36), (5, 3), (16, 40)] {
            let dst = resize(&src, w, h).unwrap();
            assert_eq!((dst.width(), dst.height()), (w, h));
            for px in dst.as_bytes().chunks_exact(4) {
                assert_eq!(px, &[128, 64, 32, 255], "{w}x{h}");
            }
        }
    }

    #[test]
    fn test_upscale_interpolates() {
        let mut src = RasterBuffer::new(2, 1).unwrap();
        src.set_pixel(0, 0, [0, 0, 0, 255]);
        src.set_pixel(1, 0, [200, 0, 0, 255]);
        let dst = resize(&src, 8, 1).unwrap();
        let reds: Vec<u8> = (0..8).map(|x| dst.pixel(x, 0)[0]).collect();
        assert!(reds.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(reds[0], 0);
        assert_eq!(reds[7], 200);
        // Edges replicate rather than fade
        assert!(dst.as_bytes().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_downscale_averages_stripes() {
        let mut src = RasterBuffer::new(64, 4).unwrap();
        for y in 0..4 {
            for x in 0..64 {
                let v = if x % 2 == 0 { 255 } else { 0 };
                src.set_pixel(x, y, [v, v, v, 255]);
            }
        }
        let dst = resize(&src, 8, 1).unwrap();
        for x in 1..7 {
            let v = dst.pixel(x, 0)[0];
            assert!((100..=155).contains(&v), "x={x}: {v}");
        }
    }

    #[test]
    fn test_zero_target() {
        let src = RasterBuffer::new(4, 4).unwrap();
        assert!(matches!(resize(&src, 0, 4), Err(OpsError::InvalidDimensions(_))));
    }

    #[test]
    fn test_scaled_dimensions() {
        assert_eq!(scaled_dimensions(1000, 500, 3.84).unwrap(), (3840, 1920));
        assert_eq!(scaled_dimensions(10, 10, 0.01).unwrap(), (1, 1));
        assert!(scaled_dimensions(10, 10, 0.0).is_err());
        assert!(scaled_dimensions(10, 10, f64::NAN).is_err());
    }
}
