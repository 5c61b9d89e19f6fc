//! Mirror blit.
//!
//! [`mirror_rect`] copies the left half of a rectangle onto its right half,
//! flipped about the rectangle's vertical centre line. Pixels are copied
//! exactly, no resampling.
//!
//! # Example
//!
//! ```rust
//! use remold_core::{RasterBuffer, Rect};
//! use remold_ops::transform::{mirror_partner, mirror_rect};
//!
//! let mut src = RasterBuffer::new(4, 1).unwrap();
//! src.set_pixel(0, 0, [1, 0, 0, 255]);
//! src.set_pixel(1, 0, [2, 0, 0, 255]);
//!
//! let mut dst = src.clone();
//! let rect = Rect::new(0, 0, 4, 1);
//! mirror_rect(&src, &mut dst, rect).unwrap();
//! assert_eq!(dst.pixel(3, 0), [1, 0, 0, 255]);
//! assert_eq!(dst.pixel(2, 0), [2, 0, 0, 255]);
//! assert_eq!(mirror_partner(0, rect), 3);
//! ```

use remold_core::{RasterBuffer, Rect};
use tracing::trace;

use crate::error::ensure_same_dimensions;
use crate::parallel::shade_rect;
use crate::OpsResult;

/// Column that `x` mirrors onto within `rect`: `x0 + x1 - 1 - x`.
#[inline]
pub fn mirror_partner(x: u32, rect: Rect) -> u32 {
    rect.x + rect.right() - 1 - x
}

/// Writes `rect` of `dst` as `src` with the left half reflected onto the
/// right half. The left half and an odd centre column are copied unchanged.
///
/// `rect` is clipped to the raster first; returns the clipped box, or `None`
/// when it misses the raster.
pub fn mirror_rect(src: &RasterBuffer, dst: &mut RasterBuffer, rect: Rect) -> OpsResult<Option<Rect>> {
    ensure_same_dimensions(src, dst)?;
    let Some(rect) = rect.clamp_to(src.width(), src.height()) else {
        return Ok(None);
    };
    trace!(rect = %rect, "mirror_rect");

    let half = rect.width / 2;
    let right_start = rect.right() - half;
    shade_rect(dst, rect, |x, y| {
        if x >= right_start {
            src.pixel(mirror_partner(x, rect), y)
        } else {
            src.pixel(x, y)
        }
    });
    Ok(Some(rect))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(w: u32, h: u32) -> RasterBuffer {
        let mut buf = RasterBuffer::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                let v = (x * 37 + y * 101) % 251;
                buf.set_pixel(x, y, [v as u8, (v * 3 % 256) as u8, x as u8, 255]);
            }
        }
        buf
    }

    #[test]
    fn test_mirror_is_symmetric() {
        for width in [10, 11] {
            let src = noise(30, 20);
            let mut dst = src.clone();
            let rect = Rect::new(5, 4, width, 9);
            mirror_rect(&src, &mut dst, rect).unwrap();
            for y in rect.y..rect.bottom() {
                for x in rect.x..rect.right() {
                    assert_eq!(dst.pixel(x, y), dst.pixel(mirror_partner(x, rect), y));
                }
            }
            // Left half untouched, outside untouched
            assert_eq!(dst.pixel(5, 4), src.pixel(5, 4));
            assert_eq!(dst.pixel(0, 0), src.pixel(0, 0));
            assert_eq!(dst.pixel(29, 19), src.pixel(29, 19));
        }
    }

    #[test]
    fn test_mirror_clips() {
        let src = noise(8, 8);
        let mut dst = src.clone();
        let clipped = mirror_rect(&src, &mut dst, Rect::new(4, 0, 100, 8)).unwrap();
        assert_eq!(clipped, Some(Rect::new(4, 0, 4, 8)));
        assert_eq!(dst.pixel(7, 3), src.pixel(4, 3));
        assert_eq!(mirror_rect(&src, &mut dst, Rect::new(50, 50, 5, 5)).unwrap(), None);
    }
}
