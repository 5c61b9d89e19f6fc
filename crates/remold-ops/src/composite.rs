//! Porter-Duff "over" for straight-alpha RGBA8.
//!
//! ```text
//! αo = αf + αb·(1 - αf)
//! Co = (Cf·αf + Cb·αb·(1 - αf)) / αo
//! ```
//!
//! The foreground alpha is scaled by an extra opacity first, which is how
//! the export watermark is faded.

use remold_core::{RasterBuffer, Rgba8};
use remold_math::{saturate, to_u8};

/// Composites `fg` over `bg` with `fg` alpha multiplied by `opacity` (0..1).
///
/// # Example
///
/// ```rust
/// use remold_ops::composite::over;
///
/// assert_eq!(over([255, 255, 255, 255], [0, 0, 0, 255], 0.5), [128, 128, 128, 255]);
/// assert_eq!(over([255, 0, 0, 255], [0, 0, 255, 255], 0.0), [0, 0, 255, 255]);
/// ```
#[inline]
pub fn over(fg: Rgba8, bg: Rgba8, opacity: f64) -> Rgba8 {
    let fa = fg[3] as f64 / 255.0 * saturate(opacity);
    let ba = bg[3] as f64 / 255.0;
    let out_a = fa + ba * (1.0 - fa);
    if out_a < 1e-8 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = (fg[c] as f64 * fa + bg[c] as f64 * ba * (1.0 - fa)) / out_a;
        out[c] = to_u8(v);
    }
    out[3] = to_u8(out_a * 255.0);
    out
}

/// Composites `color` over pixel `(x, y)` of `dst`; coordinates outside the
/// raster are ignored.
#[inline]
pub fn blend_pixel(dst: &mut RasterBuffer, x: i64, y: i64, color: Rgba8, opacity: f64) {
    if let Some(bg) = dst.get_pixel(x, y) {
        dst.set_pixel(x as u32, y as u32, over(color, bg, opacity));
    }
}
