//! Bilinear sampling of RGBA8 rasters at continuous coordinates.
//!
//! Every geometry kernel is an inverse mapping: for each target pixel it
//! computes where to read in the source, then calls [`sample`]. Reads that
//! fall outside `[0, w-1] × [0, h-1]` (or are non-finite) yield transparent
//! black instead of clamping, so pulled-in borders become see-through rather
//! than smeared.
//!
//! # Example
//!
//! ```rust
//! use remold_core::RasterBuffer;
//! use remold_ops::resample::sample;
//!
//! let mut buf = RasterBuffer::new(2, 1).unwrap();
//! buf.set_pixel(0, 0, [0, 0, 0, 255]);
//! buf.set_pixel(1, 0, [200, 100, 50, 255]);
//!
//! assert_eq!(sample(&buf, 0.5, 0.0), [100, 50, 25, 255]);
//! assert_eq!(sample(&buf, -0.1, 0.0), [0, 0, 0, 0]);
//! ```

use remold_core::{RasterBuffer, Rgba8, TRANSPARENT};
use remold_math::to_u8;

/// Samples `buffer` at `(x, y)`; transparent outside the raster.
#[inline]
pub fn sample(buffer: &RasterBuffer, x: f64, y: f64) -> Rgba8 {
    if !x.is_finite() || !y.is_finite() {
        return TRANSPARENT;
    }
    let max_x = (buffer.width() - 1) as f64;
    let max_y = (buffer.height() - 1) as f64;
    if x < 0.0 || y < 0.0 || x > max_x || y > max_y {
        return TRANSPARENT;
    }
    bilinear(buffer, x, y)
}

/// Samples `buffer` at `(x, y)`, replicating edge pixels outside the raster.
///
/// Non-finite coordinates still yield transparent black.
#[inline]
pub fn sample_clamped(buffer: &RasterBuffer, x: f64, y: f64) -> Rgba8 {
    if !x.is_finite() || !y.is_finite() {
        return TRANSPARENT;
    }
    let x = x.clamp(0.0, (buffer.width() - 1) as f64);
    let y = y.clamp(0.0, (buffer.height() - 1) as f64);
    bilinear(buffer, x, y)
}

/// Four-tap blend. Caller guarantees `(x, y)` lies inside the raster.
#[inline]
fn bilinear(buffer: &RasterBuffer, x: f64, y: f64) -> Rgba8 {
    let xf = x.floor();
    let yf = y.floor();
    let fx = x - xf;
    let fy = y - yf;

    let x0 = xf as u32;
    let y0 = yf as u32;
    let x1 = (x0 + 1).min(buffer.width() - 1);
    let y1 = (y0 + 1).min(buffer.height() - 1);

    let p00 = buffer.pixel(x0, y0);
    let p10 = buffer.pixel(x1, y0);
    let p01 = buffer.pixel(x0, y1);
    let p11 = buffer.pixel(x1, y1);

    let mut out = TRANSPARENT;
    for c in 0..4 {
        let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
        let bot = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
        out[c] = to_u8(top * (1.0 - fy) + bot * fy);
    }
    out
}
