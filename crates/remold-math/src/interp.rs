//! Scalar interpolation helpers.
//!
//! # Usage
//!
//! ```rust
//! use remold_math::{lerp, smoothstep01};
//!
//! assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
//! assert_eq!(smoothstep01(0.5), 0.5);
//! ```

/// Linear interpolation between two values.
///
/// Returns `a` when `t = 0.0`, and `b` when `t = 1.0`.
/// For values outside [0, 1], the result is extrapolated.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Clamps to [0, 1]. NaN maps to 0.
#[inline]
pub fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Hermite smoothstep of an already normalized parameter: `t²(3 - 2t)`.
///
/// Input is saturated first, so the result is always in [0, 1].
#[inline]
pub fn smoothstep01(t: f64) -> f64 {
    let t = saturate(t);
    t * t * (3.0 - 2.0 * t)
}

/// Rounds and clamps a channel value into `u8`.
#[inline]
pub fn to_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
