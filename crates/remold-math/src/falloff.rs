//! The falloff law shared by every point-based kernel.
//!
//! For a pixel at distance `d` from an effect centre with radius `r`:
//!
//! ```text
//! t = smoothstep(1 - d/r)
//! if feather > 0 and d > r·(1 - feather/100):
//!     t *= smoothstep((r - d) / (r·feather/100))
//! strength = t · intensity
//! ```
//!
//! Pinch, warp, sculpt, drag, curve, brush and smooth dabs all go through
//! [`Falloff::strength_at`]; none of them carries its own copy.
//!
//! # Usage
//!
//! ```rust
//! use remold_math::Falloff;
//!
//! let f = Falloff::new(30.0, 0.5, 0.0);
//! assert_eq!(f.strength_at(0.0), 0.5);
//! assert_eq!(f.strength_at(30.0), 0.0);
//! assert!(f.strength_at(10.0) > f.strength_at(20.0));
//! ```

use crate::smoothstep01;

/// Radius, intensity and feather of one effect application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Falloff {
    /// Effect radius in pixels.
    pub radius: f64,
    /// Strength multiplier in [0, 1].
    pub intensity: f64,
    /// Feathered share of the radius, in percent [0, 100].
    pub feather: f64,
}

impl Falloff {
    /// Creates a falloff. Intensity is clamped to [0, 1], feather to [0, 100].
    pub fn new(radius: f64, intensity: f64, feather: f64) -> Self {
        Self {
            radius,
            intensity: if intensity.is_finite() { intensity.clamp(0.0, 1.0) } else { 0.0 },
            feather: if feather.is_finite() { feather.clamp(0.0, 100.0) } else { 0.0 },
        }
    }

    /// Shape of the falloff without intensity, in [0, 1].
    ///
    /// Zero outside the radius and for degenerate input (non-finite distance,
    /// non-positive or non-finite radius).
    pub fn weight_at(&self, d: f64) -> f64 {
        let r = self.radius;
        if !d.is_finite() || !r.is_finite() || r <= 0.0 || d >= r {
            return 0.0;
        }

        let mut t = smoothstep01(1.0 - d.max(0.0) / r);

        if self.feather > 0.0 {
            let band = r * self.feather / 100.0;
            if d > r - band {
                t *= smoothstep01((r - d) / band);
            }
        }

        t
    }

    /// Effective strength `weight · intensity` at distance `d`.
    #[inline]
    pub fn strength_at(&self, d: f64) -> f64 {
        self.weight_at(d) * self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_and_edge() {
        let f = Falloff::new(10.0, 1.0, 0.0);
        assert_relative_eq!(f.strength_at(0.0), 1.0);
        assert_eq!(f.strength_at(10.0), 0.0);
        assert_eq!(f.strength_at(25.0), 0.0);
    }

    #[test]
    fn test_monotonic_non_increasing() {
        for feather in [0.0, 25.0, 60.0, 100.0] {
            let f = Falloff::new(30.0, 0.8, feather);
            let mut prev = f.strength_at(0.0);
            for i in 1..=300 {
                let d = i as f64 * 0.1;
                let s = f.strength_at(d);
                assert!(s <= prev + 1e-12, "feather {feather}: rose at d={d}");
                prev = s;
            }
            assert_eq!(f.strength_at(30.0), 0.0);
        }
    }

    #[test]
    fn test_feather_softens_edge_only() {
        let hard = Falloff::new(20.0, 1.0, 0.0);
        let soft = Falloff::new(20.0, 1.0, 50.0);
        // Inside the unfeathered core the curves agree
        assert_relative_eq!(hard.strength_at(5.0), soft.strength_at(5.0));
        // In the feather band the soft one is weaker
        assert!(soft.strength_at(15.0) < hard.strength_at(15.0));
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(Falloff::new(0.0, 1.0, 0.0).strength_at(0.0), 0.0);
        assert_eq!(Falloff::new(-5.0, 1.0, 0.0).strength_at(0.0), 0.0);
        assert_eq!(Falloff::new(10.0, 1.0, 0.0).strength_at(f64::NAN), 0.0);
        assert_eq!(Falloff::new(10.0, f64::NAN, 0.0).strength_at(1.0), 0.0);
    }

    #[test]
    fn test_zero_intensity() {
        let f = Falloff::new(10.0, 0.0, 30.0);
        for i in 0..20 {
            assert_eq!(f.strength_at(i as f64), 0.0);
        }
    }
}
