//! # remold-math
//!
//! Math primitives for raster deformation:
//!
//! - Interpolation utilities ([`lerp`], [`smoothstep01`], [`to_u8`])
//! - [`Falloff`] - the single falloff law shared by all point kernels
//! - [`catmull_rom`] - dense paths from sparse pointer strokes
//! - [`Homography`] - unit-square to quadrilateral projective solve
//!
//! # Dependencies
//!
//! - [`glam`] - `DMat3`/`DVec3` for the projective transforms
//! - `remold-core` - [`Point2D`](remold_core::Point2D)
//!
//! # Used By
//!
//! - `remold-ops` - every kernel
//! - `remold-edit` - stroke densification for curve tools

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod falloff;
mod homography;
mod interp;
mod spline;

pub use falloff::Falloff;
pub use homography::Homography;
pub use interp::*;
pub use spline::{catmull_rom, catmull_rom_point, catmull_rom_scalar};
