//! # remold-ops
//!
//! Pixel kernels for the remold deformation engine.
//!
//! Every kernel reads one [`RasterBuffer`](remold_core::RasterBuffer) and
//! writes a different one; nothing here mutates its own input. The edit layer
//! owns the buffers and decides which kernel runs where.
//!
//! # Modules
//!
//! - [`resample`] - bilinear sampling, transparent outside the raster
//! - [`brush`] - falloff dabs: pinch, sculpt, push, tone, smooth
//! - [`warp`] - the inverse-mapping driver and whole-image radial effects
//! - [`filter`] - separable Gaussian blur
//! - [`transform`] - mirror blit
//! - [`mesh`] - control-grid warp
//! - [`perspective`] - four-corner projective warp
//! - [`resize`] - bilinear rescaling with edge replication
//! - [`composite`] - "over" blending
//!
//! # Example
//!
//! ```rust
//! use remold_core::{Point2D, RasterBuffer};
//! use remold_ops::brush::{sculpt, Dab};
//! use remold_ops::filter::gaussian_blur_rect;
//!
//! let src = RasterBuffer::filled(64, 64, [200, 180, 160, 255]).unwrap();
//! let mut dst = src.clone();
//! let dab = Dab::new(Point2D::new(32.0, 32.0), 12.0, 0.8, 20.0);
//! if let Some(rect) = sculpt(&src, &mut dst, &dab, false).unwrap() {
//!     let mut soft = dst.clone();
//!     gaussian_blur_rect(&dst, &mut soft, 1.0, rect).unwrap();
//! }
//! ```
//!
//! # Parallelism
//!
//! With the default `parallel` feature, kernels split rows across rayon's
//! global pool. Disable it for single-threaded builds.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod parallel;

pub mod brush;
pub mod composite;
pub mod filter;
pub mod mesh;
pub mod perspective;
pub mod resample;
pub mod resize;
pub mod transform;
pub mod warp;

pub use error::{OpsError, OpsResult};
