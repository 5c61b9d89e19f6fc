//! # remold-core
//!
//! Core types for the remold raster deformation engine.
//!
//! - [`RasterBuffer`] - owned RGBA8 pixel storage with a checked size invariant
//! - [`Point2D`] - continuous pixel-space coordinates and vectors
//! - [`Rect`] - pixel rectangles for affected-area bookkeeping
//! - [`Error`] / [`Result`] - construction and copy failures
//!
//! ## Crate Structure
//!
//! ```text
//! remold-core (this crate)
//!    ^
//!    |
//!    +-- remold-math (falloff, splines, homographies)
//!    +-- remold-ops (resampler, kernels, blur, mesh, perspective)
//!    +-- remold-io (export encoders, watermark)
//!    +-- remold-edit (catalog, dispatcher, history, sessions)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod geom;
pub mod rect;

pub use buffer::{byte_len, RasterBuffer, Rgba8, CHANNELS, TRANSPARENT};
pub use error::{Error, Result};
pub use geom::Point2D;
pub use rect::Rect;

/// Prelude module for convenient imports.
///
/// ```
/// use remold_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{RasterBuffer, Rgba8, TRANSPARENT};
    pub use crate::error::{Error, Result};
    pub use crate::geom::Point2D;
    pub use crate::rect::Rect;
}
