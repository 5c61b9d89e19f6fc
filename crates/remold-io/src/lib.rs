//! # remold-io
//!
//! Getting pixels out of (and, for front ends, into) the engine.
//!
//! - [`export`](export::export) - resize to a preset, stamp a watermark, encode
//! - [`self::png`], [`jpeg`], [`webp`] - in-memory encoders
//! - [`decode_png`] - PNG bytes to [`RasterBuffer`](remold_core::RasterBuffer)
//! - [`text`] - the built-in 5x7 bitmap font
//!
//! Nothing here touches the file system; callers get `Vec<u8>` back.
//!
//! # Dependencies
//!
//! - `png` for PNG
//! - `jpeg-encoder` for JPEG
//! - `image` (WebP codec only) for lossless WebP

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;

pub mod export;
pub mod jpeg;
pub mod png;
pub mod text;
pub mod webp;

pub use error::{IoError, IoResult};
pub use export::{export, ExportFormat, ExportOptions, ExportedImage, Resolution, Watermark, WatermarkPosition};
pub use self::png::decode_png;
