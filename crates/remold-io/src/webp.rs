//! Lossless WebP encoding in memory, via the `image` crate's pure-Rust encoder.

use image::codecs::webp::WebPEncoder;
use image::ExtendedColorType;
use remold_core::RasterBuffer;
use tracing::trace;

use crate::{IoError, IoResult};

/// Encodes a raster as lossless RGBA WebP.
///
/// # Example
///
/// ```rust
/// use remold_core::RasterBuffer;
/// use remold_io::webp::encode_webp;
///
/// let buf = RasterBuffer::filled(4, 4, [0, 128, 255, 255]).unwrap();
/// let bytes = encode_webp(&buf).unwrap();
/// assert_eq!(&bytes[..4], b"RIFF");
/// assert_eq!(&bytes[8..12], b"WEBP");
/// ```
pub fn encode_webp(buffer: &RasterBuffer) -> IoResult<Vec<u8>> {
    trace!(width = buffer.width(), height = buffer.height(), "encode_webp");
    let mut out = Vec::new();
    WebPEncoder::new_lossless(&mut out)
        .encode(
            buffer.as_bytes(),
            buffer.width(),
            buffer.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(out)
}
