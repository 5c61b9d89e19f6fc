//! Baseline JPEG encoding in memory.
//!
//! JPEG carries no alpha, so the channel is dropped (not composited).
//! Quality is clamped to 1..=100.

use remold_core::RasterBuffer;
use tracing::{trace, warn};

use crate::{IoError, IoResult};

/// Largest side JPEG can describe.
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Encodes a raster as RGB JPEG.
///
/// # Example
///
/// ```rust
/// use remold_core::RasterBuffer;
/// use remold_io::jpeg::encode_jpeg;
///
/// let buf = RasterBuffer::filled(16, 16, [200, 10, 10, 255]).unwrap();
/// let bytes = encode_jpeg(&buf, 85).unwrap();
/// assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(buffer: &RasterBuffer, quality: u8) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    if buffer.width() > MAX_DIMENSION || buffer.height() > MAX_DIMENSION {
        return Err(IoError::EncodeError(format!(
            "{}x{} exceeds the JPEG limit of {MAX_DIMENSION}",
            buffer.width(),
            buffer.height()
        )));
    }
    let clamped = quality.clamp(1, 100);
    if clamped != quality {
        warn!(requested = quality, used = clamped, "JPEG quality clamped");
    }
    trace!(width = buffer.width(), height = buffer.height(), quality = clamped, "encode_jpeg");

    let rgb: Vec<u8> = buffer
        .as_bytes()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut out = Vec::new();
    let encoder = Encoder::new(&mut out, clamped);
    encoder
        .encode(&rgb, buffer.width() as u16, buffer.height() as u16, ColorType::Rgb)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;
    Ok(out)
}
