//! PNG encoding and decoding in memory.
//!
//! Encoding always writes 8-bit RGBA with an sRGB chunk. Decoding accepts any
//! PNG the `png` crate reads; palette, 16-bit and low-bit-depth images are
//! normalised to 8 bits per channel and then expanded to RGBA.

use std::io::Cursor;

use remold_core::RasterBuffer;
use tracing::{debug, trace};

use crate::{IoError, IoResult};

/// Encodes a raster as an RGBA8 PNG.
///
/// # Example
///
/// ```rust
/// use remold_core::RasterBuffer;
/// use remold_io::png::{decode_png, encode_png};
///
/// let buf = RasterBuffer::filled(3, 2, [1, 2, 3, 4]).unwrap();
/// let bytes = encode_png(&buf).unwrap();
/// assert_eq!(decode_png(&bytes).unwrap(), buf);
/// ```
pub fn encode_png(buffer: &RasterBuffer) -> IoResult<Vec<u8>> {
    trace!(width = buffer.width(), height = buffer.height(), "encode_png");
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, buffer.width(), buffer.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::default());
        encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

        let mut writer = encoder
            .write_header()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .write_image_data(buffer.as_bytes())
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
    }
    Ok(out)
}

/// Decodes PNG bytes into an RGBA8 raster.
pub fn decode_png(bytes: &[u8]) -> IoResult<RasterBuffer> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => data.to_vec(),
        (png::ColorType::Rgb, png::BitDepth::Eight) => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            data.iter().flat_map(|&g| [g, g, g, 255]).collect()
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => data
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        (color_type, bit_depth) => {
            return Err(IoError::DecodeError(format!(
                "unsupported PNG layout {color_type:?} {bit_depth:?}"
            )));
        }
    };

    debug!(width = info.width, height = info.height, color = ?info.color_type, "decode_png");
    Ok(RasterBuffer::from_raw(info.width, info.height, rgba)?)
}
