//! Owned RGBA8 raster storage.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, with interleaved
//! 8-bit channels and no row padding:
//!
//! ```text
//! Memory: [R G B A R G B A R G B A ...]  ← Row 0
//!         [R G B A R G B A R G B A ...]  ← Row 1
//!         ...
//! ```
//!
//! The invariant `data.len() == width * height * 4` holds for every
//! [`RasterBuffer`] value; all constructors check it.
//!
//! # Usage
//!
//! ```rust
//! use remold_core::RasterBuffer;
//!
//! let mut buf = RasterBuffer::filled(4, 3, [255, 0, 0, 255]).unwrap();
//! buf.set_pixel(1, 1, [0, 0, 255, 255]);
//! assert_eq!(buf.pixel(1, 1), [0, 0, 255, 255]);
//! assert_eq!(buf.as_bytes().len(), 4 * 3 * 4);
//! ```

use crate::{Error, Rect, Result};

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// One RGBA pixel with 8 bits per channel.
pub type Rgba8 = [u8; 4];

/// Fully transparent black, returned for samples outside the raster.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// Owned, contiguous RGBA8 pixel storage.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Byte length of a `width × height` RGBA8 raster, with overflow and
/// zero-size checks.
pub fn byte_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "zero-sized raster"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "byte size overflows usize"))
}

impl RasterBuffer {
    /// Creates a transparent raster.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Creates a raster where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Result<Self> {
        let mut buf = Self::new(width, height)?;
        buf.fill(color);
        Ok(buf)
    }

    /// Wraps raw RGBA8 bytes.
    ///
    /// Fails with [`Error::BufferSize`] unless `data.len() == width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// The whole raster as a rectangle.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns `true` if both buffers have the same width and height.
    #[inline]
    pub fn same_dimensions(&self, other: &RasterBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Raw pixel bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel bytes. The length cannot change.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Reads pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the raster.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Reads pixel `(x, y)`, or `None` outside the raster.
    #[inline]
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<Rgba8> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.pixel(x as u32, y as u32))
    }

    /// Writes pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the raster.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = self.index(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&px);
    }

    /// One row of pixels.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride();
        &self.data[start..start + self.stride()]
    }

    /// Mutable bytes of rows `y0..y1`, for row-parallel kernels.
    #[inline]
    pub fn rows_mut(&mut self, y0: u32, y1: u32) -> &mut [u8] {
        let stride = self.stride();
        &mut self.data[y0 as usize * stride..y1 as usize * stride]
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: Rgba8) {
        for px in self.data.chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&color);
        }
    }

    /// Copies the pixels of `rect` from an equally sized buffer.
    pub fn copy_rect_from(&mut self, src: &RasterBuffer, rect: Rect) -> Result<()> {
        if !self.same_dimensions(src) {
            return Err(Error::dimension_mismatch(
                (self.width, self.height),
                (src.width, src.height),
            ));
        }
        let Some(rect) = rect.clamp_to(self.width, self.height) else {
            return Ok(());
        };

        let x0 = rect.x as usize * CHANNELS;
        let x1 = rect.right() as usize * CHANNELS;
        for y in rect.y..rect.bottom() {
            let start = y as usize * self.stride();
            self.data[start + x0..start + x1].copy_from_slice(&src.data[start + x0..start + x1]);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}
