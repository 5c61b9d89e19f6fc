//! Export pipeline: rescale, watermark, encode.
//!
//! ```text
//! canonical buffer ──► resize (bilinear) ──► watermark (5x7 font, over) ──► encode
//!     (read only)        fresh surface          optional                  PNG / JPEG / WebP
//! ```
//!
//! The source buffer is never mutated. Target widths: `Original` keeps the
//! size, `Hd` scales to 1920 px wide, `UltraHd` to 3840 px wide, preserving
//! aspect ratio.

use std::fmt;
use std::str::FromStr;

use remold_core::RasterBuffer;
use remold_ops::resize::{resize, scaled_dimensions};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::jpeg::encode_jpeg;
use crate::png::encode_png;
use crate::text::{draw_text, text_size};
use crate::webp::encode_webp;
use crate::{IoError, IoResult};

/// Output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless PNG; quality is ignored.
    #[default]
    Png,
    /// Baseline JPEG; alpha is dropped.
    Jpeg,
    /// Lossless WebP; quality is ignored.
    Webp,
}

impl ExportFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            other => Err(IoError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Output size preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    /// Same size as the source.
    #[default]
    #[serde(rename = "original")]
    Original,
    /// 1920 px wide.
    #[serde(rename = "hd")]
    Hd,
    /// 3840 px wide.
    #[serde(rename = "4k")]
    UltraHd,
}

impl Resolution {
    /// Scale factor for a source `width`.
    pub fn scale_for(&self, width: u32) -> f64 {
        match self {
            Self::Original => 1.0,
            Self::Hd => 1920.0 / width as f64,
            Self::UltraHd => 3840.0 / width as f64,
        }
    }
}

impl FromStr for Resolution {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "hd" | "1080p" => Ok(Self::Hd),
            "4k" | "uhd" => Ok(Self::UltraHd),
            other => Err(IoError::UnsupportedFormat(format!("resolution {other}"))),
        }
    }
}

/// Watermark anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    /// Top-left corner.
    #[default]
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Centred.
    Center,
}

impl FromStr for WatermarkPosition {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            "center" | "centre" => Ok(Self::Center),
            other => Err(IoError::UnsupportedFormat(format!("watermark position {other}"))),
        }
    }
}

fn default_opacity() -> f64 {
    0.5
}

/// Text stamped onto the exported image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watermark {
    /// Text to draw.
    pub text: String,
    /// Anchor.
    #[serde(default)]
    pub position: WatermarkPosition,
    /// Opacity in [0, 1].
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl Watermark {
    /// Watermark at the default anchor and opacity.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: WatermarkPosition::default(),
            opacity: default_opacity(),
        }
    }
}

fn default_quality() -> u8 {
    90
}

/// Everything [`export`] needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Container.
    #[serde(default)]
    pub format: ExportFormat,
    /// JPEG quality 0..=100 (clamped to at least 1).
    #[serde(default = "default_quality")]
    pub quality: u8,
    /// Size preset.
    #[serde(default)]
    pub resolution: Resolution,
    /// Optional text overlay.
    #[serde(default)]
    pub watermark: Option<Watermark>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            quality: default_quality(),
            resolution: Resolution::default(),
            watermark: None,
        }
    }
}

/// Encoded output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// Container of `bytes`.
    pub format: ExportFormat,
}

/// Renders `buffer` per `options` and encodes it.
///
/// # Example
///
/// ```rust
/// use remold_core::RasterBuffer;
/// use remold_io::export::{export, ExportFormat, ExportOptions, Resolution, Watermark};
///
/// let buf = RasterBuffer::filled(100, 50, [30, 60, 90, 255]).unwrap();
/// let out = export(&buf, &ExportOptions {
///     format: ExportFormat::Png,
///     resolution: Resolution::Hd,
///     watermark: Some(Watermark::new("remold")),
///     ..Default::default()
/// }).unwrap();
/// assert_eq!((out.width, out.height), (1920, 960));
/// ```
pub fn export(buffer: &RasterBuffer, options: &ExportOptions) -> IoResult<ExportedImage> {
    let surface = render(buffer, options)?;
    let bytes = match options.format {
        ExportFormat::Png => encode_png(&surface)?,
        ExportFormat::Jpeg => encode_jpeg(&surface, options.quality)?,
        ExportFormat::Webp => encode_webp(&surface)?,
    };
    debug!(
        format = %options.format,
        width = surface.width(),
        height = surface.height(),
        bytes = bytes.len(),
        "export"
    );
    Ok(ExportedImage {
        bytes,
        width: surface.width(),
        height: surface.height(),
        format: options.format,
    })
}

/// The pre-encode surface: resized copy with the watermark applied.
pub fn render(buffer: &RasterBuffer, options: &ExportOptions) -> IoResult<RasterBuffer> {
    let scale = options.resolution.scale_for(buffer.width());
    let (w, h) = scaled_dimensions(buffer.width(), buffer.height(), scale)?;
    let mut surface = resize(buffer, w, h)?;

    if let Some(mark) = options.watermark.as_ref().filter(|m| !m.text.is_empty()) {
        stamp(&mut surface, mark);
    }
    Ok(surface)
}

/// Font scale for a surface `width`.
#[inline]
pub fn watermark_scale(width: u32) -> u32 {
    (width / 320).max(1)
}

fn stamp(surface: &mut RasterBuffer, mark: &Watermark) {
    let scale = watermark_scale(surface.width());
    let (tw, th) = text_size(&mark.text, scale);
    let margin = 4 * scale as i64;
    let (w, h) = (surface.width() as i64, surface.height() as i64);
    let (tw, th) = (tw as i64, th as i64);

    let (x, y) = match mark.position {
        WatermarkPosition::TopLeft => (margin, margin),
        WatermarkPosition::TopRight => (w - tw - margin, margin),
        WatermarkPosition::BottomLeft => (margin, h - th - margin),
        WatermarkPosition::BottomRight => (w - tw - margin, h - th - margin),
        WatermarkPosition::Center => ((w - tw) / 2, (h - th) / 2),
    };
    trace!(x, y, scale, text = %mark.text, "watermark");
    draw_text(surface, x, y, &mark.text, scale, [255, 255, 255, 255], mark.opacity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::decode_png;

    fn flat() -> RasterBuffer {
        RasterBuffer::filled(200, 100, [40, 80, 120, 255]).unwrap()
    }

    #[test]
    fn test_resolution_scales() {
        assert_eq!(Resolution::Original.scale_for(640), 1.0);
        assert_eq!(Resolution::Hd.scale_for(960), 2.0);
        assert_eq!(Resolution::UltraHd.scale_for(1920), 2.0);
    }

    #[test]
    fn test_original_png_is_lossless() {
        let buf = flat();
        let out = export(&buf, &ExportOptions::default()).unwrap();
        assert_eq!((out.width, out.height), (200, 100));
        assert_eq!(decode_png(&out.bytes).unwrap(), buf);
    }

    #[test]
    fn test_export_does_not_mutate_source() {
        let buf = flat();
        let before = buf.clone();
        let opts = ExportOptions {
            resolution: Resolution::Hd,
            watermark: Some(Watermark::new("x")),
            ..Default::default()
        };
        export(&buf, &opts).unwrap();
        assert_eq!(buf, before);
    }

    #[test]
    fn test_watermark_positions() {
        let buf = flat();
        for position in [
            WatermarkPosition::TopLeft,
            WatermarkPosition::TopRight,
            WatermarkPosition::BottomLeft,
            WatermarkPosition::BottomRight,
            WatermarkPosition::Center,
        ] {
            let opts = ExportOptions {
                watermark: Some(Watermark {
                    text: "MARK".into(),
                    position,
                    opacity: 1.0,
                }),
                ..Default::default()
            };
            let surface = render(&buf, &opts).unwrap();
            let (tw, th) = text_size("MARK", 1);
            let (x0, y0) = match position {
                WatermarkPosition::TopLeft => (4, 4),
                WatermarkPosition::TopRight => (200 - tw - 4, 4),
                WatermarkPosition::BottomLeft => (4, 100 - th - 4),
                WatermarkPosition::BottomRight => (200 - tw - 4, 100 - th - 4),
                WatermarkPosition::Center => ((200 - tw) / 2, (100 - th) / 2),
            };
            // 'M' has its top-left pixel set
            assert_eq!(surface.pixel(x0, y0), [255, 255, 255, 255], "{position:?}");
            // Opposite corner of the raster is untouched
            let far = if x0 < 100 { 199 } else { 0 };
            assert_eq!(surface.pixel(far, if y0 < 50 { 99 } else { 0 }), [40, 80, 120, 255]);
        }
    }

    #[test]
    fn test_jpeg_and_webp_containers() {
        let buf = flat();
        let jpg = export(&buf, &ExportOptions { format: ExportFormat::Jpeg, quality: 0, ..Default::default() }).unwrap();
        assert_eq!(&jpg.bytes[..2], &[0xFF, 0xD8]);
        let webp = export(&buf, &ExportOptions { format: ExportFormat::Webp, ..Default::default() }).unwrap();
        assert_eq!(&webp.bytes[8..12], b"WEBP");
        assert_eq!(webp.format.mime_type(), "image/webp");
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("JPG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert_eq!("4k".parse::<Resolution>().unwrap(), Resolution::UltraHd);
        assert_eq!("bottom_right".parse::<WatermarkPosition>().unwrap(), WatermarkPosition::BottomRight);
        assert!(matches!("tiff".parse::<ExportFormat>(), Err(IoError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_options_from_json() {
        let opts: ExportOptions = serde_json::from_str(
            r#"{"format":"webp","resolution":"4k","watermark":{"text":"hi","position":"center"}}"#,
        )
        .unwrap();
        assert_eq!(opts.format, ExportFormat::Webp);
        assert_eq!(opts.resolution, Resolution::UltraHd);
        assert_eq!(opts.quality, 90);
        let mark = opts.watermark.unwrap();
        assert_eq!(mark.position, WatermarkPosition::Center);
        assert_eq!(mark.opacity, 0.5);
    }
}
