//! Built-in 5x7 bitmap font for watermarks.
//!
//! Glyph rows use the low 5 bits, bit 4 being the leftmost column. Lowercase
//! letters render as uppercase; characters without a glyph render as `?`.
//! Each glyph cell is 6 columns wide (5 + 1 spacing) and every font pixel
//! becomes a `scale × scale` block. A one-block dark shadow is drawn under
//! the text, offset down and right.

use remold_core::{RasterBuffer, Rgba8};
use remold_ops::composite::blend_pixel;

/// Glyph width in font pixels.
pub const GLYPH_WIDTH: u32 = 5;
/// Glyph height in font pixels.
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance per character in font pixels.
pub const ADVANCE: u32 = GLYPH_WIDTH + 1;

const SHADOW: Rgba8 = [0, 0, 0, 255];

fn glyph(ch: char) -> [u8; 7] {
    macro_rules! g {
        ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr, $f:expr, $g:expr) => {
            [$a, $b, $c, $d, $e, $f, $g]
        };
    }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110),
        '1' => g!(0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        '2' => g!(0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111),
        '3' => g!(0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110),
        '4' => g!(0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010),
        '5' => g!(0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110),
        '6' => g!(0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110),
        '7' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000),
        '8' => g!(0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110),
        '9' => g!(0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100),

        'A' => g!(0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'B' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110),
        'C' => g!(0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110),
        'D' => g!(0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100),
        'E' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111),
        'F' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000),
        'G' => g!(0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111),
        'H' => g!(0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'I' => g!(0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        'J' => g!(0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100),
        'K' => g!(0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001),
        'L' => g!(0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111),
        'M' => g!(0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001),
        'N' => g!(0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001),
        'O' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'P' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000),
        'Q' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101),
        'R' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001),
        'S' => g!(0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110),
        'T' => g!(0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100),
        'U' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'V' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100),
        'W' => g!(0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010),
        'X' => g!(0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001),
        'Y' => g!(0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100),
        'Z' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111),

        ' ' => g!(0, 0, 0, 0, 0, 0, 0),
        '.' => g!(0, 0, 0, 0, 0, 0b01100, 0b01100),
        ',' => g!(0, 0, 0, 0, 0b01100, 0b00100, 0b01000),
        ':' => g!(0, 0b01100, 0b01100, 0, 0b01100, 0b01100, 0),
        '-' => g!(0, 0, 0, 0b11111, 0, 0, 0),
        '_' => g!(0, 0, 0, 0, 0, 0, 0b11111),
        '!' => g!(0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0, 0b00100),
        '\'' => g!(0b00100, 0b00100, 0b01000, 0, 0, 0, 0),
        '/' => g!(0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000),
        '|' => g!(0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100),
        '(' => g!(0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010),
        ')' => g!(0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000),
        '@' => g!(0b01110, 0b10001, 0b10111, 0b10101, 0b10111, 0b10000, 0b01110),
        '&' => g!(0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101),
        '+' => g!(0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0),
        '#' => g!(0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010),
        _ => g!(0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0, 0b00100),
    }
}

/// Size in pixels of `text` at `scale`, shadow included.
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let n = text.chars().count() as u32;
    if n == 0 {
        return (0, 0);
    }
    let scale = scale.max(1);
    let width = (n * ADVANCE - 1) * scale + scale;
    let height = GLYPH_HEIGHT * scale + scale;
    (width, height)
}

/// Draws `text` with its top-left corner at `(x, y)`, composited over `dst`
/// at `opacity`. Pixels falling outside the raster are clipped.
///
/// # Example
///
/// ```rust
/// use remold_core::RasterBuffer;
/// use remold_io::text::draw_text;
///
/// let mut buf = RasterBuffer::filled(40, 12, [0, 0, 0, 255]).unwrap();
/// draw_text(&mut buf, 1, 1, "HI", 1, [255, 255, 255, 255], 1.0);
/// assert_eq!(buf.pixel(1, 1), [255, 255, 255, 255]); // top-left of 'H'
/// ```
pub fn draw_text(dst: &mut RasterBuffer, x: i64, y: i64, text: &str, scale: u32, color: Rgba8, opacity: f64) {
    let scale = scale.max(1) as i64;
    for (i, ch) in text.chars().enumerate() {
        let gx = x + i as i64 * ADVANCE as i64 * scale;
        let rows = glyph(ch);
        // Shadow first, then the glyph on top
        draw_glyph(dst, gx + scale, y + scale, &rows, scale, SHADOW, opacity);
        draw_glyph(dst, gx, y, &rows, scale, color, opacity);
    }
}

fn draw_glyph(dst: &mut RasterBuffer, x: i64, y: i64, rows: &[u8; 7], scale: i64, color: Rgba8, opacity: f64) {
    for (ry, bits) in rows.iter().enumerate() {
        for rx in 0..GLYPH_WIDTH as i64 {
            if bits & (1 << (4 - rx)) == 0 {
                continue;
            }
            let px = x + rx * scale;
            let py = y + ry as i64 * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    blend_pixel(dst, px + dx, py + dy, color, opacity);
                }
            }
        }
    }
}
