//! Pixel codec
//!
//! Converts between a canonical 8-bit-per-channel [`Color`] and the five
//! framebuffer formats the display controller understands. All multi-byte
//! formats are stored little-endian.
//!
//! | Format  | Bytes | Layout (msb..lsb)        |
//! |:--------|:------|:-------------------------|
//! | RGBA8   | 4     | R8 G8 B8 A8              |
//! | RGB8    | 3     | R8 G8 B8                 |
//! | RGB565  | 2     | R5 G6 B5                 |
//! | RGB5A1  | 2     | R5 G5 B5 A1              |
//! | RGBA4   | 2     | R4 G4 B4 A4              |

use crate::memory::byte_utils;
use log::trace;
use serde::{Deserialize, Serialize};

/// Framebuffer pixel format as encoded in the 3-bit format fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    Rgba8,
    Rgb8,
    Rgb565,
    Rgb5A1,
    Rgba4,
    /// Encodings 5..7 have no defined layout.
    Unknown(u8),
}

impl PixelFormat {
    pub fn from_raw(raw: u32) -> Self {
        match raw & 0x7 {
            0 => PixelFormat::Rgba8,
            1 => PixelFormat::Rgb8,
            2 => PixelFormat::Rgb565,
            3 => PixelFormat::Rgb5A1,
            4 => PixelFormat::Rgba4,
            other => PixelFormat::Unknown(other as u8),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            PixelFormat::Rgba8 => 0,
            PixelFormat::Rgb8 => 1,
            PixelFormat::Rgb565 => 2,
            PixelFormat::Rgb5A1 => 3,
            PixelFormat::Rgba4 => 4,
            PixelFormat::Unknown(raw) => (raw & 0x7) as u32,
        }
    }

    /// Bytes per pixel; 0 for unknown formats.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgb565 | PixelFormat::Rgb5A1 | PixelFormat::Rgba4 => 2,
            PixelFormat::Unknown(_) => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Per-channel integer mean, truncating.
    pub fn average(colors: &[Color]) -> Color {
        if colors.is_empty() {
            return Color::default();
        }
        let n = colors.len() as u32;
        let (mut r, mut g, mut b, mut a) = (0u32, 0u32, 0u32, 0u32);
        for c in colors {
            r += c.r as u32;
            g += c.g as u32;
            b += c.b as u32;
            a += c.a as u32;
        }
        Color::new((r / n) as u8, (g / n) as u8, (b / n) as u8, (a / n) as u8)
    }
}

#[inline(always)]
fn convert_5_to_8(v: u16) -> u8 {
    ((v << 3) | (v >> 2)) as u8
}

#[inline(always)]
fn convert_6_to_8(v: u16) -> u8 {
    ((v << 2) | (v >> 4)) as u8
}

#[inline(always)]
fn convert_4_to_8(v: u16) -> u8 {
    ((v << 4) | v) as u8
}

#[inline(always)]
fn read_u16(bytes: &[u8]) -> u16 {
    byte_utils::join_u16(bytes[0], bytes[1])
}

#[inline(always)]
fn write_u16(value: u16, bytes: &mut [u8]) {
    let (low, high) = byte_utils::split_u16(value);
    bytes[0] = low;
    bytes[1] = high;
}

/// Decode one pixel. `src` must hold at least `format.bytes_per_pixel()` bytes.
///
/// Unknown formats decode to a zero color so a bad pixel format never aborts
/// a whole transfer. Callers report the format once per operation.
pub fn decode(format: PixelFormat, src: &[u8]) -> Color {
    match format {
        PixelFormat::Rgba8 => Color::new(src[3], src[2], src[1], src[0]),
        PixelFormat::Rgb8 => Color::new(src[2], src[1], src[0], 255),
        PixelFormat::Rgb565 => {
            let p = read_u16(src);
            Color::new(
                convert_5_to_8((p >> 11) & 0x1F),
                convert_6_to_8((p >> 5) & 0x3F),
                convert_5_to_8(p & 0x1F),
                255,
            )
        }
        PixelFormat::Rgb5A1 => {
            let p = read_u16(src);
            Color::new(
                convert_5_to_8((p >> 11) & 0x1F),
                convert_5_to_8((p >> 6) & 0x1F),
                convert_5_to_8((p >> 1) & 0x1F),
                if p & 1 != 0 { 255 } else { 0 },
            )
        }
        PixelFormat::Rgba4 => {
            let p = read_u16(src);
            Color::new(
                convert_4_to_8((p >> 12) & 0xF),
                convert_4_to_8((p >> 8) & 0xF),
                convert_4_to_8((p >> 4) & 0xF),
                convert_4_to_8(p & 0xF),
            )
        }
        PixelFormat::Unknown(raw) => {
            trace!("Unknown source framebuffer format {:x}", raw);
            Color::default()
        }
    }
}

/// Encode one pixel into `dst`. Unknown formats leave `dst` untouched.
pub fn encode(format: PixelFormat, color: Color, dst: &mut [u8]) {
    let (r, g, b, a) = (color.r as u16, color.g as u16, color.b as u16, color.a as u16);
    match format {
        PixelFormat::Rgba8 => {
            dst[3] = color.r;
            dst[2] = color.g;
            dst[1] = color.b;
            dst[0] = color.a;
        }
        PixelFormat::Rgb8 => {
            dst[2] = color.r;
            dst[1] = color.g;
            dst[0] = color.b;
        }
        PixelFormat::Rgb565 => write_u16(((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3), dst),
        PixelFormat::Rgb5A1 => {
            write_u16(((r >> 3) << 11) | ((g >> 3) << 6) | ((b >> 3) << 1) | (a >> 7), dst)
        }
        PixelFormat::Rgba4 => {
            write_u16(((r >> 4) << 12) | ((g >> 4) << 8) | ((b >> 4) << 4) | (a >> 4), dst)
        }
        PixelFormat::Unknown(raw) => {
            trace!("Unknown destination framebuffer format {:x}", raw);
        }
    }
}
