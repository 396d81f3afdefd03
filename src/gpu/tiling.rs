//! Tiled ("Morton") framebuffer addressing.
//!
//! Tiled images are split into 8x8 tiles. Each tile is four 4x4 subtiles,
//! each of which is four 2x2 subtiles of four texels, nested in Z-order:
//!
//! ```text
//! 42 43 46 47 58 59 62 63
//! 40 41 44 45 56 57 60 61
//! 34 35 38 39 50 51 54 55
//! 32 33 36 37 48 49 52 53
//! 10 11 14 15 26 27 30 31
//! 08 09 12 13 24 25 28 29
//! 02 03 06 07 18 19 22 23
//! 00 01 04 05 16 17 20 21
//! ```
//!
//! Tiles within an 8-row band are stored left to right; bands follow each
//! other at `coarse_y * stride`.

const XLUT: [u32; 8] = [0x00, 0x01, 0x04, 0x05, 0x10, 0x11, 0x14, 0x15];
const YLUT: [u32; 8] = [0x00, 0x02, 0x08, 0x0a, 0x20, 0x22, 0x28, 0x2a];

const BLOCK_HEIGHT: u32 = 8;

#[inline(always)]
pub fn morton_interleave(x: u32, y: u32) -> u32 {
    XLUT[(x % 8) as usize] + YLUT[(y % 8) as usize]
}

// Offsets are computed in 64 bits: register-supplied dimensions can push
// them past u32 before the bounds check rejects them.

/// Byte offset of (x, y) within its 8-row band.
#[inline(always)]
pub fn morton_offset(x: u32, y: u32, bytes_per_pixel: u32) -> u64 {
    let coarse_x = (x & !7) as u64;
    let i = morton_interleave(x, y) as u64;
    (i + coarse_x * BLOCK_HEIGHT as u64) * bytes_per_pixel as u64
}

/// Byte offset of (x, y) in a tiled image whose rows are `stride` bytes wide.
#[inline(always)]
pub fn tiled_offset(x: u32, y: u32, bytes_per_pixel: u32, stride: u32) -> u64 {
    let coarse_y = (y & !7) as u64;
    morton_offset(x, y, bytes_per_pixel) + coarse_y * stride as u64
}

#[inline(always)]
pub fn linear_offset(x: u32, y: u32, width: u32, bytes_per_pixel: u32) -> u64 {
    (x as u64 + y as u64 * width as u64) * bytes_per_pixel as u64
}
