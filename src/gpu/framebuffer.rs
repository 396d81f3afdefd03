//! Decoding of the scanned-out framebuffers.
//!
//! LCD framebuffers are stored rotated: each memory row holds one 240-pixel
//! column of the physical screen, `stride` bytes apart. The capture keeps
//! memory order and leaves rotation to the consumer.

use super::registers::Screen;
use super::Gpu;
use crate::color::{self, PixelFormat};
use crate::error::{GpuError, Result};
use crate::memory::PhysicalMemory;
use log::{debug, error};
use std::path::Path;

/// Row-major RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl FrameImage {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// RGBA bytes of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn save_png(&self, path: &Path) -> std::result::Result<(), image::ImageError> {
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )
    }
}

impl Gpu {
    /// Decodes the left-eye buffer currently selected for `screen`.
    pub fn capture_framebuffer(&self, screen: Screen, memory: &dyn PhysicalMemory) -> Result<FrameImage> {
        let config = self.regs.framebuffer_config(screen);
        let (width, height) = (config.width(), config.height());

        let format = config.color_format();
        if let PixelFormat::Unknown(raw) = format {
            error!("Unknown framebuffer format {:x} on {:?} screen", raw, screen);
            return Ok(FrameImage::blank(width, height));
        }

        let bpp = format.bytes_per_pixel();
        let stride = config.stride as usize;
        let row_len = width as usize * bpp;
        if height == 0 || row_len == 0 {
            return Ok(FrameImage::blank(width, height));
        }
        if stride < row_len {
            return Err(GpuError::UnsupportedConfiguration(format!(
                "framebuffer stride {} shorter than a {}-byte row",
                stride, row_len
            )));
        }

        let addr = config.active_address(false);
        let len = stride * (height as usize - 1) + row_len;
        let src = memory
            .physical(addr, len)
            .ok_or(GpuError::UnmappedAddress(addr))?;

        let mut image = FrameImage::blank(width, height);
        for (y, dst_row) in image.pixels.chunks_exact_mut(width as usize * 4).enumerate() {
            let src_row = &src[y * stride..y * stride + row_len];
            for (src_pixel, dst_pixel) in src_row.chunks_exact(bpp).zip(dst_row.chunks_exact_mut(4)) {
                let c = color::decode(format, src_pixel);
                dst_pixel.copy_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        }

        debug!(
            "captured {:?} framebuffer {}x{} {:?} @ 0x{:08X}",
            screen, width, height, format, addr
        );
        Ok(image)
    }
}
