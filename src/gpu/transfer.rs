//! Display transfer engine
//!
//! Two modes share one trigger:
//! - texture copy: a strided raw byte copy where input and output each have
//!   their own row width and inter-row gap;
//! - display transfer: a per-pixel blit that converts pixel formats, moves
//!   between linear and tiled layouts, optionally downsamples and flips.

use super::registers::{DisplayTransferConfig, ScalingMode};
use super::tiling::{linear_offset, tiled_offset};
use super::{Gpu, GpuBus};
use crate::color::{self, Color, PixelFormat};
use crate::error::{GpuError, Result};
use crate::interrupt::InterruptId;
use log::{error, trace};

/// Row geometry of one side of a texture copy, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stride {
    pub width: u32,
    pub gap: u32,
}

impl Stride {
    /// Bytes covered by `size` payload bytes laid out in full strides, as
    /// used for cache maintenance.
    pub fn contiguous_size(&self, size: u32) -> u32 {
        (size / self.width).saturating_mul(self.width + self.gap)
    }

    /// Bytes from the first to the last payload byte, inclusive.
    pub fn span(&self, size: u32) -> usize {
        let (width, gap, size) = (self.width as usize, self.gap as usize, size as usize);
        let rows = size / width;
        let rest = size % width;
        if rest == 0 && rows > 0 {
            rows * (width + gap) - gap
        } else {
            rows * (width + gap) + rest
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub bytes: usize,
    pub chunks: usize,
}

/// Copies `size` bytes from `src` to `dst`, skipping each side's gap when
/// that side reaches the end of a row. Chunks never cross a row boundary on
/// either side.
pub fn strided_copy(src: &[u8], input: Stride, dst: &mut [u8], output: Stride, size: u32) -> CopyStats {
    let mut stats = CopyStats::default();
    let mut src_pos = 0usize;
    let mut dst_pos = 0usize;
    let mut remaining_size = size;
    let mut remaining_input = input.width;
    let mut remaining_output = output.width;

    while remaining_size > 0 {
        let copy_size = remaining_input.min(remaining_output).min(remaining_size);
        let n = copy_size as usize;
        dst[dst_pos..dst_pos + n].copy_from_slice(&src[src_pos..src_pos + n]);
        src_pos += n;
        dst_pos += n;
        stats.bytes += n;
        stats.chunks += 1;

        remaining_input -= copy_size;
        remaining_output -= copy_size;
        remaining_size -= copy_size;

        if remaining_input == 0 {
            remaining_input = input.width;
            src_pos += input.gap as usize;
        }
        if remaining_output == 0 {
            remaining_output = output.width;
            dst_pos += output.gap as usize;
        }
    }
    stats
}

pub trait TransferOps {
    /// Runs the display transfer engine if its trigger bit is set.
    fn display_transfer(&mut self, bus: &mut GpuBus<'_>) -> Result<()>;
}

impl TransferOps for Gpu {
    fn display_transfer(&mut self, bus: &mut GpuBus<'_>) -> Result<()> {
        let config = self.regs.display_transfer_config();
        if !config.triggered() {
            return Ok(());
        }

        if config.is_texture_copy() {
            texture_copy(&config, bus)?;
        } else {
            blit(&config, bus)?;
        }

        self.regs.clear_display_transfer_trigger();
        bus.interrupts.signal(InterruptId::Ppf);
        Ok(())
    }
}

fn texture_copy(config: &DisplayTransferConfig, bus: &mut GpuBus<'_>) -> Result<()> {
    let tc = config.texture_copy;
    let input = Stride {
        width: tc.input_width(),
        gap: tc.input_gap(),
    };
    let output = Stride {
        width: tc.output_width(),
        gap: tc.output_gap(),
    };

    if tc.size == 0 {
        return Ok(());
    }
    if input.width == 0 || output.width == 0 {
        error!("TextureCopy with zero row width (input {}, output {})", input.width, output.width);
        return Err(GpuError::UnsupportedConfiguration(
            "texture copy row width of zero".into(),
        ));
    }

    if bus.rasterizer.accelerate_display_transfer(config) {
        return Ok(());
    }

    let src_addr = config.physical_input_address();
    let dst_addr = config.physical_output_address();
    bus.rasterizer
        .flush_region(src_addr, input.contiguous_size(tc.size));
    bus.rasterizer
        .flush_and_invalidate_region(dst_addr, output.contiguous_size(tc.size));

    let src = bus
        .memory
        .physical(src_addr, input.span(tc.size))
        .ok_or(GpuError::UnmappedAddress(src_addr))?
        .to_vec();
    let dst = bus
        .memory
        .physical_mut(dst_addr, output.span(tc.size))
        .ok_or(GpuError::UnmappedAddress(dst_addr))?;

    let stats = strided_copy(&src, input, dst, output, tc.size);

    trace!(
        "TextureCopy: 0x{:X} bytes in {} chunks from 0x{:08X}({}+{})-> 0x{:08X}({}+{}), flags 0x{:08X}",
        stats.bytes,
        stats.chunks,
        src_addr,
        input.width,
        input.gap,
        dst_addr,
        output.width,
        output.gap,
        config.flags
    );
    Ok(())
}

/// Rejects scaling setups the engine cannot perform, before any memory is touched.
fn validate_scaling(config: &DisplayTransferConfig) -> Result<ScalingMode> {
    let Some(scaling) = config.scaling() else {
        error!(
            "Unimplemented display transfer scaling mode {}",
            config.scaling_raw()
        );
        return Err(GpuError::UnsupportedConfiguration(format!(
            "display transfer scaling mode {}",
            config.scaling_raw()
        )));
    };
    if config.input_linear() && scaling != ScalingMode::NoScale {
        error!("Scaling is only implemented on tiled input");
        return Err(GpuError::UnsupportedConfiguration(
            "scaling with linear input".into(),
        ));
    }
    Ok(scaling)
}

fn blit(config: &DisplayTransferConfig, bus: &mut GpuBus<'_>) -> Result<()> {
    let scaling = validate_scaling(config)?;
    let horizontal_scale = scaling.horizontal_shift();
    let vertical_scale = scaling.vertical_shift();

    let input_format = config.input_format();
    let output_format = config.output_format();
    for (side, format) in [("input", input_format), ("output", output_format)] {
        if let PixelFormat::Unknown(raw) = format {
            error!("Display transfer with unknown {} format {:x}", side, raw);
        }
    }
    let src_bpp = input_format.bytes_per_pixel() as u32;
    let dst_bpp = output_format.bytes_per_pixel() as u32;

    let input_width = config.input_width();
    let output_width = config.output_width() >> horizontal_scale;
    let output_height = config.output_height() >> vertical_scale;

    let input_size = input_width as usize * config.input_height() as usize * src_bpp as usize;
    let output_size = output_width as usize * output_height as usize * dst_bpp as usize;

    let src_addr = config.physical_input_address();
    let dst_addr = config.physical_output_address();
    bus.rasterizer
        .flush_region(src_addr, u32::try_from(input_size).unwrap_or(u32::MAX));
    bus.rasterizer
        .flush_and_invalidate_region(dst_addr, u32::try_from(output_size).unwrap_or(u32::MAX));

    if bus.rasterizer.accelerate_display_transfer(config) {
        return Ok(());
    }

    let src = bus
        .memory
        .physical(src_addr, input_size)
        .ok_or(GpuError::UnmappedAddress(src_addr))?
        .to_vec();
    let dst = bus
        .memory
        .physical_mut(dst_addr, output_size)
        .ok_or(GpuError::UnmappedAddress(dst_addr))?;

    // Render into a scratch copy so a bad offset aborts without a half-written image.
    let mut out = dst.to_vec();
    let samples = scaling.samples();
    let mut sampled = [Color::default(); 4];

    for y in 0..output_height {
        for x in 0..output_width {
            let input_x = x << horizontal_scale;
            let input_y = y << vertical_scale;
            // Flip after the source mapping so scaling samples stay in place.
            let out_y = if config.flip_vertically() {
                output_height - y - 1
            } else {
                y
            };

            let input_stride = input_width * src_bpp;
            let output_stride = output_width * dst_bpp;
            let (src_offset, dst_offset) = match (config.input_linear(), config.dont_swizzle()) {
                // Linear input, tiled output
                (true, false) => (
                    linear_offset(input_x, input_y, input_width, src_bpp),
                    tiled_offset(x, out_y, dst_bpp, output_stride),
                ),
                // Both linear
                (true, true) => (
                    linear_offset(input_x, input_y, input_width, src_bpp),
                    linear_offset(x, out_y, output_width, dst_bpp),
                ),
                // Tiled input, linear output
                (false, false) => (
                    tiled_offset(input_x, input_y, src_bpp, input_stride),
                    linear_offset(x, out_y, output_width, dst_bpp),
                ),
                // Both tiled
                (false, true) => (
                    tiled_offset(input_x, input_y, src_bpp, input_stride),
                    tiled_offset(x, out_y, dst_bpp, output_stride),
                ),
            };

            let src_offset = src_offset as usize;
            let src_len = src_bpp as usize * samples;
            let src_pixels = src
                .get(src_offset..src_offset + src_len)
                .ok_or(GpuError::OutOfBounds {
                    addr: src_offset,
                    len: src_len,
                })?;
            // Downsampled neighbours are the next texels in memory; in tiled
            // layout those are the rest of the 2x2 quad.
            for (k, slot) in sampled.iter_mut().take(samples).enumerate() {
                let at = k * src_bpp as usize;
                *slot = color::decode(input_format, &src_pixels[at..]);
            }
            let src_color = Color::average(&sampled[..samples]);

            let dst_offset = dst_offset as usize;
            let dst_len = dst_bpp as usize;
            let dst_pixel = out
                .get_mut(dst_offset..dst_offset + dst_len)
                .ok_or(GpuError::OutOfBounds {
                    addr: dst_offset,
                    len: dst_len,
                })?;
            color::encode(output_format, src_color, dst_pixel);
        }
    }

    dst.copy_from_slice(&out);

    trace!(
        "DisplayTriggerTransfer: 0x{:08x} bytes from 0x{:08x}({}x{})-> 0x{:08x}({}x{}), dst format {:?}, flags 0x{:08X}",
        output_size,
        src_addr,
        input_width,
        config.input_height(),
        dst_addr,
        output_width,
        output_height,
        output_format,
        config.flags
    );
    Ok(())
}
