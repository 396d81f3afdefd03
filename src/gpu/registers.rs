//! Register file and typed views over it.
//!
//! The register file is a flat array of 32-bit cells. The view structs below
//! are copies of the cells that make up one hardware block, with accessors
//! for the bit-fields inside them. They are handed by value to collaborators
//! (the rasterizer never sees the register file itself).

use super::constants::*;
use crate::color::PixelFormat;
use serde::{Deserialize, Serialize};

/// Physical addresses are stored in units of 8 bytes.
#[inline(always)]
pub fn decode_address(raw: u32) -> u32 {
    raw.wrapping_mul(8)
}

#[inline(always)]
pub fn encode_address(addr: u32) -> u32 {
    addr / 8
}

#[inline(always)]
fn field(word: u32, shift: u32, width: u32) -> u32 {
    (word >> shift) & ((1u32 << width) - 1)
}

#[inline(always)]
fn low16(word: u32) -> u32 {
    word & 0xFFFF
}

#[inline(always)]
fn high16(word: u32) -> u32 {
    word >> 16
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regs {
    cells: Vec<u32>,
}

impl Default for Regs {
    fn default() -> Self {
        Self::new()
    }
}

impl Regs {
    pub fn new() -> Self {
        Self {
            cells: vec![0; NUM_REGISTERS],
        }
    }

    pub const fn len() -> usize {
        NUM_REGISTERS
    }

    /// False for a register file restored from a snapshot of the wrong size.
    pub fn len_matches(&self) -> bool {
        self.cells.len() == NUM_REGISTERS
    }

    #[inline]
    pub fn get(&self, index: usize) -> u32 {
        self.cells[index]
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: u32) {
        self.cells[index] = value;
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Restores the contents the system firmware leaves behind at boot.
    pub fn reset(&mut self) {
        self.clear();

        let top = REG_FRAMEBUFFER[0];
        self.set(top + FB_ADDRESS_LEFT1, DEFAULT_TOP_LEFT1);
        self.set(top + FB_ADDRESS_LEFT2, DEFAULT_TOP_LEFT2);
        self.set(top + FB_ADDRESS_RIGHT1, DEFAULT_TOP_RIGHT1);
        self.set(top + FB_ADDRESS_RIGHT2, DEFAULT_TOP_RIGHT2);
        self.set(top + FB_SIZE, SCREEN_WIDTH | (TOP_SCREEN_HEIGHT << 16));
        self.set(top + FB_STRIDE, 3 * SCREEN_WIDTH);
        self.set(top + FB_FORMAT, PixelFormat::Rgb8.raw());
        self.set(top + FB_ACTIVE, 0);

        let sub = REG_FRAMEBUFFER[1];
        self.set(sub + FB_ADDRESS_LEFT1, DEFAULT_SUB_LEFT1);
        self.set(sub + FB_ADDRESS_LEFT2, DEFAULT_SUB_LEFT2);
        self.set(sub + FB_SIZE, SCREEN_WIDTH | (SUB_SCREEN_HEIGHT << 16));
        self.set(sub + FB_STRIDE, 3 * SCREEN_WIDTH);
        self.set(sub + FB_FORMAT, PixelFormat::Rgb8.raw());
        self.set(sub + FB_ACTIVE, 0);
    }

    pub fn memory_fill_config(&self, engine: FillEngine) -> MemoryFillConfig {
        let base = engine.base();
        MemoryFillConfig {
            address_start: self.get(base + FILL_ADDRESS_START),
            address_end: self.get(base + FILL_ADDRESS_END),
            value: self.get(base + FILL_VALUE),
            control: self.get(base + FILL_CONTROL),
        }
    }

    /// Clears the trigger and raises the finished flag of a fill engine.
    pub fn complete_memory_fill(&mut self, engine: FillEngine) {
        let index = engine.base() + FILL_CONTROL;
        let control = (self.get(index) & !FILL_TRIGGER) | FILL_FINISHED;
        self.set(index, control);
    }

    pub fn framebuffer_config(&self, screen: Screen) -> FramebufferConfig {
        let base = REG_FRAMEBUFFER[screen as usize];
        FramebufferConfig {
            size: self.get(base + FB_SIZE),
            address_left1: self.get(base + FB_ADDRESS_LEFT1),
            address_left2: self.get(base + FB_ADDRESS_LEFT2),
            format: self.get(base + FB_FORMAT),
            active_fb: self.get(base + FB_ACTIVE),
            stride: self.get(base + FB_STRIDE),
            address_right1: self.get(base + FB_ADDRESS_RIGHT1),
            address_right2: self.get(base + FB_ADDRESS_RIGHT2),
        }
    }

    pub fn display_transfer_config(&self) -> DisplayTransferConfig {
        let base = REG_DISPLAY_TRANSFER;
        DisplayTransferConfig {
            input_address: self.get(base + DT_INPUT_ADDRESS),
            output_address: self.get(base + DT_OUTPUT_ADDRESS),
            output_size: self.get(base + DT_OUTPUT_SIZE),
            input_size: self.get(base + DT_INPUT_SIZE),
            flags: self.get(base + DT_FLAGS),
            trigger: self.get(base + DT_TRIGGER),
            texture_copy: TextureCopyConfig {
                size: self.get(base + DT_COPY_SIZE),
                input: self.get(base + DT_COPY_INPUT),
                output: self.get(base + DT_COPY_OUTPUT),
            },
        }
    }

    pub fn clear_display_transfer_trigger(&mut self) {
        self.set(REG_DISPLAY_TRANSFER + DT_TRIGGER, 0);
    }

    pub fn command_processor_config(&self) -> CommandProcessorConfig {
        let base = REG_COMMAND_PROCESSOR;
        CommandProcessorConfig {
            size: self.get(base + CP_SIZE),
            address: self.get(base + CP_ADDRESS),
            trigger: self.get(base + CP_TRIGGER),
        }
    }

    pub fn clear_command_processor_trigger(&mut self) {
        self.set(REG_COMMAND_PROCESSOR + CP_TRIGGER, 0);
    }
}

/// Pattern width selected by the fill control flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillWidth {
    Bits16,
    Bits24,
    Bits32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryFillConfig {
    pub address_start: u32,
    pub address_end: u32,
    pub value: u32,
    pub control: u32,
}

impl MemoryFillConfig {
    pub fn start_address(&self) -> u32 {
        decode_address(self.address_start)
    }

    pub fn end_address(&self) -> u32 {
        decode_address(self.address_end)
    }

    pub fn trigger(&self) -> bool {
        self.control & FILL_TRIGGER != 0
    }

    pub fn finished(&self) -> bool {
        self.control & FILL_FINISHED != 0
    }

    /// The 32-bit flag wins over the 24-bit flag when both are set. Hardware
    /// behaviour for that combination is undocumented.
    pub fn width(&self) -> FillWidth {
        if self.control & FILL_32BIT != 0 {
            FillWidth::Bits32
        } else if self.control & FILL_24BIT != 0 {
            FillWidth::Bits24
        } else {
            FillWidth::Bits16
        }
    }

    pub fn value_16bit(&self) -> u16 {
        low16(self.value) as u16
    }

    /// {R, G, B} as laid out in memory.
    pub fn value_24bit(&self) -> [u8; 3] {
        let b = self.value.to_le_bytes();
        [b[0], b[1], b[2]]
    }

    pub fn value_32bit(&self) -> u32 {
        self.value
    }

    /// The byte pattern repeated across the fill range.
    pub fn pattern(&self) -> Vec<u8> {
        match self.width() {
            FillWidth::Bits32 => self.value_32bit().to_le_bytes().to_vec(),
            FillWidth::Bits24 => self.value_24bit().to_vec(),
            FillWidth::Bits16 => self.value_16bit().to_le_bytes().to_vec(),
        }
    }
}

/// One of the two memory fill engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillEngine {
    Psc0 = 0,
    Psc1 = 1,
}

impl FillEngine {
    /// First register of the engine's block.
    pub fn base(self) -> usize {
        REG_MEMORY_FILL[self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Top = 0,
    Sub = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramebufferConfig {
    pub size: u32,
    pub address_left1: u32,
    pub address_left2: u32,
    pub format: u32,
    pub active_fb: u32,
    pub stride: u32,
    pub address_right1: u32,
    pub address_right2: u32,
}

impl FramebufferConfig {
    pub fn width(&self) -> u32 {
        low16(self.size)
    }

    pub fn height(&self) -> u32 {
        high16(self.size)
    }

    pub fn color_format(&self) -> PixelFormat {
        PixelFormat::from_raw(field(self.format, 0, 3))
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.color_format().bytes_per_pixel()
    }

    pub fn second_fb_active(&self) -> bool {
        self.active_fb & 1 != 0
    }

    /// Address of the buffer currently scanned out for one eye.
    pub fn active_address(&self, right_eye: bool) -> u32 {
        match (right_eye, self.second_fb_active()) {
            (false, false) => self.address_left1,
            (false, true) => self.address_left2,
            (true, false) => self.address_right1,
            (true, true) => self.address_right2,
        }
    }
}

/// Horizontal/vertical downsampling applied by a display transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingMode {
    NoScale,
    /// 2x horizontal downsample.
    ScaleX,
    /// 2x horizontal and 2x vertical downsample.
    ScaleXY,
}

impl ScalingMode {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(ScalingMode::NoScale),
            1 => Some(ScalingMode::ScaleX),
            2 => Some(ScalingMode::ScaleXY),
            _ => None,
        }
    }

    pub fn horizontal_shift(self) -> u32 {
        (self != ScalingMode::NoScale) as u32
    }

    pub fn vertical_shift(self) -> u32 {
        (self == ScalingMode::ScaleXY) as u32
    }

    /// Source pixels averaged into one destination pixel.
    pub fn samples(self) -> usize {
        match self {
            ScalingMode::NoScale => 1,
            ScalingMode::ScaleX => 2,
            ScalingMode::ScaleXY => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureCopyConfig {
    /// Total payload in bytes.
    pub size: u32,
    pub input: u32,
    pub output: u32,
}

impl TextureCopyConfig {
    pub fn input_width(&self) -> u32 {
        low16(self.input) * TEXTURE_COPY_UNIT
    }

    pub fn input_gap(&self) -> u32 {
        high16(self.input) * TEXTURE_COPY_UNIT
    }

    pub fn output_width(&self) -> u32 {
        low16(self.output) * TEXTURE_COPY_UNIT
    }

    pub fn output_gap(&self) -> u32 {
        high16(self.output) * TEXTURE_COPY_UNIT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayTransferConfig {
    pub input_address: u32,
    pub output_address: u32,
    pub output_size: u32,
    pub input_size: u32,
    pub flags: u32,
    pub trigger: u32,
    pub texture_copy: TextureCopyConfig,
}

impl DisplayTransferConfig {
    pub fn physical_input_address(&self) -> u32 {
        decode_address(self.input_address)
    }

    pub fn physical_output_address(&self) -> u32 {
        decode_address(self.output_address)
    }

    pub fn input_width(&self) -> u32 {
        low16(self.input_size)
    }

    pub fn input_height(&self) -> u32 {
        high16(self.input_size)
    }

    pub fn output_width(&self) -> u32 {
        low16(self.output_size)
    }

    pub fn output_height(&self) -> u32 {
        high16(self.output_size)
    }

    pub fn triggered(&self) -> bool {
        self.trigger & 1 != 0
    }

    pub fn flip_vertically(&self) -> bool {
        self.flags & DT_FLIP_VERTICALLY != 0
    }

    pub fn input_linear(&self) -> bool {
        self.flags & DT_INPUT_LINEAR != 0
    }

    pub fn crop_input_lines(&self) -> bool {
        self.flags & DT_CROP_INPUT_LINES != 0
    }

    pub fn is_texture_copy(&self) -> bool {
        self.flags & DT_IS_TEXTURE_COPY != 0
    }

    pub fn dont_swizzle(&self) -> bool {
        self.flags & DT_DONT_SWIZZLE != 0
    }

    pub fn block_32(&self) -> bool {
        self.flags & DT_BLOCK_32 != 0
    }

    pub fn input_format(&self) -> PixelFormat {
        PixelFormat::from_raw(field(self.flags, DT_INPUT_FORMAT_SHIFT, 3))
    }

    pub fn output_format(&self) -> PixelFormat {
        PixelFormat::from_raw(field(self.flags, DT_OUTPUT_FORMAT_SHIFT, 3))
    }

    pub fn scaling_raw(&self) -> u32 {
        field(self.flags, DT_SCALING_SHIFT, 2)
    }

    pub fn scaling(&self) -> Option<ScalingMode> {
        ScalingMode::from_raw(self.scaling_raw())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandProcessorConfig {
    /// Length of the command list in 32-bit words.
    pub size: u32,
    pub address: u32,
    pub trigger: u32,
}

impl CommandProcessorConfig {
    pub fn physical_address(&self) -> u32 {
        decode_address(self.address)
    }

    pub fn triggered(&self) -> bool {
        self.trigger & 1 != 0
    }
}
