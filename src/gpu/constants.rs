// Register file placement
pub const GPU_PADDR: u32 = 0x1040_0000;
pub const NUM_REGISTERS: usize = 0x1000;
pub const GPU_REGION_SIZE: u32 = (NUM_REGISTERS * 4) as u32;

// Memory fill engines (4 words each)
pub const REG_MEMORY_FILL: [usize; 2] = [0x004, 0x008];
pub const FILL_ADDRESS_START: usize = 0;
pub const FILL_ADDRESS_END: usize = 1;
pub const FILL_VALUE: usize = 2;
pub const FILL_CONTROL: usize = 3;

// Fill control bits
pub const FILL_TRIGGER: u32 = 1 << 0;
pub const FILL_FINISHED: u32 = 1 << 1;
pub const FILL_24BIT: u32 = 1 << 8;
pub const FILL_32BIT: u32 = 1 << 9;

// Framebuffers (0x40 words each): top screen, sub screen
pub const REG_FRAMEBUFFER: [usize; 2] = [0x117, 0x157];
pub const FB_SIZE: usize = 0x0;
pub const FB_ADDRESS_LEFT1: usize = 0x3;
pub const FB_ADDRESS_LEFT2: usize = 0x4;
pub const FB_FORMAT: usize = 0x5;
pub const FB_ACTIVE: usize = 0x7;
pub const FB_STRIDE: usize = 0xD;
pub const FB_ADDRESS_RIGHT1: usize = 0xE;
pub const FB_ADDRESS_RIGHT2: usize = 0xF;

// Display transfer engine
pub const REG_DISPLAY_TRANSFER: usize = 0x300;
pub const DT_INPUT_ADDRESS: usize = 0x0;
pub const DT_OUTPUT_ADDRESS: usize = 0x1;
pub const DT_OUTPUT_SIZE: usize = 0x2;
pub const DT_INPUT_SIZE: usize = 0x3;
pub const DT_FLAGS: usize = 0x4;
pub const DT_TRIGGER: usize = 0x6;
pub const DT_COPY_SIZE: usize = 0x8;
pub const DT_COPY_INPUT: usize = 0x9;
pub const DT_COPY_OUTPUT: usize = 0xA;

// Display transfer flag bits
pub const DT_FLIP_VERTICALLY: u32 = 1 << 0;
pub const DT_INPUT_LINEAR: u32 = 1 << 1;
pub const DT_CROP_INPUT_LINES: u32 = 1 << 2;
pub const DT_IS_TEXTURE_COPY: u32 = 1 << 3;
pub const DT_DONT_SWIZZLE: u32 = 1 << 5;
pub const DT_INPUT_FORMAT_SHIFT: u32 = 8;
pub const DT_OUTPUT_FORMAT_SHIFT: u32 = 12;
pub const DT_BLOCK_32: u32 = 1 << 16;
pub const DT_SCALING_SHIFT: u32 = 24;

/// Texture copy widths and gaps are counted in 16-byte units.
pub const TEXTURE_COPY_UNIT: u32 = 16;

// Command list processor
pub const REG_COMMAND_PROCESSOR: usize = 0x638;
pub const CP_SIZE: usize = 0x0;
pub const CP_ADDRESS: usize = 0x2;
pub const CP_TRIGGER: usize = 0x4;

/// 268MHz CPU clocks / 60Hz frames per second
pub const FRAME_TICKS: u64 = 268_123_480 / 60;

// Default framebuffer placement (in VRAM) used by system applets
pub const DEFAULT_TOP_LEFT1: u32 = 0x181E_6000;
pub const DEFAULT_TOP_LEFT2: u32 = 0x1822_C800;
pub const DEFAULT_TOP_RIGHT1: u32 = 0x1827_3000;
pub const DEFAULT_TOP_RIGHT2: u32 = 0x182B_9800;
pub const DEFAULT_SUB_LEFT1: u32 = 0x1848_F000;
pub const DEFAULT_SUB_LEFT2: u32 = 0x184C_7800;
pub const SCREEN_WIDTH: u32 = 240;
pub const TOP_SCREEN_HEIGHT: u32 = 400;
pub const SUB_SCREEN_HEIGHT: u32 = 320;
