//! 3DS display controller ("GPU external registers")
//!
//! A 16 KiB block of 32-bit registers mapped at [`GPU_PADDR`]. Most cells are
//! plain configuration storage; writes to the cells listed in
//! [`triggers::TRIGGER_TABLE`] synchronously run a memory fill, a display
//! transfer or a command list before the write returns.
//!
//! ## Register Map (word index)
//!
//! | Index       | Block                              |
//! |:------------|:-----------------------------------|
//! | 0x004-0x007 | Memory fill engine 0 (PSC0)        |
//! | 0x008-0x00B | Memory fill engine 1 (PSC1)        |
//! | 0x117-0x156 | Top screen framebuffer             |
//! | 0x157-0x196 | Sub screen framebuffer             |
//! | 0x300-0x30A | Display transfer / texture copy    |
//! | 0x638-0x63C | Command list processor             |
//!
//! Register traffic must arrive from a single execution stream in program
//! order. Nothing here locks; a multi-threaded CPU core has to serialize its
//! accesses before calling in.

use crate::debugger::Debuggable;
use crate::error::{GpuError, Result};
use crate::hooks::{CommandProcessor, Rasterizer, Tracer};
use crate::interrupt::InterruptSink;
use crate::memory::PhysicalMemory;
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod constants;
pub use constants::*;

pub mod registers;
pub use registers::{
    CommandProcessorConfig, DisplayTransferConfig, FillEngine, FillWidth, FramebufferConfig, MemoryFillConfig,
    Regs, ScalingMode, Screen, TextureCopyConfig,
};

pub mod triggers;
pub use triggers::TriggerKind;

pub mod tiling;

pub mod fill;
pub use fill::FillOps;
pub mod transfer;
pub use transfer::{CopyStats, TransferOps};
pub mod command;
pub mod framebuffer;
pub use framebuffer::FrameImage;
pub mod timing;
pub use timing::FrameTiming;

#[cfg(test)]
mod test_utils;


#[cfg(test)]
mod tests_fill;


#[cfg(test)]
mod tests_timing;

/// Width of a single register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessWidth {
    Byte,
    Half,
    Word,
    Double,
}

impl AccessWidth {
    pub fn bits(self) -> u32 {
        match self {
            AccessWidth::Byte => 8,
            AccessWidth::Half => 16,
            AccessWidth::Word => 32,
            AccessWidth::Double => 64,
        }
    }
}

/// Collaborators a register write may reach. Borrowed for one access only.
pub struct GpuBus<'a> {
    pub memory: &'a mut dyn PhysicalMemory,
    pub rasterizer: &'a mut dyn Rasterizer,
    pub interrupts: &'a mut dyn InterruptSink,
    pub command_processor: &'a mut dyn CommandProcessor,
    pub tracer: Option<&'a mut dyn Tracer>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Gpu {
    pub regs: Regs,
    pub timing: FrameTiming,
}

impl Default for Gpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Gpu {
    /// Allocates the register file with its power-on contents.
    pub fn new() -> Self {
        let mut gpu = Self {
            regs: Regs::new(),
            timing: FrameTiming::default(),
        };
        gpu.reset();
        gpu
    }

    pub fn reset(&mut self) {
        self.regs.reset();
        self.timing.reset();
    }

    /// Register index for an access, or `None` if the access is not served.
    fn decode_index(addr: u32, width: AccessWidth) -> Option<usize> {
        let offset = addr.checked_sub(GPU_PADDR)?;
        if width != AccessWidth::Word || offset % 4 != 0 || offset >= GPU_REGION_SIZE {
            return None;
        }
        Some((offset / 4) as usize)
    }

    pub fn read(&self, addr: u32, width: AccessWidth) -> Result<u32> {
        match Self::decode_index(addr, width) {
            Some(index) => Ok(self.regs.get(index)),
            None => {
                error!(
                    "unknown Read{} @ 0x{:08X}",
                    width.bits(),
                    addr.wrapping_sub(GPU_PADDR)
                );
                Err(GpuError::UnsupportedAccess {
                    addr,
                    width: width.bits(),
                })
            }
        }
    }

    pub fn read_word(&self, addr: u32) -> Result<u32> {
        self.read(addr, AccessWidth::Word)
    }

    /// Stores `value` and runs the side effect bound to the cell, if any.
    ///
    /// The tracer is told about the write after the side effect ran, so any
    /// memory the operation consumed is reported first.
    pub fn write(
        &mut self,
        addr: u32,
        width: AccessWidth,
        value: u64,
        bus: &mut GpuBus<'_>,
    ) -> Result<()> {
        let Some(index) = Self::decode_index(addr, width) else {
            error!(
                "unknown Write{} 0x{:08X} @ 0x{:08X}",
                width.bits(),
                value,
                addr.wrapping_sub(GPU_PADDR)
            );
            return Err(GpuError::UnsupportedAccess {
                addr,
                width: width.bits(),
            });
        };

        let Ok(value) = u32::try_from(value) else {
            error!(
                "Write{} 0x{:X} @ 0x{:08X} does not fit the access width",
                width.bits(),
                value,
                addr.wrapping_sub(GPU_PADDR)
            );
            return Err(GpuError::UnsupportedAccess {
                addr,
                width: width.bits(),
            });
        };
        self.regs.set(index, value);

        let result = match triggers::lookup(index) {
            Some(TriggerKind::MemoryFill(engine)) => self.memory_fill(engine, bus),
            Some(TriggerKind::DisplayTransfer) => self.display_transfer(bus),
            Some(TriggerKind::CommandList) => self.process_command_list(bus),
            None => Ok(()),
        };

        if let Some(tracer) = bus.tracer.as_deref_mut() {
            tracer.on_register_written(addr, value);
        }

        result
    }

    pub fn write_word(&mut self, addr: u32, value: u32, bus: &mut GpuBus<'_>) -> Result<()> {
        self.write(addr, AccessWidth::Word, value as u64, bus)
    }
}

/// Absolute address of a register index.
pub const fn reg_addr(index: usize) -> u32 {
    GPU_PADDR + (index as u32) * 4
}

impl Debuggable for Gpu {
    fn read_state(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn write_state(&mut self, state: &Value) {
        match serde_json::from_value::<Gpu>(state.clone()) {
            Ok(new_gpu) if new_gpu.regs.len_matches() => *self = new_gpu,
            Ok(_) => error!("Error restoring GPU state: register file size mismatch"),
            Err(e) => error!("Error deserializing GPU state: {}", e),
        }
    }
}
