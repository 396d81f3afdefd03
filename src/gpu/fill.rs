use super::registers::{FillEngine, MemoryFillConfig};
use super::{Gpu, GpuBus};
use crate::error::{GpuError, Result};
use crate::interrupt::InterruptId;
use crate::memory::byte_utils;
use log::trace;

pub trait FillOps {
    /// Runs fill engine `engine` if its trigger bit is set.
    fn memory_fill(&mut self, engine: FillEngine, bus: &mut GpuBus<'_>) -> Result<()>;
}

impl FillOps for Gpu {
    fn memory_fill(&mut self, engine: FillEngine, bus: &mut GpuBus<'_>) -> Result<()> {
        let config = self.regs.memory_fill_config(engine);
        if !config.trigger() {
            return Ok(());
        }

        // Some games pass a zero start address. Hardware still completes
        // and raises the interrupt in that case.
        if config.address_start != 0 {
            fill_range(&config, bus)?;
            trace!(
                "MemoryFill from 0x{:08x} to 0x{:08x}",
                config.start_address(),
                config.end_address()
            );
        }

        self.regs.complete_memory_fill(engine);
        bus.interrupts.signal(InterruptId::fill_engine(engine));
        Ok(())
    }
}

fn fill_range(config: &MemoryFillConfig, bus: &mut GpuBus<'_>) -> Result<()> {
    let start = config.start_address();
    let len = config.end_address().saturating_sub(start);

    if bus.rasterizer.accelerate_fill(config) {
        return Ok(());
    }

    bus.rasterizer.flush_and_invalidate_region(start, len);
    if len == 0 {
        return Ok(());
    }

    let dst = bus
        .memory
        .physical_mut(start, len as usize)
        .ok_or(GpuError::UnmappedAddress(start))?;
    byte_utils::fill_pattern(dst, &config.pattern());
    Ok(())
}
