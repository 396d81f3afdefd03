use super::{Gpu, GpuBus};
use crate::error::{GpuError, Result};
use crate::memory::byte_utils;
use log::trace;

impl Gpu {
    /// Hands the configured command list to the command processor.
    ///
    /// Dispatch has no completion interrupt; the list is considered consumed
    /// once the processor returns, at which point the trigger is cleared.
    pub(crate) fn process_command_list(&mut self, bus: &mut GpuBus<'_>) -> Result<()> {
        let config = self.regs.command_processor_config();
        if !config.triggered() {
            return Ok(());
        }

        let addr = config.physical_address();
        let len = config.size as usize * 4;
        let bytes = bus
            .memory
            .physical(addr, len)
            .ok_or(GpuError::UnmappedAddress(addr))?;

        if let Some(tracer) = bus.tracer.as_deref_mut() {
            tracer.on_memory_accessed(bytes, addr);
        }

        let list = byte_utils::words_from_bytes(bytes);
        trace!("command list: {} words @ 0x{:08X}", list.len(), addr);
        bus.command_processor.process_command_list(&list);

        self.regs.clear_command_processor_trigger();
        Ok(())
    }
}
