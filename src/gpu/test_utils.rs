use super::*;
use crate::hooks::{CommandProcessor, Rasterizer, Tracer};
use crate::interrupt::InterruptRecorder;
use crate::memory::MemoryMap;

pub const TEST_VRAM_SIZE: usize = 0x40000;
pub const TEST_FCRAM_SIZE: usize = 0x40000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterizerCall {
    AccelerateFill,
    AccelerateTransfer,
    Flush(u32, u32),
    FlushAndInvalidate(u32, u32),
}

/// Rasterizer double that records every call and accepts on request.
#[derive(Debug, Default)]
pub struct RecordingRasterizer {
    pub accept_fill: bool,
    pub accept_transfer: bool,
    pub calls: Vec<RasterizerCall>,
}

impl Rasterizer for RecordingRasterizer {
    fn accelerate_fill(&mut self, _config: &MemoryFillConfig) -> bool {
        self.calls.push(RasterizerCall::AccelerateFill);
        self.accept_fill
    }

    fn accelerate_display_transfer(&mut self, _config: &DisplayTransferConfig) -> bool {
        self.calls.push(RasterizerCall::AccelerateTransfer);
        self.accept_transfer
    }

    fn flush_region(&mut self, addr: u32, size: u32) {
        self.calls.push(RasterizerCall::Flush(addr, size));
    }

    fn flush_and_invalidate_region(&mut self, addr: u32, size: u32) {
        self.calls.push(RasterizerCall::FlushAndInvalidate(addr, size));
    }
}

impl CommandProcessor for Vec<Vec<u32>> {
    fn process_command_list(&mut self, list: &[u32]) {
        self.push(list.to_vec());
    }
}

#[derive(Debug, Default)]
pub struct TraceLog {
    pub registers: Vec<(u32, u32)>,
    pub memory: Vec<(u32, usize)>,
}

impl Tracer for TraceLog {
    fn on_register_written(&mut self, paddr: u32, value: u32) {
        self.registers.push((paddr, value));
    }

    fn on_memory_accessed(&mut self, data: &[u8], paddr: u32) {
        self.memory.push((paddr, data.len()));
    }
}

/// A GPU wired to in-memory collaborators.
pub struct Harness {
    pub gpu: Gpu,
    pub memory: MemoryMap,
    pub rasterizer: RecordingRasterizer,
    pub interrupts: InterruptRecorder,
    pub command_lists: Vec<Vec<u32>>,
    pub trace: TraceLog,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            gpu: Gpu::new(),
            memory: MemoryMap::with_console_layout(TEST_VRAM_SIZE, TEST_FCRAM_SIZE),
            rasterizer: RecordingRasterizer::default(),
            interrupts: InterruptRecorder::new(),
            command_lists: Vec::new(),
            trace: TraceLog::default(),
        }
    }

    /// Write a register by word index.
    pub fn write(&mut self, index: usize, value: u32) -> crate::error::Result<()> {
        self.write_addr(reg_addr(index), AccessWidth::Word, value as u64)
    }

    pub fn write_addr(
        &mut self,
        addr: u32,
        width: AccessWidth,
        value: u64,
    ) -> crate::error::Result<()> {
        let mut bus = GpuBus {
            memory: &mut self.memory,
            rasterizer: &mut self.rasterizer,
            interrupts: &mut self.interrupts,
            command_processor: &mut self.command_lists,
            tracer: Some(&mut self.trace),
        };
        self.gpu.write(addr, width, value, &mut bus)
    }

    pub fn read(&self, index: usize) -> u32 {
        self.gpu.read_word(reg_addr(index)).unwrap()
    }

    pub fn bytes(&self, addr: u32, len: usize) -> Vec<u8> {
        use crate::memory::PhysicalMemory;
        self.memory.physical(addr, len).unwrap().to_vec()
    }

    pub fn load(&mut self, addr: u32, data: &[u8]) {
        assert!(self.memory.load(addr, data), "load outside test memory");
    }
}
