//! Collaborator interfaces the display controller calls out to.
//!
//! None of these hold references into the register file; they receive values
//! or borrowed slices for the duration of one call.

use crate::gpu::registers::{DisplayTransferConfig, MemoryFillConfig};
use log::{debug, trace};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hardware renderer fast path plus the coherency hooks for its cached view
/// of guest memory.
///
/// The `accelerate_*` methods return `true` when the renderer performed the
/// operation itself; the engine then skips its own memory writes. Default
/// implementations decline and treat coherency calls as no-ops.
pub trait Rasterizer {
    fn accelerate_fill(&mut self, _config: &MemoryFillConfig) -> bool {
        false
    }

    fn accelerate_display_transfer(&mut self, _config: &DisplayTransferConfig) -> bool {
        false
    }

    /// Write back any cached data for the range to guest memory.
    fn flush_region(&mut self, _addr: u32, _size: u32) {}

    /// Write back and then drop any cached data for the range.
    fn flush_and_invalidate_region(&mut self, _addr: u32, _size: u32) {}
}

/// Software-only path: declines every acceleration request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRasterizer;

impl Rasterizer for NullRasterizer {}

/// Consumer of PICA200 command lists.
pub trait CommandProcessor {
    fn process_command_list(&mut self, list: &[u32]);
}

/// Logs and counts command lists without interpreting them.
#[derive(Debug, Default, Clone)]
pub struct NullCommandProcessor {
    pub lists: u64,
    pub words: u64,
}

impl CommandProcessor for NullCommandProcessor {
    fn process_command_list(&mut self, list: &[u32]) {
        self.lists += 1;
        self.words += list.len() as u64;
        debug!("command list of {} words dropped", list.len());
    }
}

/// Front end notification that a new frame is ready for presentation.
pub trait FrameSink {
    fn swap_buffers(&mut self);
}

/// Counts buffer swaps. Clones share the counter.
#[derive(Debug, Default, Clone)]
pub struct SwapCounter {
    swaps: Arc<AtomicU64>,
}

impl SwapCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.swaps.load(Ordering::Relaxed)
    }
}

impl FrameSink for SwapCounter {
    fn swap_buffers(&mut self) {
        self.swaps.fetch_add(1, Ordering::Relaxed);
    }
}

/// Observer for register and memory traffic (e.g. a trace recorder).
pub trait Tracer {
    fn on_register_written(&mut self, paddr: u32, value: u32);
    fn on_memory_accessed(&mut self, data: &[u8], paddr: u32);
}

/// Writes every observed access to the `trace` log level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn on_register_written(&mut self, paddr: u32, value: u32) {
        trace!("register write 0x{:08X} @ 0x{:08X}", value, paddr);
    }

    fn on_memory_accessed(&mut self, data: &[u8], paddr: u32) {
        trace!("memory read 0x{:X} bytes @ 0x{:08X}", data.len(), paddr);
    }
}
