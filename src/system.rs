//! Emulation session: the display controller plus everything it talks to.
//!
//! [`System`] owns the register file, guest RAM, the virtual-time event queue
//! and the boxed collaborators, and wires them together for each register
//! access or timed event.

use crate::error::Result;
use crate::gpu::{AccessWidth, FrameImage, Gpu, GpuBus, Screen};
use crate::hooks::{
    CommandProcessor, FrameSink, LogTracer, NullCommandProcessor, NullRasterizer, Rasterizer,
    SwapCounter, Tracer,
};
use crate::interrupt::{InterruptRecorder, InterruptSink};
use crate::memory::MemoryMap;
use crate::scheduler::{CoreTiming, EventType, Scheduler};
use crate::settings::{AccelerationMode, Settings};
use log::{debug, info};

/// Host-side implementations handed to [`System::init`].
pub struct Collaborators {
    pub rasterizer: Box<dyn Rasterizer>,
    pub interrupts: Box<dyn InterruptSink>,
    pub command_processor: Box<dyn CommandProcessor>,
    pub frames: Box<dyn FrameSink>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            rasterizer: Box::new(NullRasterizer),
            interrupts: Box::new(InterruptRecorder::new()),
            command_processor: Box::new(NullCommandProcessor::default()),
            frames: Box::new(SwapCounter::new()),
        }
    }
}

pub struct System {
    pub gpu: Gpu,
    pub timing: CoreTiming,
    pub memory: MemoryMap,
    settings: Settings,
    rasterizer: Box<dyn Rasterizer>,
    interrupts: Box<dyn InterruptSink>,
    command_processor: Box<dyn CommandProcessor>,
    frames: Box<dyn FrameSink>,
    tracer: Option<Box<dyn Tracer>>,
}

impl System {
    /// Allocates guest RAM, resets the registers to their boot contents and
    /// schedules the first frame boundary one period from now.
    pub fn init(settings: Settings, hooks: Collaborators) -> Self {
        let rasterizer: Box<dyn Rasterizer> = match settings.acceleration {
            AccelerationMode::Software => Box::new(NullRasterizer),
            AccelerationMode::Hardware => hooks.rasterizer,
        };
        let tracer: Option<Box<dyn Tracer>> = if settings.trace_registers {
            Some(Box::new(LogTracer))
        } else {
            None
        };

        let mut gpu = Gpu::new();
        gpu.timing.set_frame_skip(settings.frame_skip);
        let mut timing = CoreTiming::new();
        gpu.arm(&mut timing);

        info!(
            "system init: vram 0x{:X}, fcram 0x{:X}, {:?} acceleration, frame skip {}",
            settings.vram_size, settings.fcram_size, settings.acceleration, settings.frame_skip
        );

        Self {
            gpu,
            timing,
            memory: MemoryMap::with_console_layout(settings.vram_size, settings.fcram_size),
            settings,
            rasterizer,
            interrupts: hooks.interrupts,
            command_processor: hooks.command_processor,
            frames: hooks.frames,
            tracer,
        }
    }

    /// Deregisters the frame event. Register state is kept for inspection.
    pub fn shutdown(&mut self) {
        self.gpu.disarm(&mut self.timing);
        info!("system shutdown after {} frames", self.gpu.timing.frame_count);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs `cycles` of virtual time, dispatching every event that falls due.
    pub fn run_cycles(&mut self, cycles: u64) {
        self.timing.advance(cycles);
        while let Some(fired) = self.timing.pop_due() {
            match fired.event {
                EventType::VBlank => self.gpu.on_vblank(
                    fired.cycles_late,
                    &mut self.timing,
                    self.frames.as_mut(),
                    self.interrupts.as_mut(),
                ),
            }
        }
    }

    /// Runs until `frames` more frame boundaries have fired.
    pub fn run_frames(&mut self, frames: u64) {
        let target = self.gpu.timing.frame_count + frames;
        while self.gpu.timing.frame_count < target {
            let Some(next) = self.timing.next_target() else {
                debug!("no frame event scheduled; stopping");
                return;
            };
            let step = next.saturating_sub(self.timing.ticks()).max(1);
            self.run_cycles(step);
        }
    }

    pub fn read(&self, addr: u32, width: AccessWidth) -> Result<u32> {
        self.gpu.read(addr, width)
    }

    pub fn read_word(&self, addr: u32) -> Result<u32> {
        self.gpu.read_word(addr)
    }

    pub fn write(&mut self, addr: u32, width: AccessWidth, value: u64) -> Result<()> {
        let mut bus = GpuBus {
            memory: &mut self.memory,
            rasterizer: self.rasterizer.as_mut(),
            interrupts: self.interrupts.as_mut(),
            command_processor: self.command_processor.as_mut(),
            tracer: self.tracer.as_deref_mut().map(|t| t as &mut dyn Tracer),
        };
        self.gpu.write(addr, width, value, &mut bus)
    }

    pub fn write_word(&mut self, addr: u32, value: u32) -> Result<()> {
        self.write(addr, AccessWidth::Word, value as u64)
    }

    pub fn capture_framebuffer(&self, screen: Screen) -> Result<FrameImage> {
        self.gpu.capture_framebuffer(screen, &self.memory)
    }
}
