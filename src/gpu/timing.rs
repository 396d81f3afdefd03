//! Frame boundary ("VBlank") event and frame-skip policy.
//!
//! One periodic event drives screen refresh: every firing advances the frame
//! counter, decides whether the front end should swap buffers, raises PDC0
//! and PDC1, and reschedules itself one frame period after its ideal target.

use super::constants::FRAME_TICKS;
use super::Gpu;
use crate::hooks::FrameSink;
use crate::interrupt::{InterruptId, InterruptSink};
use crate::scheduler::{EventType, Scheduler};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTiming {
    /// Total number of frame boundaries seen.
    pub frame_count: u64,
    /// True if the current frame is skipped.
    pub skip_frame: bool,
    /// True if the previous frame was skipped.
    pub last_skip_frame: bool,
    /// Frame-skip stride; 0 never skips.
    pub frame_skip: u32,
    /// New stride, applied at the next frame boundary.
    pending_frame_skip: Option<u32>,
    armed: bool,
}

impl FrameTiming {
    pub fn reset(&mut self) {
        let frame_skip = self.pending_frame_skip.unwrap_or(self.frame_skip);
        *self = Self {
            frame_skip,
            ..Self::default()
        };
    }

    /// Request a new frame-skip stride. Frame state is only ever changed from
    /// inside a firing, so the value takes effect at the next boundary.
    pub fn set_frame_skip(&mut self, frame_skip: u32) {
        self.pending_frame_skip = Some(frame_skip);
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advance to the next frame and report whether buffers should be swapped.
    ///
    /// When a frame is skipped nothing is rendered to the internal
    /// framebuffers, so a swap only makes sense after a rendered frame:
    ///  - frame_skip == 0: always swap
    ///  - frame_skip == 1: swap every other frame
    ///  - frame_skip > 1: swap once per skip cycle, when a rendered run ends
    pub fn advance_frame(&mut self) -> bool {
        if let Some(frame_skip) = self.pending_frame_skip.take() {
            self.frame_skip = frame_skip;
        }

        self.frame_count += 1;
        self.last_skip_frame = self.skip_frame;
        self.skip_frame = (self.frame_count & self.frame_skip as u64) != 0;

        (((self.frame_skip != 1) ^ self.last_skip_frame) && self.last_skip_frame != self.skip_frame)
            || self.frame_skip == 0
    }
}

/// Delay until the next frame boundary given how late this one fired.
/// Zero once a firing is more than a period late.
pub fn next_frame_delay(cycles_late: u64) -> u64 {
    FRAME_TICKS.saturating_sub(cycles_late)
}

impl Gpu {
    /// Schedule the first frame boundary one period from now.
    pub fn arm(&mut self, scheduler: &mut dyn Scheduler) {
        if self.timing.armed {
            return;
        }
        scheduler.schedule_event(FRAME_TICKS, EventType::VBlank);
        self.timing.armed = true;
        debug!("frame event armed");
    }

    /// Deregister the periodic event; no firing reaches the GPU afterwards.
    pub fn disarm(&mut self, scheduler: &mut dyn Scheduler) {
        scheduler.unschedule_event(EventType::VBlank);
        self.timing.armed = false;
        debug!("frame event disarmed");
    }

    pub fn on_vblank(
        &mut self,
        cycles_late: u64,
        scheduler: &mut dyn Scheduler,
        frames: &mut dyn FrameSink,
        interrupts: &mut dyn InterruptSink,
    ) {
        if !self.timing.armed {
            return;
        }

        if self.timing.advance_frame() {
            frames.swap_buffers();
        }
        trace!(
            "vblank {} (skip {}, late {})",
            self.timing.frame_count,
            self.timing.skip_frame,
            cycles_late
        );

        // TODO: split PDC0/PDC1 if hardware tests show they mark the start
        // and end of the blanking period rather than top and sub screens.
        interrupts.signal(InterruptId::Pdc0);
        interrupts.signal(InterruptId::Pdc1);

        // Anchored to the missed target, so a multi-period jump fires every boundary.
        let target = scheduler.ticks().saturating_sub(cycles_late) + FRAME_TICKS;
        trace!("next vblank in {} ticks", next_frame_delay(cycles_late));
        scheduler.schedule_event_at(target, EventType::VBlank);
    }
}
