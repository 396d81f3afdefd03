use super::timing::next_frame_delay;
use super::*;
use crate::hooks::SwapCounter;
use crate::interrupt::{InterruptId, InterruptRecorder};
use crate::scheduler::{CoreTiming, EventType, Scheduler};
use proptest::prelude::*;

struct Clock {
    gpu: Gpu,
    timing: CoreTiming,
    swaps: SwapCounter,
    interrupts: InterruptRecorder,
    fired: Vec<u64>,
}

impl Clock {
    fn new(frame_skip: u32) -> Self {
        let mut gpu = Gpu::new();
        gpu.timing.set_frame_skip(frame_skip);
        let mut timing = CoreTiming::new();
        gpu.arm(&mut timing);
        Self {
            gpu,
            timing,
            swaps: SwapCounter::new(),
            interrupts: InterruptRecorder::new(),
            fired: Vec::new(),
        }
    }

    fn run(&mut self, cycles: u64) {
        self.timing.advance(cycles);
        while let Some(event) = self.timing.pop_due() {
            assert_eq!(event.event, EventType::VBlank);
            self.fired.push(event.target);
            let mut frames = self.swaps.clone();
            let mut interrupts = self.interrupts.clone();
            self.gpu
                .on_vblank(event.cycles_late, &mut self.timing, &mut frames, &mut interrupts);
        }
    }

    fn run_frames(&mut self, frames: u64) {
        for _ in 0..frames {
            self.run(FRAME_TICKS);
        }
    }
}

#[test]
fn test_first_frame_after_one_period() {
    let mut clock = Clock::new(0);
    assert_eq!(clock.timing.next_target(), Some(FRAME_TICKS));
    clock.run(FRAME_TICKS - 1);
    assert!(clock.fired.is_empty());
    clock.run(1);
    assert_eq!(clock.fired, vec![FRAME_TICKS]);
    assert_eq!(clock.gpu.timing.frame_count, 1);
}

#[test]
fn test_arm_twice_schedules_once() {
    let mut gpu = Gpu::new();
    let mut timing = CoreTiming::new();
    gpu.arm(&mut timing);
    gpu.arm(&mut timing);
    assert_eq!(timing.pending(), 1);
}

#[test]
fn test_no_frame_skip_swaps_every_frame() {
    let mut clock = Clock::new(0);
    clock.run_frames(10);
    assert_eq!(clock.swaps.count(), 10);
    assert!(!clock.gpu.timing.skip_frame);
}

#[test]
fn test_frame_skip_one_swaps_every_other_frame() {
    let mut clock = Clock::new(1);

    let mut swapped = Vec::new();
    for _ in 0..6 {
        let before = clock.swaps.count();
        clock.run_frames(1);
        swapped.push(clock.swaps.count() > before);
    }
    assert_eq!(swapped, vec![false, true, false, true, false, true]);
}

#[test]
fn test_frame_skip_two_swaps_once_per_cycle() {
    let mut clock = Clock::new(2);
    clock.run_frames(12);
    // Skip flag follows frame_count & 2: 0,1,1,0,0,1,1,0,...
    assert_eq!(clock.swaps.count(), 3);
}

#[test]
fn test_frame_skip_change_waits_for_next_boundary() {
    let mut clock = Clock::new(0);
    clock.run_frames(1);
    clock.gpu.timing.set_frame_skip(1);
    assert_eq!(clock.gpu.timing.frame_skip, 0);
    clock.run_frames(1);
    assert_eq!(clock.gpu.timing.frame_skip, 1);
}

#[test]
fn test_each_frame_raises_both_display_interrupts() {
    let mut clock = Clock::new(0);
    clock.run_frames(3);
    assert_eq!(clock.interrupts.count(InterruptId::Pdc0), 3);
    assert_eq!(clock.interrupts.count(InterruptId::Pdc1), 3);
    assert_eq!(clock.interrupts.count(InterruptId::Ppf), 0);
}

#[test]
fn test_late_firings_do_not_drift() {
    let mut clock = Clock::new(0);
    // Irregular steps make most firings late.
    let step = FRAME_TICKS / 3 + 17;
    while clock.fired.len() < 1000 {
        clock.run(step);
    }

    for (n, target) in clock.fired.iter().enumerate() {
        assert_eq!(*target, (n as u64 + 1) * FRAME_TICKS, "Drift at firing {}", n);
    }
    let next = clock.timing.next_target().unwrap();
    assert_eq!(next, (clock.fired.len() as u64 + 1) * FRAME_TICKS);
}

#[test]
fn test_disarm_stops_firings() {
    let mut clock = Clock::new(0);
    clock.run_frames(2);
    clock.gpu.disarm(&mut clock.timing);
    assert!(!clock.gpu.timing.is_armed());
    assert!(!clock.timing.is_scheduled(EventType::VBlank));

    clock.run_frames(5);
    assert_eq!(clock.fired.len(), 2);
    assert_eq!(clock.swaps.count(), 2);
}

#[test]
fn test_vblank_ignored_when_not_armed() {
    let mut gpu = Gpu::new();
    let mut timing = CoreTiming::new();
    let mut swaps = SwapCounter::new();
    let mut interrupts = InterruptRecorder::new();
    gpu.on_vblank(0, &mut timing, &mut swaps, &mut interrupts);

    assert_eq!(gpu.timing.frame_count, 0);
    assert_eq!(timing.pending(), 0);
    assert!(interrupts.signalled().is_empty());
}

#[test]
fn test_late_firing_delay() {
    assert_eq!(next_frame_delay(0), FRAME_TICKS);
    assert_eq!(next_frame_delay(10), FRAME_TICKS - 10);
    assert_eq!(next_frame_delay(FRAME_TICKS + 5), 0);
}

#[test]
fn test_multi_period_advance_fires_every_boundary() {
    let mut clock = Clock::new(0);
    clock.run(3 * FRAME_TICKS + 10);
    assert_eq!(clock.fired, vec![FRAME_TICKS, 2 * FRAME_TICKS, 3 * FRAME_TICKS]);
    assert_eq!(clock.gpu.timing.frame_count, 3);
    assert_eq!(clock.swaps.count(), 3);
    assert_eq!(clock.timing.next_target(), Some(4 * FRAME_TICKS));

    clock.run(FRAME_TICKS);
    assert_eq!(clock.fired.last(), Some(&(4 * FRAME_TICKS)));
    assert_eq!(clock.timing.next_target(), Some(5 * FRAME_TICKS));
}

proptest! {
    /// Whatever the advance pattern, the n-th firing targets n frame periods.
    #[test]
    fn firings_stay_on_ideal_timeline(steps in prop::collection::vec(1u64..3 * FRAME_TICKS, 1..200)) {
        let mut clock = Clock::new(0);
        for step in steps {
            clock.run(step);
        }
        for (n, target) in clock.fired.iter().enumerate() {
            prop_assert_eq!(*target, (n as u64 + 1) * FRAME_TICKS);
        }
        prop_assert_eq!(clock.swaps.count(), clock.fired.len() as u64);
        prop_assert_eq!(clock.fired.len() as u64, clock.timing.ticks() / FRAME_TICKS);
    }
}
