//! Virtual-time event scheduling.
//!
//! [`CoreTiming`] keeps a global tick counter advanced by whoever executes
//! guest code, and a queue of events keyed by the tick they are due at.
//! Events are popped once the counter has reached their target; the amount by
//! which the counter overshot the target is reported as `cycles_late` so a
//! periodic event can reschedule against its ideal timeline. An event queued
//! at a tick that has already passed fires on the next [`CoreTiming::pop_due`]
//! with its lateness measured from that tick.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    /// Display controller frame boundary.
    VBlank,
}

pub trait Scheduler {
    /// Current virtual time.
    fn ticks(&self) -> u64;
    fn schedule_event(&mut self, cycles_into_future: u64, event: EventType);
    /// Queue `event` at an absolute tick, which may already be in the past.
    fn schedule_event_at(&mut self, target: u64, event: EventType);
    /// Drops every pending occurrence of `event`.
    fn unschedule_event(&mut self, event: EventType);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredEvent {
    pub event: EventType,
    /// Tick the event was scheduled for.
    pub target: u64,
    /// How far the clock had already passed `target` when it fired.
    pub cycles_late: u64,
}

#[derive(Debug, Default)]
pub struct CoreTiming {
    ticks: u64,
    next_seq: u64,
    // (target tick, insertion order, event)
    queue: BinaryHeap<Reverse<(u64, u64, EventType)>>,
}

impl CoreTiming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for `cycles` of executed guest code.
    pub fn advance(&mut self, cycles: u64) {
        self.ticks += cycles;
    }

    /// Tick of the earliest pending event.
    pub fn next_target(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse((target, _, _))| *target)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_scheduled(&self, event: EventType) -> bool {
        self.queue.iter().any(|Reverse((_, _, e))| *e == event)
    }

    /// Removes and returns the earliest event whose target has been reached.
    /// Events due at the same tick fire in scheduling order.
    pub fn pop_due(&mut self) -> Option<FiredEvent> {
        let target = self.next_target()?;
        if target > self.ticks {
            return None;
        }
        let Reverse((target, _, event)) = self.queue.pop()?;
        Some(FiredEvent {
            event,
            target,
            cycles_late: self.ticks - target,
        })
    }
}

impl Scheduler for CoreTiming {
    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn schedule_event(&mut self, cycles_into_future: u64, event: EventType) {
        self.schedule_event_at(self.ticks.saturating_add(cycles_into_future), event);
    }

    fn schedule_event_at(&mut self, target: u64, event: EventType) {
        self.queue.push(Reverse((target, self.next_seq, event)));
        self.next_seq += 1;
    }

    fn unschedule_event(&mut self, event: EventType) {
        let remaining: Vec<_> = self
            .queue
            .drain()
            .filter(|Reverse((_, _, e))| *e != event)
            .collect();
        self.queue.extend(remaining);
    }
}
