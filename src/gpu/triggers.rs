//! Side-effect table for the register write path.
//!
//! Each entry maps a register index to the hardware operation a write to that
//! cell starts. Every other cell is plain storage.

use super::constants::*;
use super::registers::FillEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    MemoryFill(FillEngine),
    DisplayTransfer,
    CommandList,
}

pub const TRIGGER_TABLE: [(usize, TriggerKind); 4] = [
    (REG_MEMORY_FILL[0] + FILL_CONTROL, TriggerKind::MemoryFill(FillEngine::Psc0)),
    (REG_MEMORY_FILL[1] + FILL_CONTROL, TriggerKind::MemoryFill(FillEngine::Psc1)),
    (REG_DISPLAY_TRANSFER + DT_TRIGGER, TriggerKind::DisplayTransfer),
    (REG_COMMAND_PROCESSOR + CP_TRIGGER, TriggerKind::CommandList),
];

pub fn lookup(index: usize) -> Option<TriggerKind> {
    TRIGGER_TABLE
        .iter()
        .find(|(i, _)| *i == index)
        .map(|(_, kind)| *kind)
}

pub fn is_trigger(index: usize) -> bool {
    lookup(index).is_some()
}
