//! GPU interrupt identifiers and delivery.

use crate::gpu::FillEngine;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Interrupt lines raised towards the GSP service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterruptId {
    /// Memory fill engine 0 finished.
    Psc0,
    /// Memory fill engine 1 finished.
    Psc1,
    /// Top screen refresh.
    Pdc0,
    /// Sub screen refresh.
    Pdc1,
    /// Display transfer / texture copy finished.
    Ppf,
    P3d,
    Dma,
}

impl InterruptId {
    pub fn fill_engine(engine: FillEngine) -> Self {
        match engine {
            FillEngine::Psc0 => InterruptId::Psc0,
            FillEngine::Psc1 => InterruptId::Psc1,
        }
    }
}

pub trait InterruptSink {
    fn signal(&mut self, id: InterruptId);
}

/// Collects signalled interrupts. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct InterruptRecorder {
    log: Arc<Mutex<Vec<InterruptId>>>,
}

impl InterruptRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signalled(&self) -> Vec<InterruptId> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn count(&self, id: InterruptId) -> usize {
        self.signalled().iter().filter(|&&i| i == id).count()
    }

    pub fn clear(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.clear();
        }
    }
}

impl InterruptSink for InterruptRecorder {
    fn signal(&mut self, id: InterruptId) {
        log::trace!("interrupt {:?}", id);
        if let Ok(mut log) = self.log.lock() {
            log.push(id);
        }
    }
}
