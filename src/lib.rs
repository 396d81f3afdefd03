//! ctrgpu - Nintendo 3DS display controller emulation
//!
//! This library provides the register file behind the 3DS GPU's external
//! registers, the memory fill and display transfer engines it triggers, and
//! the frame boundary event that drives screen refresh.

pub mod color;
pub mod debugger;
pub mod error;
pub mod gpu;
pub mod hooks;
pub mod interrupt;
pub mod memory;
pub mod scheduler;
pub mod settings;
pub mod system;

pub use error::{GpuError, Result};
pub use gpu::Gpu;
pub use settings::Settings;
pub use system::{Collaborators, System};
