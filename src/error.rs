//! Error type shared by the register file and the engines behind it.

use thiserror::Error;

/// Errors surfaced by register traffic and triggered operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GpuError {
    /// Wrong width, misaligned or out-of-range register access. State is untouched.
    #[error("unsupported {width}-bit register access @ 0x{addr:08X}")]
    UnsupportedAccess { addr: u32, width: u32 },

    /// A triggered operation was configured in a way the hardware never sees
    /// from working guest software. The operation is aborted before touching memory.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// A physical address did not resolve to backing memory.
    #[error("unmapped physical address 0x{0:08X}")]
    UnmappedAddress(u32),

    /// A computed access ran past the region that was resolved for it.
    #[error("access of {len} bytes at offset 0x{addr:X} is out of bounds")]
    OutOfBounds { addr: usize, len: usize },

    #[error("settings: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, GpuError>;
