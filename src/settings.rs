//! Session settings
//!
//! Loaded from a JSON file. Missing fields take their defaults, so `{}` is a
//! valid settings file.

use crate::error::{GpuError, Result};
use crate::memory::{FCRAM_SIZE, VRAM_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where memory fills and display transfers are offered first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccelerationMode {
    /// Always take the software path.
    Software,
    /// Offer every operation to the host rasterizer first.
    Hardware,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// 0 renders every frame; N renders frames where `frame_count & N == 0`.
    #[serde(default)]
    pub frame_skip: u32,

    #[serde(default = "default_acceleration")]
    pub acceleration: AccelerationMode,

    /// FCRAM bytes to back, starting at the FCRAM base address.
    #[serde(default = "default_fcram_size")]
    pub fcram_size: usize,

    #[serde(default = "default_vram_size")]
    pub vram_size: usize,

    /// Log every register write and consumed memory range at trace level.
    #[serde(default)]
    pub trace_registers: bool,
}

fn default_acceleration() -> AccelerationMode {
    AccelerationMode::Hardware
}

fn default_fcram_size() -> usize {
    FCRAM_SIZE
}

fn default_vram_size() -> usize {
    VRAM_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_skip: 0,
            acceleration: default_acceleration(),
            fcram_size: default_fcram_size(),
            vram_size: default_vram_size(),
            trace_registers: false,
        }
    }
}

impl Settings {
    pub fn parse(json: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| GpuError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| GpuError::Settings(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Save settings to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content =
            serde_json::to_string_pretty(self).map_err(|e| GpuError::Settings(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| GpuError::Settings(format!("{}: {}", path.display(), e)))
    }

    fn validate(&self) -> Result<()> {
        if self.vram_size > VRAM_SIZE {
            return Err(GpuError::Settings(format!(
                "vram_size 0x{:X} exceeds the 0x{:X}-byte VRAM window",
                self.vram_size, VRAM_SIZE
            )));
        }
        if self.fcram_size > FCRAM_SIZE {
            return Err(GpuError::Settings(format!(
                "fcram_size 0x{:X} exceeds the 0x{:X}-byte FCRAM window",
                self.fcram_size, FCRAM_SIZE
            )));
        }
        Ok(())
    }
}
