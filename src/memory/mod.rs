//! Physical memory as seen by the display controller.
//!
//! The engines never hold on to memory between calls; they resolve a
//! physical address range to a slice through [`PhysicalMemory`] each time a
//! trigger fires. `None` means the range is not backed by any region.
//!
//! ## Physical Memory Map (subset)
//!
//! | Address Range           | Size   | Description |
//! |:------------------------|:-------|:------------|
//! | 0x18000000-0x185FFFFF   | 6 MB   | VRAM        |
//! | 0x20000000-0x27FFFFFF   | 128 MB | FCRAM       |

pub mod byte_utils;

pub const VRAM_PADDR: u32 = 0x1800_0000;
pub const VRAM_SIZE: usize = 0x0060_0000;
pub const FCRAM_PADDR: u32 = 0x2000_0000;
pub const FCRAM_SIZE: usize = 0x0800_0000;

/// Resolves physical addresses to backing bytes.
pub trait PhysicalMemory {
    fn physical(&self, addr: u32, len: usize) -> Option<&[u8]>;
    fn physical_mut(&mut self, addr: u32, len: usize) -> Option<&mut [u8]>;
}

#[derive(Debug)]
struct Region {
    base: u32,
    data: Box<[u8]>,
}

impl Region {
    fn offset_of(&self, addr: u32, len: usize) -> Option<usize> {
        let offset = addr.checked_sub(self.base)? as usize;
        let end = offset.checked_add(len)?;
        (end <= self.data.len()).then_some(offset)
    }
}

/// A set of non-overlapping RAM regions owned by the emulation session.
#[derive(Debug, Default)]
pub struct MemoryMap {
    regions: Vec<Region>,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// VRAM plus an FCRAM window of `fcram_size` bytes.
    pub fn with_console_layout(vram_size: usize, fcram_size: usize) -> Self {
        let mut map = Self::new();
        map.add_region(VRAM_PADDR, vram_size);
        map.add_region(FCRAM_PADDR, fcram_size);
        map
    }

    /// Map `size` zeroed bytes at `base`.
    pub fn add_region(&mut self, base: u32, size: usize) {
        self.regions.push(Region {
            base,
            data: vec![0; size].into_boxed_slice(),
        });
    }

    pub fn read_u32(&self, addr: u32) -> Option<u32> {
        self.physical(addr, 4).map(byte_utils::read_u32)
    }

    pub fn write_u32(&mut self, addr: u32, value: u32) -> bool {
        match self.physical_mut(addr, 4) {
            Some(bytes) => {
                byte_utils::write_u32(bytes, value);
                true
            }
            None => false,
        }
    }

    /// Copy `data` into memory at `addr`. Returns false if the range is unmapped.
    pub fn load(&mut self, addr: u32, data: &[u8]) -> bool {
        match self.physical_mut(addr, data.len()) {
            Some(dst) => {
                dst.copy_from_slice(data);
                true
            }
            None => false,
        }
    }
}

impl PhysicalMemory for MemoryMap {
    fn physical(&self, addr: u32, len: usize) -> Option<&[u8]> {
        self.regions.iter().find_map(|r| {
            r.offset_of(addr, len)
                .map(|offset| &r.data[offset..offset + len])
        })
    }

    fn physical_mut(&mut self, addr: u32, len: usize) -> Option<&mut [u8]> {
        self.regions.iter_mut().find_map(|r| {
            r.offset_of(addr, len)
                .map(|offset| &mut r.data[offset..offset + len])
        })
    }
}
