#![no_main]
use libfuzzer_sys::fuzz_target;
use ctrgpu::gpu::{AccessWidth, GPU_PADDR};
use ctrgpu::{Collaborators, Settings, System};

fuzz_target!(|data: &[u8]| {
    let settings = Settings {
        vram_size: 0x1_0000,
        fcram_size: 0x1_0000,
        ..Default::default()
    };
    let mut system = System::init(settings, Collaborators::default());

    // Each 7-byte record: width selector, 2-byte register offset, 4-byte value
    for chunk in data.chunks_exact(7) {
        let width = match chunk[0] & 3 {
            0 => AccessWidth::Byte,
            1 => AccessWidth::Half,
            2 => AccessWidth::Word,
            _ => AccessWidth::Double,
        };
        let offset = u16::from_le_bytes([chunk[1], chunk[2]]) as u32;
        let value = u32::from_le_bytes([chunk[3], chunk[4], chunk[5], chunk[6]]);

        // Errors are expected; panics are not.
        let _ = system.write(GPU_PADDR + offset, width, value as u64);
        let _ = system.read(GPU_PADDR + offset, width);
    }

    system.run_cycles(u64::from(data.len() as u32) * 1_000_000);
});
