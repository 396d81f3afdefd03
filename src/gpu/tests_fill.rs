use super::test_utils::*;
use super::*;
use crate::interrupt::InterruptId;
use crate::memory::VRAM_PADDR;
use proptest::prelude::*;

fn setup_fill(h: &mut Harness, engine: FillEngine, start: u32, end: u32, value: u32) {
    let base = engine.base();
    h.write(base + FILL_ADDRESS_START, start / 8).unwrap();
    h.write(base + FILL_ADDRESS_END, end / 8).unwrap();
    h.write(base + FILL_VALUE, value).unwrap();
}

#[test]
fn test_fill_32bit() {
    let mut h = Harness::new();
    let start = VRAM_PADDR + 0x1000;
    setup_fill(&mut h, FillEngine::Psc0, start, start + 400, 0x11223344);
    h.write(REG_MEMORY_FILL[0] + FILL_CONTROL, FILL_TRIGGER | FILL_32BIT)
        .unwrap();

    let bytes = h.bytes(start, 404);
    for (i, chunk) in bytes[..400].chunks(4).enumerate() {
        assert_eq!(chunk, [0x44, 0x33, 0x22, 0x11], "Mismatch at word {}", i);
    }
    assert_eq!(&bytes[400..], [0, 0, 0, 0], "Should stop at end address");

    let control = h.read(REG_MEMORY_FILL[0] + FILL_CONTROL);
    assert_eq!(control & FILL_TRIGGER, 0);
    assert_ne!(control & FILL_FINISHED, 0);
    assert_ne!(control & FILL_32BIT, 0);
    assert_eq!(h.interrupts.signalled(), vec![InterruptId::Psc0]);
}

#[test]
fn test_fill_24bit() {
    let mut h = Harness::new();
    let start = VRAM_PADDR;
    setup_fill(&mut h, FillEngine::Psc0, start, start + 24, 0x00AABBCC);
    h.write(REG_MEMORY_FILL[0] + FILL_CONTROL, FILL_TRIGGER | FILL_24BIT)
        .unwrap();

    let bytes = h.bytes(start, 24);
    for chunk in bytes.chunks(3) {
        assert_eq!(chunk, [0xCC, 0xBB, 0xAA]);
    }
}

#[test]
fn test_fill_16bit() {
    let mut h = Harness::new();
    let start = VRAM_PADDR + 0x80;
    setup_fill(&mut h, FillEngine::Psc1, start, start + 16, 0xFFFF_1234);
    h.write(REG_MEMORY_FILL[1] + FILL_CONTROL, FILL_TRIGGER).unwrap();

    let bytes = h.bytes(start, 16);
    for chunk in bytes.chunks(2) {
        assert_eq!(chunk, [0x34, 0x12]);
    }
    assert_eq!(h.interrupts.signalled(), vec![InterruptId::Psc1]);
}

#[test]
fn test_fill_24bit_pattern_truncated_at_end() {
    let mut h = Harness::new();
    let start = VRAM_PADDR;
    // 16 bytes is not a multiple of 3: the last pattern is cut short.
    setup_fill(&mut h, FillEngine::Psc0, start, start + 16, 0x00030201);
    h.write(REG_MEMORY_FILL[0] + FILL_CONTROL, FILL_TRIGGER | FILL_24BIT)
        .unwrap();
    let bytes = h.bytes(start, 17);
    assert_eq!(&bytes[15..], [0x01, 0x00]);
}

#[test]
fn test_fill_zero_start_still_completes() {
    let mut h = Harness::new();
    setup_fill(&mut h, FillEngine::Psc0, 0, VRAM_PADDR + 0x100, 0xFFFFFFFF);
    h.write(REG_MEMORY_FILL[0] + FILL_CONTROL, FILL_TRIGGER | FILL_32BIT)
        .unwrap();

    assert!(h.bytes(VRAM_PADDR, 0x100).iter().all(|&b| b == 0));
    assert!(h.rasterizer.calls.is_empty());
    assert_ne!(h.read(REG_MEMORY_FILL[0] + FILL_CONTROL) & FILL_FINISHED, 0);
    assert_eq!(h.interrupts.signalled(), vec![InterruptId::Psc0]);
}

#[test]
fn test_fill_end_before_start_writes_nothing() {
    let mut h = Harness::new();
    let start = VRAM_PADDR + 0x100;
    setup_fill(&mut h, FillEngine::Psc0, start, start - 0x40, 0xFFFFFFFF);
    h.write(REG_MEMORY_FILL[0] + FILL_CONTROL, FILL_TRIGGER | FILL_32BIT)
        .unwrap();

    assert!(h.bytes(VRAM_PADDR, 0x200).iter().all(|&b| b == 0));
    assert_eq!(h.interrupts.signalled(), vec![InterruptId::Psc0]);
}

#[test]
fn test_fill_without_trigger_is_storage_only() {
    let mut h = Harness::new();
    let start = VRAM_PADDR;
    setup_fill(&mut h, FillEngine::Psc0, start, start + 8, 0xFFFFFFFF);
    h.write(REG_MEMORY_FILL[0] + FILL_CONTROL, FILL_32BIT).unwrap();

    assert!(h.bytes(start, 8).iter().all(|&b| b == 0));
    assert!(h.interrupts.signalled().is_empty());
    assert_eq!(h.read(REG_MEMORY_FILL[0] + FILL_CONTROL), FILL_32BIT);
}

#[test]
fn test_fill_accelerated_skips_software_path() {
    let mut h = Harness::new();
    h.rasterizer.accept_fill = true;
    let start = VRAM_PADDR;
    setup_fill(&mut h, FillEngine::Psc0, start, start + 64, 0xFFFFFFFF);
    h.write(REG_MEMORY_FILL[0] + FILL_CONTROL, FILL_TRIGGER | FILL_32BIT)
        .unwrap();

    assert!(h.bytes(start, 64).iter().all(|&b| b == 0));
    assert_eq!(h.rasterizer.calls, vec![RasterizerCall::AccelerateFill]);
    // Completion is reported either way.
    assert_ne!(h.read(REG_MEMORY_FILL[0] + FILL_CONTROL) & FILL_FINISHED, 0);
    assert_eq!(h.interrupts.signalled(), vec![InterruptId::Psc0]);
}

#[test]
fn test_fill_invalidates_before_writing() {
    let mut h = Harness::new();
    let start = VRAM_PADDR + 0x40;
    setup_fill(&mut h, FillEngine::Psc0, start, start + 0x80, 0);
    h.write(REG_MEMORY_FILL[0] + FILL_CONTROL, FILL_TRIGGER).unwrap();

    assert_eq!(
        h.rasterizer.calls,
        vec![
            RasterizerCall::AccelerateFill,
            RasterizerCall::FlushAndInvalidate(start, 0x80)
        ]
    );
}

#[test]
fn test_fill_unmapped_range() {
    let mut h = Harness::new();
    let start = VRAM_PADDR + TEST_VRAM_SIZE as u32 - 8;
    setup_fill(&mut h, FillEngine::Psc0, start, start + 16, 0);
    let err = h
        .write(REG_MEMORY_FILL[0] + FILL_CONTROL, FILL_TRIGGER)
        .unwrap_err();
    assert_eq!(err, GpuError::UnmappedAddress(start));
    assert!(h.interrupts.signalled().is_empty());
    assert_ne!(h.read(REG_MEMORY_FILL[0] + FILL_CONTROL) & FILL_TRIGGER, 0);
}

#[test]
fn test_fill_engines_are_independent() {
    let mut h = Harness::new();
    setup_fill(&mut h, FillEngine::Psc0, VRAM_PADDR, VRAM_PADDR + 8, 0xAAAAAAAA);
    setup_fill(&mut h, FillEngine::Psc1, VRAM_PADDR + 8, VRAM_PADDR + 16, 0xBBBBBBBB);
    h.write(REG_MEMORY_FILL[1] + FILL_CONTROL, FILL_TRIGGER | FILL_32BIT)
        .unwrap();

    assert_eq!(h.bytes(VRAM_PADDR, 8), vec![0; 8]);
    assert_eq!(h.bytes(VRAM_PADDR + 8, 8), vec![0xBB; 8]);
    assert_eq!(h.read(REG_MEMORY_FILL[0] + FILL_CONTROL), 0);
}

#[test]
fn test_memory_fill_called_directly() {
    let mut h = Harness::new();
    setup_fill(&mut h, FillEngine::Psc1, VRAM_PADDR, VRAM_PADDR + 8, 0xCCCCCCCC);
    // Raise the trigger without going through the write path.
    h.gpu.regs.set(FillEngine::Psc1.base() + FILL_CONTROL, FILL_TRIGGER | FILL_32BIT);

    let mut bus = GpuBus {
        memory: &mut h.memory,
        rasterizer: &mut h.rasterizer,
        interrupts: &mut h.interrupts,
        command_processor: &mut h.command_lists,
        tracer: None,
    };
    h.gpu.memory_fill(FillEngine::Psc1, &mut bus).unwrap();
    h.gpu.memory_fill(FillEngine::Psc0, &mut bus).unwrap();

    assert_eq!(h.bytes(VRAM_PADDR, 8), vec![0xCC; 8]);
    assert_eq!(h.interrupts.signalled(), vec![InterruptId::Psc1]);
    assert!(h.gpu.regs.memory_fill_config(FillEngine::Psc1).finished());
}

proptest! {
    /// Every byte inside [start, end) matches the pattern and nothing outside changes.
    #[test]
    fn fill_covers_exact_range(
        start_units in 1u32..0x100,
        len_units in 0u32..0x40,
        value in any::<u32>(),
        mode in 0u32..3,
    ) {
        let mut h = Harness::new();
        let start = VRAM_PADDR + start_units * 8;
        let end = start + len_units * 8;
        h.load(VRAM_PADDR, &[0x5A; 0x1200]);
        setup_fill(&mut h, FillEngine::Psc0, start, end, value);
        let flags = [0, FILL_24BIT, FILL_32BIT][mode as usize];
        h.write(REG_MEMORY_FILL[0] + FILL_CONTROL, FILL_TRIGGER | flags).unwrap();

        let pattern = h.gpu.regs.memory_fill_config(FillEngine::Psc0).pattern();
        let bytes = h.bytes(VRAM_PADDR, 0x1200);
        for (i, &b) in bytes.iter().enumerate() {
            let addr = VRAM_PADDR + i as u32;
            if addr >= start && addr < end {
                let k = (addr - start) as usize % pattern.len();
                prop_assert_eq!(b, pattern[k]);
            } else {
                prop_assert_eq!(b, 0x5A);
            }
        }
    }
}
