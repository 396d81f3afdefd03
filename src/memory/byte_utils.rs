//! Helper functions for byte manipulation.
//!
//! The ARM11 side of the console is little-endian, so every helper here uses
//! little-endian byte order.

/// Join two bytes into a 16-bit halfword (Little Endian)
#[inline(always)]
pub fn join_u16(low: u8, high: u8) -> u16 {
    u16::from_le_bytes([low, high])
}

/// Split a 16-bit halfword into (low, high) bytes
#[inline(always)]
pub fn split_u16(half: u16) -> (u8, u8) {
    let bytes = half.to_le_bytes();
    (bytes[0], bytes[1])
}

/// Read a 32-bit word from the first four bytes of `bytes`
#[inline(always)]
pub fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Write a 32-bit word into the first four bytes of `bytes`
#[inline(always)]
pub fn write_u32(bytes: &mut [u8], value: u32) {
    bytes[..4].copy_from_slice(&value.to_le_bytes());
}

/// Reinterpret a byte buffer as a list of 32-bit words. A trailing partial
/// word is dropped.
pub fn words_from_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes.chunks_exact(4).map(read_u32).collect()
}

/// Fill `dst` by repeating `pattern`; the final repetition is truncated if
/// `dst.len()` is not a multiple of the pattern length.
pub fn fill_pattern(dst: &mut [u8], pattern: &[u8]) {
    if pattern.is_empty() {
        return;
    }
    for chunk in dst.chunks_mut(pattern.len()) {
        chunk.copy_from_slice(&pattern[..chunk.len()]);
    }
}
