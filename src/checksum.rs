//! checksum — table-driven reflected CRC-32 as used by TRX headers.
//!
//! Same polynomial and init as the common CRC-32 (0xEDB88320, 0xFFFFFFFF), but the
//! final complement is NOT applied. Images produced by existing TRX tooling depend on
//! this, so the value here equals `!crc32(data)` of a standard implementation.
//!
//! The lookup table is built on first use and shared by every caller in the process.

use std::sync::OnceLock;

/// Reversed CRC-32 polynomial.
pub const POLYNOMIAL: u32 = 0xEDB8_8320;

const INIT: u32 = 0xFFFF_FFFF;

fn table() -> &'static [u32; 256] {
    static TABLE: OnceLock<[u32; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0u32; 256];
        for (n, slot) in table.iter_mut().enumerate() {
            let mut c = n as u32;
            for _ in 0..8 {
                c = if c & 1 != 0 { POLYNOMIAL ^ (c >> 1) } else { c >> 1 };
            }
            *slot = c;
        }
        table
    })
}

/// Incremental form, for callers that feed the covered range in pieces.
#[derive(Debug, Clone)]
pub struct Hasher {
    acc: u32,
}

impl Hasher {
    pub fn new() -> Self {
        Self { acc: INIT }
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        let t = table();
        let mut acc = self.acc;
        for &b in data {
            acc = t[((acc ^ b as u32) & 0xFF) as usize] ^ (acc >> 8);
        }
        self.acc = acc;
    }

    /// Current accumulator. No final complement.
    pub fn finalize(&self) -> u32 {
        self.acc
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Checksum over the whole slice.
pub fn checksum(data: &[u8]) -> u32 {
    let mut h = Hasher::new();
    h.update(data);
    h.finalize()
}

/// Checksum over the region a TRX header covers: [CRC_START .. len).
/// `len` is clamped to the buffer; an empty or inverted range yields the initial
/// accumulator instead of touching memory.
pub fn trx_checksum(buf: &[u8], len: usize) -> u32 {
    let end = len.min(buf.len());
    let start = crate::consts::CRC_START;
    if end <= start {
        return INIT;
    }
    checksum(&buf[start..end])
}
