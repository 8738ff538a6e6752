//! Format constants of the TRX container header.
//!
//! Layout (28 bytes, all fields u32 LE):
//! [magic][len][crc][flags_vers][offsets[0]][offsets[1]][offsets[2]]
//!
//! - len counts the whole file including the header.
//! - crc covers [OFF_FLAGS_VERS .. len).

// -------- Header --------
/// "HDR0" read as a little-endian u32.
pub const TRX_MAGIC: u32 = 0x3052_4448;
pub const TRX_HDR_SIZE: usize = 28;
pub const TRX_OFFSETS: usize = 3;

pub const OFF_MAGIC: usize = 0;
pub const OFF_LEN: usize = 4;
pub const OFF_CRC: usize = 8;
pub const OFF_FLAGS_VERS: usize = 12;
pub const OFF_OFFSETS: usize = 16;

/// First byte covered by the checksum.
pub const CRC_START: usize = OFF_FLAGS_VERS;

// -------- Fallback header words --------
// Written when an image has no header at all. Legacy defaults with no known
// derivation; keep them verbatim.
pub const FALLBACK_FLAGS_VERS: u32 = 0x0001_0000;
pub const FALLBACK_OFFSETS: [u32; TRX_OFFSETS] = [0x0000_001C, 0x0000_0930, 0x001D_DD0C];

// -------- Linksys mode --------
/// Bytes subtracted from the length field by the overwrite repair in linksys mode.
pub const LINKSYS_LEN_ADJUST: u32 = 978;
/// Value stated by the original tool's usage text for the same feature.
/// Disagrees with LINKSYS_LEN_ADJUST; kept for reference until the right one is confirmed.
pub const LINKSYS_LEN_ADJUST_DOCUMENTED: u32 = 932;

// -------- Output --------
pub const TRX_OUT_SUFFIX: &str = ".trx";

// -------- Exit codes --------
pub const EXIT_VALID: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_REPAIRED_NEW_HEADER: i32 = 2;
pub const EXIT_REPAIRED_OVERWRITE: i32 = 3;
