//! validate/check — derive the expected header from an image and compare it
//! with the header observed at offset 0.
//!
//! Checks run in order and the first failure wins:
//!   magic -> len >= header size -> len == file size -> crc.
//! The checksum is only computed once the first three checks passed.

use anyhow::{anyhow, Result};
use log::debug;
use serde::Serialize;

use crate::checksum::trx_checksum;
use crate::consts::{FALLBACK_FLAGS_VERS, FALLBACK_OFFSETS, TRX_HDR_SIZE, TRX_MAGIC};
use crate::header::TrxHeader;

/// A recoverable inconsistency between an image and its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// No TRX magic at offset 0.
    NoHeader { expected_magic: u32, found_magic: u32 },
    /// len field smaller than the header itself.
    TooSmall { found_len: u32 },
    /// len field disagrees with the file size.
    LengthMismatch { expected_len: u32, found_len: u32 },
    ChecksumMismatch { expected_crc: u32, found_crc: u32 },
}

/// Which buffer construction fixes a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairKind {
    /// Put a fresh header in front of the whole image.
    NewHeader,
    /// Replace the first 28 bytes of the image.
    Overwrite,
}

impl Finding {
    pub fn repair_kind(&self) -> RepairKind {
        match self {
            Finding::NoHeader { .. } => RepairKind::NewHeader,
            Finding::TooSmall { .. }
            | Finding::LengthMismatch { .. }
            | Finding::ChecksumMismatch { .. } => RepairKind::Overwrite,
        }
    }
}

/// Result of comparing observed and expected headers.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub observed: TrxHeader,
    /// crc stays 0 unless the checksum check was reached.
    pub expected: TrxHeader,
    pub finding: Option<Finding>,
}

impl Inspection {
    pub fn is_valid(&self) -> bool {
        self.finding.is_none()
    }
}

/// Inspect an image without modifying it.
pub fn inspect(buf: &[u8]) -> Result<Inspection> {
    let len = u32::try_from(buf.len())
        .map_err(|_| anyhow!("image of {} bytes exceeds the 32-bit TRX length", buf.len()))?;

    let observed = TrxHeader::decode_padded(buf);

    // Optimistically assume a header exists and carry its opaque words over.
    let expected = TrxHeader {
        magic: TRX_MAGIC,
        len,
        crc: 0,
        flags_vers: observed.flags_vers,
        offsets: observed.offsets,
    };

    let mut ins = Inspection {
        observed,
        expected,
        finding: None,
    };

    if observed.magic != TRX_MAGIC {
        ins.expected.flags_vers = FALLBACK_FLAGS_VERS;
        ins.expected.offsets = FALLBACK_OFFSETS;
        ins.finding = Some(Finding::NoHeader {
            expected_magic: TRX_MAGIC,
            found_magic: observed.magic,
        });
        return Ok(ins);
    }

    if (observed.len as usize) < TRX_HDR_SIZE {
        ins.finding = Some(Finding::TooSmall {
            found_len: observed.len,
        });
        return Ok(ins);
    }

    if observed.len != expected.len {
        ins.finding = Some(Finding::LengthMismatch {
            expected_len: expected.len,
            found_len: observed.len,
        });
        return Ok(ins);
    }

    // observed.len == file size >= header size here, so the range is well formed.
    ins.expected.crc = trx_checksum(buf, len as usize);
    debug!(
        "inspect: len={} crc expected={:08X} found={:08X}",
        len, ins.expected.crc, observed.crc
    );
    if observed.crc != ins.expected.crc {
        ins.finding = Some(Finding::ChecksumMismatch {
            expected_crc: ins.expected.crc,
            found_crc: observed.crc,
        });
    }
    Ok(ins)
}
