//! header — fixed 28-byte TRX header layout (decode/encode only, no validation).

use anyhow::{anyhow, Result};
use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::consts::{
    OFF_CRC, OFF_FLAGS_VERS, OFF_LEN, OFF_MAGIC, OFF_OFFSETS, TRX_HDR_SIZE, TRX_OFFSETS,
};

/// TRX header as stored at the start of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TrxHeader {
    pub magic: u32,
    pub len: u32, // whole file, header included
    pub crc: u32,
    pub flags_vers: u32,
    pub offsets: [u32; TRX_OFFSETS],
}

impl TrxHeader {
    /// Decode the first 28 bytes of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < TRX_HDR_SIZE {
            return Err(anyhow!(
                "buffer too small for TRX header (need {}, got {})",
                TRX_HDR_SIZE,
                buf.len()
            ));
        }
        let mut offsets = [0u32; TRX_OFFSETS];
        for (i, o) in offsets.iter_mut().enumerate() {
            let at = OFF_OFFSETS + i * 4;
            *o = LittleEndian::read_u32(&buf[at..at + 4]);
        }
        Ok(Self {
            magic: LittleEndian::read_u32(&buf[OFF_MAGIC..OFF_MAGIC + 4]),
            len: LittleEndian::read_u32(&buf[OFF_LEN..OFF_LEN + 4]),
            crc: LittleEndian::read_u32(&buf[OFF_CRC..OFF_CRC + 4]),
            flags_vers: LittleEndian::read_u32(&buf[OFF_FLAGS_VERS..OFF_FLAGS_VERS + 4]),
            offsets,
        })
    }

    /// Decode whatever prefix is available; missing bytes read as zero.
    /// Images shorter than a header still get an "observed" header this way.
    pub fn decode_padded(buf: &[u8]) -> Self {
        let mut tmp = [0u8; TRX_HDR_SIZE];
        let n = buf.len().min(TRX_HDR_SIZE);
        tmp[..n].copy_from_slice(&buf[..n]);
        // tmp is exactly TRX_HDR_SIZE, decode cannot fail
        Self::decode(&tmp).unwrap_or_default()
    }

    pub fn encode(&self) -> [u8; TRX_HDR_SIZE] {
        let mut out = [0u8; TRX_HDR_SIZE];
        self.write_into(&mut out);
        out
    }

    /// Write the header over the first 28 bytes of `dst`.
    /// Callers guarantee `dst.len() >= TRX_HDR_SIZE`.
    pub fn write_into(&self, dst: &mut [u8]) {
        LittleEndian::write_u32(&mut dst[OFF_MAGIC..OFF_MAGIC + 4], self.magic);
        LittleEndian::write_u32(&mut dst[OFF_LEN..OFF_LEN + 4], self.len);
        LittleEndian::write_u32(&mut dst[OFF_CRC..OFF_CRC + 4], self.crc);
        LittleEndian::write_u32(&mut dst[OFF_FLAGS_VERS..OFF_FLAGS_VERS + 4], self.flags_vers);
        for (i, o) in self.offsets.iter().enumerate() {
            let at = OFF_OFFSETS + i * 4;
            LittleEndian::write_u32(&mut dst[at..at + 4], *o);
        }
    }
}

/// Patch only the crc field of an encoded header.
pub fn set_crc(buf: &mut [u8], crc: u32) {
    LittleEndian::write_u32(&mut buf[OFF_CRC..OFF_CRC + 4], crc);
}

/// Patch only the len field of an encoded header.
pub fn set_len(buf: &mut [u8], len: u32) {
    LittleEndian::write_u32(&mut buf[OFF_LEN..OFF_LEN + 4], len);
}
