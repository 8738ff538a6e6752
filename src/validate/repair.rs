//! validate/repair — build the corrected image for a finding.
//!
//! Both variants consume the source buffer and return a freshly owned output:
//! - NewHeader: [expected header][whole source image], len grows by 28.
//! - Overwrite: source image with its first 28 bytes replaced. Images shorter than a
//!   header are zero-extended to 28 bytes first. In linksys mode the len field is
//!   reduced by `len_adjust`, the output keeps its real size.
//!
//! In both cases the crc is recomputed over [12 .. len) of the output and stored into
//! the output and into `expected`.

use anyhow::{anyhow, Result};
use log::debug;

use crate::checksum::trx_checksum;
use crate::consts::TRX_HDR_SIZE;
use crate::header::{set_crc, set_len, TrxHeader};

use super::check::RepairKind;

pub fn repair(
    kind: RepairKind,
    src: Vec<u8>,
    expected: &mut TrxHeader,
    len_adjust: u32,
) -> Result<Vec<u8>> {
    match kind {
        RepairKind::NewHeader => prepend_header(src, expected),
        RepairKind::Overwrite => overwrite_header(src, expected, len_adjust),
    }
}

pub fn prepend_header(src: Vec<u8>, expected: &mut TrxHeader) -> Result<Vec<u8>> {
    expected.len = expected
        .len
        .checked_add(TRX_HDR_SIZE as u32)
        .ok_or_else(|| anyhow!("image too large to prepend a TRX header ({} bytes)", src.len()))?;

    let mut out = Vec::with_capacity(TRX_HDR_SIZE + src.len());
    out.extend_from_slice(&expected.encode());
    out.extend_from_slice(&src);
    drop(src);

    let crc = trx_checksum(&out, expected.len as usize);
    set_crc(&mut out, crc);
    expected.crc = crc;
    debug!(
        "prepend_header: len={} crc={:08X} out={} bytes",
        expected.len,
        crc,
        out.len()
    );
    Ok(out)
}

pub fn overwrite_header(
    src: Vec<u8>,
    expected: &mut TrxHeader,
    len_adjust: u32,
) -> Result<Vec<u8>> {
    let mut out = src;
    if out.len() < TRX_HDR_SIZE {
        out.resize(TRX_HDR_SIZE, 0);
        expected.len = TRX_HDR_SIZE as u32;
    }
    expected.write_into(&mut out[..TRX_HDR_SIZE]);

    if len_adjust != 0 {
        expected.len = expected.len.saturating_sub(len_adjust);
        set_len(&mut out, expected.len);
    }

    let crc = trx_checksum(&out, expected.len as usize);
    set_crc(&mut out, crc);
    expected.crc = crc;
    debug!(
        "overwrite_header: len={} (adjust {}) crc={:08X} out={} bytes",
        expected.len,
        len_adjust,
        crc,
        out.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::checksum;
    use crate::consts::{FALLBACK_FLAGS_VERS, FALLBACK_OFFSETS, TRX_MAGIC};

    fn expected_for(len: u32) -> TrxHeader {
        TrxHeader {
            magic: TRX_MAGIC,
            len,
            crc: 0,
            flags_vers: FALLBACK_FLAGS_VERS,
            offsets: FALLBACK_OFFSETS,
        }
    }

    #[test]
    fn prepend_keeps_source_intact() {
        let src: Vec<u8> = (0..100u8).collect();
        let mut exp = expected_for(100);
        let out = prepend_header(src.clone(), &mut exp).unwrap();
        assert_eq!(out.len(), 128);
        assert_eq!(&out[28..], &src[..]);
        assert_eq!(exp.len, 128);
        assert_eq!(exp.crc, checksum(&out[12..]));
        assert_eq!(TrxHeader::decode(&out).unwrap(), exp);
    }

    #[test]
    fn overwrite_replaces_prefix_only() {
        let src = vec![0xEEu8; 64];
        let mut exp = expected_for(64);
        let out = overwrite_header(src, &mut exp, 0).unwrap();
        assert_eq!(out.len(), 64);
        assert!(out[28..].iter().all(|&b| b == 0xEE));
        assert_eq!(TrxHeader::decode(&out).unwrap(), exp);
        assert_eq!(exp.crc, checksum(&out[12..64]));
    }

    #[test]
    fn overwrite_with_adjust_shrinks_len_not_output() {
        let src = vec![0x11u8; 2048];
        let mut exp = expected_for(2048);
        let out = overwrite_header(src, &mut exp, 978).unwrap();
        assert_eq!(out.len(), 2048);
        let h = TrxHeader::decode(&out).unwrap();
        assert_eq!(h.len, 2048 - 978);
        assert_eq!(h.crc, checksum(&out[12..2048 - 978]));
        assert_eq!(h, exp);
    }

    #[test]
    fn overwrite_extends_short_images() {
        let mut exp = expected_for(5);
        let out = overwrite_header(b"HDR0\x01".to_vec(), &mut exp, 0).unwrap();
        assert_eq!(out.len(), TRX_HDR_SIZE);
        assert_eq!(exp.len, TRX_HDR_SIZE as u32);
        assert_eq!(exp.crc, checksum(&out[12..28]));
    }

    #[test]
    fn adjust_larger_than_image_saturates() {
        let mut exp = expected_for(100);
        let out = overwrite_header(vec![0u8; 100], &mut exp, 978).unwrap();
        assert_eq!(exp.len, 0);
        assert_eq!(exp.crc, 0xFFFF_FFFF);
        assert_eq!(out.len(), 100);
    }
}
