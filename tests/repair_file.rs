// tests/repair_file.rs
//
// End-to-end over the filesystem:
// - image without header -> <file>.trx with a new header, re-validation is clean;
// - existing header with bad len / crc -> rewritten in place in the copy;
// - linksys mode shrinks the len field only;
// - unreadable source -> error, nothing written;
// - unwritable destination -> error, no output and no tmp file left.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use trxutil::consts::{FALLBACK_FLAGS_VERS, FALLBACK_OFFSETS, TRX_MAGIC};
use trxutil::header::{set_crc, set_len};
use trxutil::{checksum, validate_file, Finding, Outcome, TrxBuilder, TrxHeader};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base = std::env::temp_dir();
    base.join(format!("trxtest-{prefix}-{pid}-{t}-{id}"))
}

fn firmware(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 + 7) as u8).collect()
}

fn trx_path(p: &PathBuf) -> PathBuf {
    let mut s = p.as_os_str().to_os_string();
    s.push(".trx");
    PathBuf::from(s)
}

#[test]
fn new_header_written_and_revalidates() -> Result<()> {
    let root = unique_root("newhdr");
    fs::create_dir_all(&root)?;
    let src = root.join("WR1043ND_firmware.bin");
    let body = firmware(1024);
    fs::write(&src, &body)?;

    let cfg = TrxBuilder::from_default().build();
    let rep = validate_file(&src, &cfg)?;
    assert_eq!(rep.outcome, Outcome::RepairedNewHeader);
    assert!(rep.written);

    let out = fs::read(trx_path(&src))?;
    assert_eq!(out.len(), 1052);
    assert_eq!(&out[28..], &body[..]);
    let h = TrxHeader::decode(&out)?;
    assert_eq!(h.magic, TRX_MAGIC);
    assert_eq!(h.len, 1052);
    assert_eq!(h.flags_vers, FALLBACK_FLAGS_VERS);
    assert_eq!(h.offsets, FALLBACK_OFFSETS);
    assert_eq!(h.crc, checksum(&out[12..]));

    // source untouched
    assert_eq!(fs::read(&src)?, body);

    // the repaired image needs no further repair
    let again = validate_file(&trx_path(&src), &cfg)?;
    assert_eq!(again.outcome, Outcome::Valid);
    assert!(!again.written);
    assert!(!trx_path(&trx_path(&src)).exists());
    Ok(())
}

#[test]
fn wrong_len_and_crc_are_overwritten() -> Result<()> {
    let root = unique_root("overwrite");
    fs::create_dir_all(&root)?;
    let cfg = TrxBuilder::from_default().build();

    // build a valid image first
    let src = root.join("fw.bin");
    fs::write(&src, firmware(500))?;
    validate_file(&src, &cfg)?;
    let good = fs::read(trx_path(&src))?;
    let flags = TrxHeader::decode(&good)?.flags_vers;

    // len wrong
    let bad_len = root.join("bad_len.bin");
    let mut img = good.clone();
    set_len(&mut img, 4096);
    fs::write(&bad_len, &img)?;
    let rep = validate_file(&bad_len, &cfg)?;
    assert_eq!(
        rep.finding,
        Some(Finding::LengthMismatch { expected_len: 528, found_len: 4096 })
    );
    assert_eq!(rep.outcome, Outcome::RepairedOverwrite);
    assert_eq!(fs::read(trx_path(&bad_len))?, good);

    // crc wrong
    let bad_crc = root.join("bad_crc.bin");
    let mut img = good.clone();
    set_crc(&mut img, 0x1234_5678);
    fs::write(&bad_crc, &img)?;
    let rep = validate_file(&bad_crc, &cfg)?;
    assert!(matches!(rep.finding, Some(Finding::ChecksumMismatch { found_crc: 0x1234_5678, .. })));
    let fixed = fs::read(trx_path(&bad_crc))?;
    assert_eq!(fixed, good);
    assert_eq!(TrxHeader::decode(&fixed)?.flags_vers, flags);
    Ok(())
}

#[test]
fn linksys_len_is_978_short() -> Result<()> {
    let root = unique_root("linksys");
    fs::create_dir_all(&root)?;
    let plain = TrxBuilder::from_default().build();
    let linksys = TrxBuilder::from_default().linksys(true).build();

    let src = root.join("fw.bin");
    fs::write(&src, firmware(8000))?;
    validate_file(&src, &plain)?;
    let mut img = fs::read(trx_path(&src))?;
    set_len(&mut img, 100);

    let a = root.join("a.bin");
    let b = root.join("b.bin");
    fs::write(&a, &img)?;
    fs::write(&b, &img)?;
    validate_file(&a, &plain)?;
    validate_file(&b, &linksys)?;

    let out_a = fs::read(trx_path(&a))?;
    let out_b = fs::read(trx_path(&b))?;
    assert_eq!(out_a.len(), out_b.len());
    let ha = TrxHeader::decode(&out_a)?;
    let hb = TrxHeader::decode(&out_b)?;
    assert_eq!(ha.len - hb.len, 978);
    assert_eq!(hb.crc, checksum(&out_b[12..hb.len as usize]));
    assert_eq!(&out_a[28..], &out_b[28..]);
    Ok(())
}

#[test]
fn missing_source_is_an_error() -> Result<()> {
    let root = unique_root("missing");
    fs::create_dir_all(&root)?;
    let src = root.join("nope.bin");
    let cfg = TrxBuilder::from_default().build();
    let err = validate_file(&src, &cfg).unwrap_err();
    assert!(format!("{:#}", err).contains("nope.bin"));
    assert!(!trx_path(&src).exists());
    Ok(())
}

#[test]
fn custom_out_path_and_dry_run() -> Result<()> {
    let root = unique_root("out");
    fs::create_dir_all(&root)?;
    let src = root.join("fw.bin");
    fs::write(&src, firmware(64))?;

    let dry = TrxBuilder::from_default().dry_run(true).build();
    let rep = validate_file(&src, &dry)?;
    assert_eq!(rep.outcome, Outcome::RepairedNewHeader);
    assert!(!rep.written);
    assert!(!trx_path(&src).exists());

    let target = root.join("custom.img");
    let cfg = TrxBuilder::from_default().out_path(&target).build();
    let rep = validate_file(&src, &cfg)?;
    assert_eq!(rep.output.as_deref(), Some(target.as_path()));
    assert_eq!(fs::read(&target)?.len(), 92);
    Ok(())
}

fn tmp_path(p: &PathBuf) -> PathBuf {
    let mut s = p.as_os_str().to_os_string();
    s.push(".tmp");
    PathBuf::from(s)
}

#[test]
fn unwritable_output_dir_is_an_error() -> Result<()> {
    let root = unique_root("nodir");
    fs::create_dir_all(&root)?;
    let src = root.join("fw.bin");
    fs::write(&src, firmware(64))?;

    let target = root.join("missing").join("fw.trx");
    let cfg = TrxBuilder::from_default().out_path(&target).build();
    let err = validate_file(&src, &cfg).unwrap_err();
    assert!(format!("{:#}", err).contains("missing"));
    assert!(!target.exists());
    assert!(!tmp_path(&target).exists());
    Ok(())
}

#[test]
fn failed_rename_leaves_no_tmp() -> Result<()> {
    let root = unique_root("isdir");
    fs::create_dir_all(&root)?;
    let src = root.join("fw.bin");
    fs::write(&src, firmware(64))?;

    // an existing directory cannot be replaced by the output file
    let target = root.join("outdir");
    fs::create_dir_all(&target)?;
    let cfg = TrxBuilder::from_default().out_path(&target).build();
    let err = validate_file(&src, &cfg).unwrap_err();
    assert!(format!("{:#}", err).contains("outdir"));
    assert!(target.is_dir());
    assert!(!tmp_path(&target).exists());
    Ok(())
}
