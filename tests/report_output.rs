// tests/report_output.rs
//
// Text and JSON rendering of a pass.

use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use trxutil::{validate_and_repair, MemWriter, TrxBuilder};

#[test]
fn json_report_fields() -> Result<()> {
    let cfg = TrxBuilder::from_default().dry_run(true).build();
    let mut w = MemWriter::new();
    let rep = validate_and_repair(vec![0xABu8; 100], Path::new("fw.bin"), &cfg, &mut w)?;

    let v: Value = serde_json::from_str(&rep.to_json()?)?;
    assert_eq!(v["outcome"], "repaired_new_header");
    assert_eq!(v["finding"]["kind"], "no_header");
    assert_eq!(v["finding"]["found_magic"], 0xABAB_ABABu64);
    assert_eq!(v["expected"]["len"], 128);
    assert_eq!(v["expected"]["offsets"][0], 0x1C);
    assert_eq!(v["output"], "fw.bin.trx");
    assert_eq!(v["written"], false);
    Ok(())
}

#[test]
fn text_report_matches_checks() -> Result<()> {
    let cfg = TrxBuilder::from_default().build();
    let mut w = MemWriter::new();
    let rep = validate_and_repair(vec![0u8; 40], Path::new("a"), &cfg, &mut w)?;
    let text = rep.render_text();
    assert!(text.contains("TRX header not found."));
    assert!(text.contains("Magic expected: 30524448"));
    assert!(text.contains("Wrote revised binary with TRX header to a.trx"));
    assert!(text.contains("Outcome: repaired_new_header (exit 2)"));

    let fixed = w.get(Path::new("a.trx")).expect("written").to_vec();
    let rep = validate_and_repair(fixed, Path::new("a.trx"), &cfg, &mut MemWriter::new())?;
    let text = rep.render_text();
    assert!(text.contains("TRX header found: 30524448"));
    assert!(text.contains("TRX file length: 68"));
    assert!(text.contains("TRX header is valid!"));
    assert!(text.contains("Outcome: valid (exit 0)"));
    assert_eq!(rep.outcome.to_string(), "valid");
    assert!(rep.render_header().contains("flags_vers = 0x00010000"));
    Ok(())
}
