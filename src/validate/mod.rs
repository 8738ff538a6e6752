//! validate — one validation pass over a TRX image.
//!
//! inspect (check.rs) decides whether the image is consistent; on the first finding
//! repair.rs builds the corrected image and it is handed to an `ImageWriter`.
//! A pass writes at most once and never retries.

pub mod check;
pub mod repair;

pub use check::{inspect, Finding, Inspection, RepairKind};
pub use repair::{overwrite_header, prepend_header, repair};

use anyhow::Result;
use log::{info, warn};
use std::path::Path;

use crate::config::TrxConfig;
use crate::image::{read_image, FsWriter, ImageWriter};
use crate::report::{Outcome, Report};

/// Validate `buf` (the contents of `source`) and, on a finding, write the repaired
/// image to the configured output path unless `cfg.dry_run` is set.
pub fn validate_and_repair<W: ImageWriter + ?Sized>(
    buf: Vec<u8>,
    source: &Path,
    cfg: &TrxConfig,
    writer: &mut W,
) -> Result<Report> {
    let size = buf.len();
    let ins = inspect(&buf)?;
    let outcome = Outcome::from_finding(ins.finding.as_ref());

    let mut report = Report {
        source: source.to_path_buf(),
        size,
        outcome,
        finding: ins.finding,
        observed: ins.observed,
        expected: ins.expected,
        output: None,
        output_len: None,
        written: false,
        linksys_adjust: 0,
    };

    let finding = match ins.finding {
        None => {
            info!("{}: TRX header is valid", source.display());
            return Ok(report);
        }
        Some(f) => f,
    };
    warn!("{}: {:?}", source.display(), finding);

    let kind = finding.repair_kind();
    let len_adjust = match kind {
        RepairKind::Overwrite => cfg.len_adjust(),
        RepairKind::NewHeader => 0,
    };
    let out_path = cfg.output_path(source);
    let mut expected = ins.expected;
    let out = repair(kind, buf, &mut expected, len_adjust)?;

    report.expected = expected;
    report.linksys_adjust = len_adjust;
    report.output_len = Some(out.len());
    report.output = Some(out_path.clone());

    if cfg.dry_run {
        info!(
            "dry run: would write {} bytes to {}",
            out.len(),
            out_path.display()
        );
        return Ok(report);
    }

    info!(
        "writing revised binary with TRX header to {} ({} bytes)",
        out_path.display(),
        out.len()
    );
    writer.write_image(&out_path, &out)?;
    report.written = true;
    Ok(report)
}

/// Read `source` from disk and validate it, writing repairs next to it.
pub fn validate_file(source: &Path, cfg: &TrxConfig) -> Result<Report> {
    let buf = read_image(source)?;
    validate_and_repair(buf, source, cfg, &mut FsWriter)
}
