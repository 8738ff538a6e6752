//! report — outcome of one validation pass, printable as text or JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::path::PathBuf;

use crate::consts::{
    EXIT_REPAIRED_NEW_HEADER, EXIT_REPAIRED_OVERWRITE, EXIT_VALID, TRX_HDR_SIZE,
};
use crate::header::TrxHeader;
use crate::validate::{Finding, RepairKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Valid,
    RepairedNewHeader,
    /// Covers too-small, length and checksum mismatches.
    RepairedOverwrite,
}

impl Outcome {
    pub fn from_finding(f: Option<&Finding>) -> Self {
        match f.map(|f| f.repair_kind()) {
            None => Outcome::Valid,
            Some(RepairKind::NewHeader) => Outcome::RepairedNewHeader,
            Some(RepairKind::Overwrite) => Outcome::RepairedOverwrite,
        }
    }

    /// Process exit status for scripting callers.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Valid => EXIT_VALID,
            Outcome::RepairedNewHeader => EXIT_REPAIRED_NEW_HEADER,
            Outcome::RepairedOverwrite => EXIT_REPAIRED_OVERWRITE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Valid => "valid",
            Outcome::RepairedNewHeader => "repaired_new_header",
            Outcome::RepairedOverwrite => "repaired_overwrite",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub source: PathBuf,
    /// Source image size in bytes.
    pub size: usize,
    pub outcome: Outcome,
    pub finding: Option<Finding>,
    pub observed: TrxHeader,
    /// Header of the output image when repaired, otherwise the derived one.
    pub expected: TrxHeader,
    pub output: Option<PathBuf>,
    pub output_len: Option<usize>,
    /// False for valid images and for dry runs.
    pub written: bool,
    pub linksys_adjust: u32,
}

impl Report {
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serialize report json")
    }

    /// Human-readable report, one check per line, stopping at the first failed check.
    pub fn render_text(&self) -> String {
        let mut s = String::new();
        let o = &self.observed;

        match self.finding {
            Some(Finding::NoHeader { expected_magic, found_magic }) => {
                let _ = writeln!(s, "TRX header not found.");
                let _ = writeln!(
                    s,
                    "\tMagic expected: {:08X}\t Magic found: {:08X}",
                    expected_magic, found_magic
                );
            }
            _ => {
                let _ = writeln!(s, "TRX header found: {:08X}", o.magic);
                match self.finding {
                    Some(Finding::TooSmall { found_len }) => {
                        let _ = writeln!(s, "Error: TRX file size is too small");
                        let _ = writeln!(
                            s,
                            "\tLength field {} is smaller than TRX header size ({} bytes)",
                            found_len, TRX_HDR_SIZE
                        );
                    }
                    Some(Finding::LengthMismatch { expected_len, found_len }) => {
                        let _ = writeln!(s, "Error: Expected and actual file length do not match");
                        let _ = writeln!(
                            s,
                            "\tLength expected: {}\tLength found: {}",
                            expected_len, found_len
                        );
                    }
                    Some(Finding::ChecksumMismatch { expected_crc, found_crc }) => {
                        let _ = writeln!(s, "TRX file length: {}", o.len);
                        let _ = writeln!(s, "Error: Bad TRX checksum");
                        let _ = writeln!(
                            s,
                            "\tExpected: {:08X}\tFound: {:08X}",
                            expected_crc, found_crc
                        );
                    }
                    _ => {
                        let _ = writeln!(s, "TRX file length: {}", o.len);
                        let _ = writeln!(s, "TRX checksum is correct: {:08X}", o.crc);
                    }
                }
            }
        }

        if let Some(out) = &self.output {
            let verb = if self.written { "Wrote" } else { "Would write" };
            let _ = writeln!(
                s,
                "{} revised binary with TRX header to {} ({} bytes, len={} crc={:08X})",
                verb,
                out.display(),
                self.output_len.unwrap_or(0),
                self.expected.len,
                self.expected.crc
            );
            if self.linksys_adjust != 0 && self.outcome == Outcome::RepairedOverwrite {
                let _ = writeln!(
                    s,
                    "\tLinksys mode: len field reduced by {} bytes",
                    self.linksys_adjust
                );
            }
        } else {
            let _ = writeln!(s, "TRX header is valid!");
        }
        let _ = writeln!(s, "Outcome: {} (exit {})", self.outcome, self.exit_code());
        s
    }

    /// Field dump of the observed header.
    pub fn render_header(&self) -> String {
        let o = &self.observed;
        let mut s = String::new();
        let _ = writeln!(s, "Header of {} ({} bytes)", self.source.display(), self.size);
        let _ = writeln!(s, "  magic      = 0x{:08X}", o.magic);
        let _ = writeln!(s, "  len        = {}", o.len);
        let _ = writeln!(s, "  crc        = 0x{:08X}", o.crc);
        let _ = writeln!(s, "  flags_vers = 0x{:08X}", o.flags_vers);
        for (i, off) in o.offsets.iter().enumerate() {
            let _ = writeln!(s, "  offsets[{}] = 0x{:08X}", i, off);
        }
        s
    }
}
