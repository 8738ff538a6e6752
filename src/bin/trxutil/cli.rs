use clap::Parser;
use std::path::PathBuf;

/// Verify the TRX header of a firmware image. If it is missing or wrong, a corrected
/// image is written to <FILE>.trx.
///
/// Exit status: 0 valid, 2 new header written, 3 existing header rewritten, 1 error.
#[derive(Parser, Debug)]
#[command(
    name = "trxutil",
    version,
    about = "Verify and repair the TRX header of a firmware image",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Firmware image to check
    pub file: PathBuf,

    /// Linksys mode: when rewriting an existing header, report a shorter length
    /// (some Linksys web GUIs require it)
    #[arg(short = 'l', long, default_value_t = false, overrides_with = "no_linksys")]
    pub linksys: bool,

    /// Turn linksys mode off even if TRX_LINKSYS is set
    #[arg(long, default_value_t = false, overrides_with = "linksys")]
    pub no_linksys: bool,

    /// Bytes subtracted from the length in linksys mode.
    ///
    /// Defaults to 978, the value the repair has always applied. Older usage text
    /// documents 932 for the same feature.
    #[arg(long)]
    pub linksys_adjust: Option<u32>,

    /// Output path for the repaired image (default: <FILE><SUFFIX>)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Suffix appended to FILE for the repaired image (default: .trx)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Only report what would be repaired
    #[arg(long, default_value_t = false, overrides_with = "no_dry_run")]
    pub dry_run: bool,

    /// Write repairs even if TRX_DRY_RUN is set
    #[arg(long, default_value_t = false, overrides_with = "dry_run")]
    pub no_dry_run: bool,

    /// Print the observed header fields
    #[arg(long, default_value_t = false)]
    pub show_header: bool,

    /// JSON output (single object)
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
