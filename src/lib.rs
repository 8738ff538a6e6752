// TRX format: constants, header layout, checksum
pub mod consts;
pub mod header;
pub mod checksum;

// Validation and repair
pub mod validate; // src/validate/{mod,check,repair}.rs

// I/O, configuration, reporting
pub mod image;
pub mod config;
pub mod report;

// Convenience re-exports
pub use checksum::{checksum, trx_checksum};
pub use config::{TrxBuilder, TrxConfig};
pub use header::TrxHeader;
pub use image::{read_image, FsWriter, ImageWriter, MemWriter};
pub use report::{Outcome, Report};
pub use validate::{inspect, validate_and_repair, validate_file, Finding, Inspection, RepairKind};
