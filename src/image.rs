//! image — loading source images and writing repaired ones.
//!
//! Writes go through the `ImageWriter` trait so the engine can be driven against
//! storage other than the local filesystem (tests use `MemWriter`).
//!
//! FsWriter policy: create-or-truncate via tmp+rename, then fsync of the parent
//! directory (best-effort on Windows). The tmp file is removed if any step fails.

use anyhow::{anyhow, Context, Result};
use log::debug;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
#[cfg(unix)]
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Read a whole image into memory.
pub fn read_image(path: &Path) -> Result<Vec<u8>> {
    let mut f = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("open image {}", path.display()))?;
    let expect = f
        .metadata()
        .with_context(|| format!("stat image {}", path.display()))?
        .len();
    let mut buf = Vec::with_capacity(expect as usize);
    f.read_to_end(&mut buf)
        .with_context(|| format!("read image {}", path.display()))?;
    if buf.len() as u64 != expect {
        return Err(anyhow!(
            "short read on {} (expected {} bytes, got {})",
            path.display(),
            expect,
            buf.len()
        ));
    }
    if buf.len() > u32::MAX as usize {
        return Err(anyhow!(
            "image {} is {} bytes, TRX length field is 32-bit",
            path.display(),
            buf.len()
        ));
    }
    debug!("read_image: {} ({} bytes)", path.display(), buf.len());
    Ok(buf)
}

/// Destination for repaired images.
pub trait ImageWriter {
    /// Write exactly `data` to `path`, creating or truncating it.
    fn write_image(&mut self, path: &Path, data: &[u8]) -> Result<()>;
}

#[cfg(unix)]
fn fsync_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
    }
    Ok(())
}
#[cfg(not(unix))]
fn fsync_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Local filesystem writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWriter;

impl ImageWriter for FsWriter {
    fn write_image(&mut self, path: &Path, data: &[u8]) -> Result<()> {
        let mut tmp = path.as_os_str().to_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let _ = fs::remove_file(&tmp); // best-effort

        let res = (|| -> Result<()> {
            let mut f = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp)
                .with_context(|| format!("open output tmp {}", tmp.display()))?;
            f.write_all(data)
                .with_context(|| format!("write {}", tmp.display()))?;
            f.sync_all()
                .with_context(|| format!("sync {}", tmp.display()))?;
            drop(f);

            fs::rename(&tmp, path)
                .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))
        })();
        if let Err(e) = res {
            // no partial output on failure
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        let _ = fsync_dir(path);
        debug!("write_image: {} ({} bytes)", path.display(), data.len());
        Ok(())
    }
}

/// In-memory writer; keeps the last image written per path.
#[derive(Debug, Default, Clone)]
pub struct MemWriter {
    pub files: BTreeMap<PathBuf, Vec<u8>>,
    pub writes: usize,
}

impl MemWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }
}

impl ImageWriter for MemWriter {
    fn write_image(&mut self, path: &Path, data: &[u8]) -> Result<()> {
        self.files.insert(path.to_path_buf(), data.to_vec());
        self.writes += 1;
        Ok(())
    }
}
