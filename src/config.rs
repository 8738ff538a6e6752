//! Configuration for a validation pass.
//!
//! Values come from defaults, then environment, then explicit overrides (builder / CLI):
//! - TRX_LINKSYS         = 0|1|true|false|yes|no|on|off (default off)
//! - TRX_LINKSYS_ADJUST  = bytes subtracted from len in linksys mode (default 978)
//! - TRX_OUT_SUFFIX      = suffix appended to the source path for repaired output (default ".trx")
//! - TRX_DRY_RUN         = validate only, never write (default off)
//!
//! The original tool's usage text says linksys mode shrinks the length by 932 bytes while
//! its repair code subtracts 978. The applied value is configurable for that reason.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::consts::{LINKSYS_LEN_ADJUST, TRX_OUT_SUFFIX};

#[derive(Clone, Debug)]
pub struct TrxConfig {
    /// Shrink the reported length when overwriting an existing header.
    /// Env: TRX_LINKSYS (default false)
    pub linksys: bool,

    /// Amount subtracted from len in linksys mode.
    /// Env: TRX_LINKSYS_ADJUST (default 978)
    pub linksys_adjust: u32,

    /// Suffix for the repaired output path.
    /// Env: TRX_OUT_SUFFIX (default ".trx")
    pub out_suffix: String,

    /// Explicit output path; overrides `<source><out_suffix>`.
    pub out_path: Option<PathBuf>,

    /// Report what would be repaired without writing anything.
    /// Env: TRX_DRY_RUN (default false)
    pub dry_run: bool,
}

impl Default for TrxConfig {
    fn default() -> Self {
        Self {
            linksys: false,
            linksys_adjust: LINKSYS_LEN_ADJUST,
            out_suffix: TRX_OUT_SUFFIX.to_string(),
            out_path: None,
            dry_run: false,
        }
    }
}

#[inline]
fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| {
        let s = v.trim().to_ascii_lowercase();
        s == "1" || s == "true" || s == "yes" || s == "on"
    })
}

impl TrxConfig {
    /// Defaults overridden by TRX_* environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(on) = env_flag("TRX_LINKSYS") {
            cfg.linksys = on;
        }

        if let Ok(v) = std::env::var("TRX_LINKSYS_ADJUST") {
            if let Ok(n) = v.trim().parse::<u32>() {
                cfg.linksys_adjust = n;
            }
        }

        if let Ok(v) = std::env::var("TRX_OUT_SUFFIX") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.out_suffix = s.to_string();
            }
        }

        if let Some(on) = env_flag("TRX_DRY_RUN") {
            cfg.dry_run = on;
        }

        cfg
    }

    pub fn with_linksys(mut self, on: bool) -> Self {
        self.linksys = on;
        self
    }

    pub fn with_linksys_adjust(mut self, bytes: u32) -> Self {
        self.linksys_adjust = bytes;
        self
    }

    pub fn with_out_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.out_suffix = suffix.into();
        self
    }

    pub fn with_out_path(mut self, path: Option<PathBuf>) -> Self {
        self.out_path = path;
        self
    }

    pub fn with_dry_run(mut self, on: bool) -> Self {
        self.dry_run = on;
        self
    }

    /// Length reduction the overwrite repair applies (0 when linksys mode is off).
    pub fn len_adjust(&self) -> u32 {
        if self.linksys {
            self.linksys_adjust
        } else {
            0
        }
    }

    /// Where a repaired image for `source` goes.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        if let Some(p) = &self.out_path {
            return p.clone();
        }
        let mut s = source.as_os_str().to_os_string();
        s.push(&self.out_suffix);
        PathBuf::from(s)
    }
}

impl fmt::Display for TrxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrxConfig {{ linksys: {}, linksys_adjust: {}, out_suffix: {:?}, out_path: {}, dry_run: {} }}",
            self.linksys,
            self.linksys_adjust,
            self.out_suffix,
            self.out_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "default(<source><suffix>)".to_string()),
            self.dry_run,
        )
    }
}

/// Builder producing a TrxConfig.
#[derive(Clone, Debug)]
pub struct TrxBuilder {
    cfg: TrxConfig,
}

impl Default for TrxBuilder {
    fn default() -> Self {
        Self {
            cfg: TrxConfig::from_env(),
        }
    }
}

impl TrxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: TrxConfig::default(),
        }
    }

    pub fn linksys(mut self, on: bool) -> Self {
        self.cfg.linksys = on;
        self
    }

    pub fn linksys_adjust(mut self, bytes: u32) -> Self {
        self.cfg.linksys_adjust = bytes;
        self
    }

    pub fn out_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.cfg.out_suffix = suffix.into();
        self
    }

    pub fn out_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.cfg.out_path = Some(path.into());
        self
    }

    pub fn dry_run(mut self, on: bool) -> Self {
        self.cfg.dry_run = on;
        self
    }

    pub fn build(self) -> TrxConfig {
        self.cfg
    }
}
