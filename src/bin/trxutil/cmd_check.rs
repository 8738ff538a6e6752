use anyhow::Result;
use log::debug;

use trxutil::{validate_file, TrxBuilder, TrxConfig};

use crate::cli::Cli;

/// `--x` / `--no-x` pair: the last one given wins, neither keeps the env value.
fn flag(on: bool, off: bool) -> Option<bool> {
    if on {
        Some(true)
    } else if off {
        Some(false)
    } else {
        None
    }
}

/// Env-derived config with explicit CLI options on top.
fn config_from(cli: &Cli, base: TrxConfig) -> TrxConfig {
    let mut cfg = base.with_out_path(cli.out.clone());
    if let Some(on) = flag(cli.linksys, cli.no_linksys) {
        cfg = cfg.with_linksys(on);
    }
    if let Some(on) = flag(cli.dry_run, cli.no_dry_run) {
        cfg = cfg.with_dry_run(on);
    }
    if let Some(n) = cli.linksys_adjust {
        cfg = cfg.with_linksys_adjust(n);
    }
    if let Some(s) = &cli.suffix {
        cfg = cfg.with_out_suffix(s.as_str());
    }
    cfg
}

/// Run one validation pass and print the report. Returns the process exit code.
pub fn exec(cli: Cli) -> Result<i32> {
    let cfg = config_from(&cli, TrxBuilder::new().build());
    debug!("{}", cfg);

    let report = validate_file(&cli.file, &cfg)?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        if cli.show_header {
            print!("{}", report.render_header());
        }
        print!("{}", report.render_text());
    }
    Ok(report.exit_code())
}
