use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

use trxutil::consts::EXIT_ERROR;

mod cli;
mod cmd_check;

fn init_logger() {
    // RUST_LOG overrides; default is warn so findings show up next to the report.
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(EXIT_ERROR);
        }
    }
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    cmd_check::exec(cli)
}
