#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;

use tsr::cli::args::CliArgs;
use tsr::cli::driver;

fn main() -> Result<()> {
    // TSR_LOG / RUST_LOG and TSR_LOG_FORMAT, see src/tracing_config.rs.
    tsr::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let code = match driver::run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            2
        }
    };
    std::process::exit(code);
}
