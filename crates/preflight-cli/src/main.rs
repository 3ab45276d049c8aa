//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::Parser;

use preflight_cli::{Cli, init_logging, run};

fn main() -> ExitCode {
    // Load .env before parsing so DCGM_PREFLIGHT_* values reach clap
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("{err:#}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
