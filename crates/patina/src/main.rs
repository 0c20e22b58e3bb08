//! Patina CLI - age a directory of photographs in parallel.
//!
//! Reads `<directory>/image-list.txt`, writes aged copies to
//! `<directory>/Old-image-dir/` and the run's timings to
//! `<directory>/timming_<workers>.txt`.
//!
//! # Usage
//!
//! ```bash
//! patina ./photos 4
//! RUST_LOG=debug patina ./photos 8 --texture ./paper-texture.png
//! ```

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod logging;

fn main() -> ExitCode {
    let args = match cli::Cli::try_parse() {
        Ok(args) => args,
        Err(e) => return cli::handle_parse_error(e),
    };

    // Logging isn't initialized yet, so config problems go to stderr directly.
    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(e.exit_code());
        }
    };
    logging::init_from_config(&config, args.verbose, args.json_logs);

    tracing::debug!("Patina v{}", patina_core::VERSION);

    match cli::execute(&args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(cli::exit_code(&e))
        }
    }
}
