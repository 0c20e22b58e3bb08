//! Command-line surface: `patina <directory> <workers>`.

mod summary;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use patina_core::{BatchRunner, Config, PatinaError, ReportStatus};
use std::path::PathBuf;
use std::process::ExitCode;

/// Patina - age a directory of photographs in parallel.
#[derive(Parser, Debug)]
#[command(name = "patina")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the photographs and image-list.txt
    pub directory: PathBuf,

    /// Number of worker threads
    #[arg(allow_negative_numbers = true)]
    pub workers: i64,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "PATINA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Paper texture to composite (overrides texture.path)
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Load the explicit config file, or the default one if present.
    ///
    /// A broken explicit file is fatal; a broken default file falls back to
    /// defaults with a warning.
    pub fn load_config(&self) -> Result<Config, PatinaError> {
        if let Some(path) = &self.config {
            return Ok(Config::load_from(path)?);
        }
        match Config::load() {
            Ok(config) => Ok(config),
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check {}",
                    Config::default_path().display()
                );
                Ok(Config::default())
            }
        }
    }
}

/// Run a batch with the parsed arguments.
pub fn execute(args: &Cli, mut config: Config) -> anyhow::Result<()> {
    if let Some(texture) = &args.texture {
        config.texture.path = texture.clone();
    }

    let workers = usize::try_from(args.workers).map_err(|_| PatinaError::InvalidWorkerCount {
        requested: args.workers,
        max: config.processing.max_workers,
    })?;

    let runner = BatchRunner::new(config);
    let outcome = runner.run(&args.directory, workers)?;

    if outcome.report_status == ReportStatus::AlreadyExists {
        println!(
            "{} already exists, report not written",
            outcome.report_path.display()
        );
    }
    summary::print_summary(&outcome);

    Ok(())
}

/// Exit code for a failed run; unknown errors map to 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<PatinaError>()
        .map_or(1, PatinaError::exit_code)
}

/// Wrong number of positionals prints usage and exits cleanly; anything
/// else clap rejects is a configuration error.
pub fn handle_parse_error(err: clap::Error) -> ExitCode {
    if is_usage_request(err.kind()) {
        if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            let _ = err.print();
        } else {
            println!("\n\t{}\n", Cli::command().render_usage());
        }
        return ExitCode::SUCCESS;
    }
    let _ = err.print();
    ExitCode::from(2)
}

fn is_usage_request(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            | ErrorKind::MissingRequiredArgument
            | ErrorKind::UnknownArgument
            | ErrorKind::TooManyValues
            | ErrorKind::WrongNumberOfValues
    )
}
