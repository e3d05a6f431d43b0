mod config;
mod driver;
mod logging;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use config::{ConfigError, DriverSettings, Overrides, home_dir, load_settings, resolve};
use driver::{DriverOutcome, run_driver};
use logging::{LogFormat, init_logging};
use thiserror::Error;
use xrefgen_generate::{CrossReferencesGeneratorPsql, GenerationError};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "xrefgen",
    version,
    about = "Generate PostgreSQL cross-reference scripts from bible_databases"
)]
struct Cli {
    /// Dataset `sources` directory (default: ~/Downloads/bible_databases/sources).
    #[arg(long, value_name = "DIR")]
    source: Option<PathBuf>,
    /// Format root; SQL lands in `<DIR>/psql/extras`.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Optional TOML settings file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Fail on malformed records instead of skipping them.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Rows per INSERT statement.
    #[arg(long, value_name = "ROWS")]
    batch_size: Option<usize>,
    /// Log format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    let settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => DriverSettings::default(),
    };
    let overrides = Overrides {
        source_directory: cli.source,
        format_directory: cli.out,
        strict: cli.strict,
        batch_size: cli.batch_size,
    };
    let resolved = resolve(overrides, &settings, home_dir().as_deref())?;

    tracing::info!(
        event = "run_started",
        source = %resolved.driver.source_directory.display(),
        format = %resolved.driver.format_directory.display()
    );

    let options = resolved.options;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = run_driver(
        &resolved.driver,
        |source, format| CrossReferencesGeneratorPsql::with_options(source, format, options),
        &mut out,
    )?;

    match outcome {
        DriverOutcome::MissingSource => {
            tracing::info!(event = "run_finished", status = "missing_source");
        }
        DriverOutcome::Generated(report) => {
            tracing::info!(
                event = "run_finished",
                status = "success",
                files = report.files.len(),
                skipped = report.skipped_total
            );
        }
    }

    Ok(())
}
