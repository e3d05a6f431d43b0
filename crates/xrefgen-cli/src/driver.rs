use std::io::Write;
use std::path::PathBuf;

use tracing::{info, warn};
use xrefgen_generate::{GenerationReport, SqlGenerator};

use crate::CliError;

pub const CLONE_COMMAND: &str =
    "cd ~/Downloads && git clone https://github.com/scrollmapper/bible_databases.git";

/// Paths the driver hands to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub source_directory: PathBuf,
    pub format_directory: PathBuf,
}

impl DriverConfig {
    pub fn extras_directory(&self) -> PathBuf {
        self.format_directory.join("psql").join("extras")
    }
}

#[derive(Debug)]
pub enum DriverOutcome {
    /// The dataset is not on disk; remediation was printed.
    MissingSource,
    Generated(GenerationReport),
}

/// Checks the dataset is present, then builds and runs one generator.
///
/// Messages go to `out`. The driver itself never touches the filesystem
/// beyond the existence check.
pub fn run_driver<G, F, W>(
    config: &DriverConfig,
    make_generator: F,
    out: &mut W,
) -> Result<DriverOutcome, CliError>
where
    G: SqlGenerator,
    F: FnOnce(PathBuf, PathBuf) -> G,
    W: Write,
{
    if !config.source_directory.exists() {
        warn!(
            event = "source_missing",
            path = %config.source_directory.display()
        );
        writeln!(out, "ERROR: Please download the bible_databases repo first:")?;
        writeln!(out, "{CLONE_COMMAND}")?;
        return Ok(DriverOutcome::MissingSource);
    }

    let generator = make_generator(
        config.source_directory.clone(),
        config.format_directory.clone(),
    );
    let report = generator.generate()?;
    info!(
        event = "driver_finished",
        files = report.files.len(),
        rows = report.rows_total
    );

    writeln!(out)?;
    writeln!(out, "✅ Cross-reference SQL file generated!")?;
    writeln!(out, "📁 Location: {}/", config.extras_directory().display())?;

    Ok(DriverOutcome::Generated(report))
}
