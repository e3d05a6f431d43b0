use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::errors::GenerationError;
use crate::model::{FileReport, GenerateOptions, GenerationIssue, GenerationReport};
use crate::output::atomic::{PendingFile, write_json_atomic};
use crate::output::psql::PsqlWriter;
use crate::source::{SourceFile, SourceLine, discover_source_files, read_lines};

/// File name of the run report written beside the generated SQL.
pub const REPORT_FILE_NAME: &str = "generation_report.json";

/// Something that produces SQL output given a source root and a
/// destination root fixed at construction.
pub trait SqlGenerator {
    fn generate(&self) -> Result<GenerationReport, GenerationError>;
}

/// Emits PostgreSQL scripts for the cross-reference dataset.
#[derive(Debug, Clone)]
pub struct CrossReferencesGeneratorPsql {
    source_directory: PathBuf,
    format_directory: PathBuf,
    options: GenerateOptions,
}

impl CrossReferencesGeneratorPsql {
    pub fn new(source_directory: impl Into<PathBuf>, format_directory: impl Into<PathBuf>) -> Self {
        Self::with_options(source_directory, format_directory, GenerateOptions::default())
    }

    pub fn with_options(
        source_directory: impl Into<PathBuf>,
        format_directory: impl Into<PathBuf>,
        options: GenerateOptions,
    ) -> Self {
        Self {
            source_directory: source_directory.into(),
            format_directory: format_directory.into(),
            options,
        }
    }

    /// Directory the SQL files land in: `<format_directory>/psql/extras`.
    pub fn output_directory(&self) -> PathBuf {
        self.format_directory.join("psql").join("extras")
    }

    fn generate_file(
        &self,
        source: &SourceFile,
        output_dir: &Path,
        report: &mut GenerationReport,
    ) -> Result<FileReport, GenerationError> {
        let output = output_dir.join(source.output_file_name());
        let pending = PendingFile::new(&output)?;
        let source_name = source
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut lines = read_lines(&source.path)?.peekable();
        let attribution = match lines.peek() {
            Some(Ok(SourceLine::Header { attribution })) => attribution.clone(),
            _ => None,
        };

        let file = BufWriter::new(pending.create()?);
        let mut writer = PsqlWriter::begin(
            file,
            self.options.batch_size,
            &source_name,
            attribution.as_deref(),
        )?;
        let mut rows_skipped = 0u64;

        for line in lines {
            let (line, parsed) = match line? {
                SourceLine::Header { .. } => continue,
                SourceLine::Record { line, parsed } => (line, parsed),
            };

            match parsed {
                Ok(record) => writer.push(record)?,
                Err(err) if self.options.strict => {
                    return Err(GenerationError::Malformed {
                        file: source.path.clone(),
                        line,
                        reason: err,
                    });
                }
                Err(err) => {
                    warn!(
                        event = "line_skipped",
                        file = %source.path.display(),
                        line = line,
                        reason = %err
                    );
                    rows_skipped += 1;
                    report.record_warning(
                        GenerationIssue::warning(issue_code(&err), err.to_string())
                            .at(&source.path, line),
                    );
                }
            }
        }

        let (summary, file) = writer.finish()?;
        file.into_inner()
            .map_err(|err| err.into_error())?
            .sync_all()?;
        pending.commit()?;

        info!(
            event = "file_written",
            path = %output.display(),
            rows = summary.rows,
            skipped = rows_skipped
        );

        Ok(FileReport {
            source: source.path.clone(),
            output,
            rows_written: summary.rows,
            rows_skipped,
            bytes_written: summary.bytes,
            sha256: summary.sha256,
        })
    }
}

impl SqlGenerator for CrossReferencesGeneratorPsql {
    fn generate(&self) -> Result<GenerationReport, GenerationError> {
        if self.options.batch_size == 0 {
            return Err(GenerationError::InvalidOptions(
                "batch_size must be at least 1".to_string(),
            ));
        }

        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let generated_at = chrono::Utc::now().to_rfc3339();
        info!(
            event = "generation_started",
            run_id = %run_id,
            source = %self.source_directory.display(),
            strict = self.options.strict
        );

        let sources = discover_source_files(&self.source_directory)?;
        info!(event = "source_discovered", files = sources.len());

        let output_dir = self.output_directory();
        std::fs::create_dir_all(&output_dir)?;

        let mut report = GenerationReport::new(run_id, generated_at, output_dir.clone());
        for source in &sources {
            let file_report = self.generate_file(source, &output_dir, &mut report)?;
            report.record_file(file_report);
        }

        let report_path = output_dir.join(REPORT_FILE_NAME);
        write_json_atomic(&report_path, &report)?;
        info!(event = "report_written", path = %report_path.display());

        let duration_ms = start.elapsed().as_millis();
        info!(
            event = "generation_finished",
            rows = report.rows_total,
            skipped = report.skipped_total,
            duration_ms = duration_ms
        );

        Ok(report)
    }
}

fn issue_code(err: &xrefgen_core::Error) -> &'static str {
    match err {
        xrefgen_core::Error::InvalidReference(_) => "invalid_reference",
        xrefgen_core::Error::UnknownBook(_) => "unknown_book",
        xrefgen_core::Error::InvalidRange(_) => "invalid_range",
        xrefgen_core::Error::InvalidRecord(_) => "invalid_record",
    }
}
