use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the SQL generators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Fail on the first malformed record instead of skipping it.
    pub strict: bool,
    /// Maximum rows per `INSERT` statement.
    pub batch_size: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            strict: false,
            batch_size: 1000,
        }
    }
}

/// Summary of one generated SQL file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub rows_written: u64,
    pub rows_skipped: u64,
    pub bytes_written: u64,
    pub sha256: String,
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
}

impl GenerationIssue {
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: "warning".to_string(),
            code: code.into(),
            message: message.into(),
            file: None,
            line: None,
        }
    }

    pub fn at(mut self, file: impl Into<PathBuf>, line: u64) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub generated_at: String,
    pub output_dir: PathBuf,
    pub files: Vec<FileReport>,
    pub rows_total: u64,
    pub skipped_total: u64,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
}

impl GenerationReport {
    pub fn new(run_id: String, generated_at: String, output_dir: PathBuf) -> Self {
        Self {
            run_id,
            generated_at,
            output_dir,
            files: Vec::new(),
            rows_total: 0,
            skipped_total: 0,
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record_file(&mut self, file: FileReport) {
        self.rows_total += file.rows_written;
        self.skipped_total += file.rows_skipped;
        self.files.push(file);
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }
}
