use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by the SQL generators.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no cross reference files found under {0}")]
    NoSourceFiles(PathBuf),
    #[error("malformed record in {file}:{line}: {reason}")]
    Malformed {
        file: PathBuf,
        line: u64,
        #[source]
        reason: xrefgen_core::Error,
    },
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
