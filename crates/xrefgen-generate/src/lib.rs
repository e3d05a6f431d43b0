//! PostgreSQL generation for the `bible_databases` cross-reference dataset.
//!
//! This crate reads `extras/cross_references_*.txt` from a source tree and
//! writes one SQL file per source file under `psql/extras/`, together with
//! a `generation_report.json` describing the run.

pub mod errors;
pub mod generator;
pub mod model;
pub mod output;
pub mod source;

pub use errors::GenerationError;
pub use generator::{CrossReferencesGeneratorPsql, REPORT_FILE_NAME, SqlGenerator};
pub use model::{FileReport, GenerateOptions, GenerationIssue, GenerationReport};
