use std::path::{Path, PathBuf};

use xrefgen_core::{CrossReference, HEADER_FIELD, parse_record};

use crate::errors::GenerationError;

const SOURCE_PREFIX: &str = "cross_references_";
const SOURCE_EXTENSION: &str = "txt";

/// A discovered `cross_references_<N>.txt` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub index: u32,
    pub path: PathBuf,
}

impl SourceFile {
    /// File name of the SQL output paired with this source.
    pub fn output_file_name(&self) -> String {
        format!("{SOURCE_PREFIX}{}.sql", self.index)
    }
}

/// One line of a source file, after header detection and parsing.
#[derive(Debug)]
pub enum SourceLine {
    Header { attribution: Option<String> },
    Record {
        line: u64,
        parsed: xrefgen_core::Result<CrossReference>,
    },
}

/// Lists cross-reference source files under `<source_dir>/extras`, ordered by
/// their numeric suffix.
pub fn discover_source_files(source_dir: &Path) -> Result<Vec<SourceFile>, GenerationError> {
    let extras = source_dir.join("extras");
    if !extras.is_dir() {
        return Err(GenerationError::NoSourceFiles(extras));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(&extras)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(index) = source_index(&path) {
            files.push(SourceFile { index, path });
        }
    }

    if files.is_empty() {
        return Err(GenerationError::NoSourceFiles(extras));
    }

    files.sort_by_key(|file| file.index);
    Ok(files)
}

fn source_index(path: &Path) -> Option<u32> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXTENSION) {
        return None;
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.strip_prefix(SOURCE_PREFIX))
        .and_then(|suffix| suffix.parse::<u32>().ok())
}

/// Streams the lines of a tab-separated source file.
///
/// Blank lines are dropped. Lines that are not valid UTF-8 come back as
/// records that failed to parse. The header row is reported once as
/// [`SourceLine::Header`], carrying the `#`-prefixed attribution if present.
pub fn read_lines(
    path: &Path,
) -> Result<impl Iterator<Item = Result<SourceLine, GenerationError>>, GenerationError> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)?;

    Ok(reader.into_byte_records().filter_map(|record| {
        let record = match record {
            Ok(record) => record,
            Err(err) => return Some(Err(GenerationError::from(err))),
        };
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();

        let fields = match record
            .iter()
            .map(std::str::from_utf8)
            .collect::<Result<Vec<&str>, _>>()
        {
            Ok(fields) => fields,
            Err(err) => {
                return Some(Ok(SourceLine::Record {
                    line,
                    parsed: Err(xrefgen_core::Error::InvalidRecord(format!(
                        "line is not valid UTF-8: {err}"
                    ))),
                }));
            }
        };

        if fields.iter().all(|field| field.trim().is_empty()) {
            return None;
        }

        if fields.first().map(|field| field.trim()) == Some(HEADER_FIELD) {
            let attribution = fields
                .iter()
                .map(|field| field.trim())
                .find_map(|field| field.strip_prefix('#'))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty());
            return Some(Ok(SourceLine::Header { attribution }));
        }

        Some(Ok(SourceLine::Record {
            line,
            parsed: parse_record(&fields[..]),
        }))
    }))
}
