use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reference::{Passage, VerseRef};

/// First field of the header row in every cross-reference source file.
pub const HEADER_FIELD: &str = "From Verse";

/// A link from one verse to a related passage, weighted by reader votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    pub from: VerseRef,
    pub to: Passage,
    /// Net votes from openbible.info; may be negative.
    pub votes: i32,
}

/// Parses one tab-separated record: `from`, `to`, `votes`.
///
/// Trailing empty fields are tolerated; anything else beyond three fields is
/// rejected.
pub fn parse_record<S: AsRef<str>>(fields: &[S]) -> Result<CrossReference> {
    let fields: Vec<&str> = fields
        .iter()
        .map(|field| field.as_ref().trim())
        .collect();
    let significant = fields
        .iter()
        .rposition(|field| !field.is_empty())
        .map_or(0, |last| last + 1);

    if significant != 3 {
        return Err(Error::InvalidRecord(format!(
            "expected 3 fields, found {significant}"
        )));
    }

    let from: VerseRef = fields[0].parse()?;
    let to: Passage = fields[1].parse()?;
    let votes = fields[2]
        .parse::<i32>()
        .map_err(|_| Error::InvalidRecord(format!("invalid vote count '{}'", fields[2])))?;

    Ok(CrossReference { from, to, votes })
}
