use thiserror::Error;

/// Core error type shared across xrefgen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A verse reference does not follow the `Book.Chapter.Verse` shape.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    /// The OSIS abbreviation is not part of the canon.
    #[error("unknown book: {0}")]
    UnknownBook(String),
    /// A passage range spans books or ends before it starts.
    #[error("invalid range: {0}")]
    InvalidRange(String),
    /// A dataset record is missing fields or carries bad values.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// Convenience alias for results returned by xrefgen crates.
pub type Result<T> = std::result::Result<T, Error>;
