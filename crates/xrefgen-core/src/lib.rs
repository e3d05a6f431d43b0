//! Core contracts for xrefgen.
//!
//! This crate defines the canonical book table, verse references and the
//! cross-reference record parsed from the `bible_databases` dataset.

pub mod books;
pub mod cross_reference;
pub mod error;
pub mod reference;

pub use books::Book;
pub use cross_reference::{CrossReference, HEADER_FIELD, parse_record};
pub use error::{Error, Result};
pub use reference::{Passage, VerseRef};
