use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::books::Book;
use crate::error::{Error, Result};

/// A single verse, written `Book.Chapter.Verse` in the dataset (`Gen.1.1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VerseRef {
    pub book: Book,
    pub chapter: u16,
    pub verse: u16,
}

impl VerseRef {
    pub fn new(book: Book, chapter: u16, verse: u16) -> Self {
        Self {
            book,
            chapter,
            verse,
        }
    }
}

impl FromStr for VerseRef {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let mut parts = trimmed.split('.');
        let (Some(book), Some(chapter), Some(verse), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::InvalidReference(trimmed.to_string()));
        };

        let book = Book::from_osis(book)?;
        let chapter = parse_number(chapter, trimmed)?;
        let verse = parse_number(verse, trimmed)?;

        Ok(VerseRef::new(book, chapter, verse))
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.book, self.chapter, self.verse)
    }
}

fn parse_number(field: &str, reference: &str) -> Result<u16> {
    match field.parse::<u16>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(Error::InvalidReference(reference.to_string())),
    }
}

/// Target of a cross reference: a single verse or an inclusive range.
///
/// Ranges stay inside one book but may cross chapter boundaries
/// (`Gen.1.1-Gen.2.3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Passage {
    pub start: VerseRef,
    pub end: VerseRef,
}

impl Passage {
    pub fn single(verse: VerseRef) -> Self {
        Self {
            start: verse,
            end: verse,
        }
    }

    pub fn range(start: VerseRef, end: VerseRef) -> Result<Self> {
        if start.book != end.book {
            return Err(Error::InvalidRange(format!(
                "{start}-{end} spans more than one book"
            )));
        }
        if end < start {
            return Err(Error::InvalidRange(format!("{start}-{end} ends before it starts")));
        }
        Ok(Self { start, end })
    }

    pub fn book(&self) -> Book {
        self.start.book
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

impl FromStr for Passage {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        match trimmed.split_once('-') {
            Some((start, end)) => Passage::range(start.parse()?, end.parse()?),
            None => Ok(Passage::single(trimmed.parse()?)),
        }
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
