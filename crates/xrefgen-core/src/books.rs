use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical book table: (OSIS abbreviation, display name).
///
/// The position in this table is the book's canonical number minus one.
const BOOKS: [(&str, &str); 66] = [
    ("Gen", "Genesis"),
    ("Exod", "Exodus"),
    ("Lev", "Leviticus"),
    ("Num", "Numbers"),
    ("Deut", "Deuteronomy"),
    ("Josh", "Joshua"),
    ("Judg", "Judges"),
    ("Ruth", "Ruth"),
    ("1Sam", "I Samuel"),
    ("2Sam", "II Samuel"),
    ("1Kgs", "I Kings"),
    ("2Kgs", "II Kings"),
    ("1Chr", "I Chronicles"),
    ("2Chr", "II Chronicles"),
    ("Ezra", "Ezra"),
    ("Neh", "Nehemiah"),
    ("Esth", "Esther"),
    ("Job", "Job"),
    ("Ps", "Psalms"),
    ("Prov", "Proverbs"),
    ("Eccl", "Ecclesiastes"),
    ("Song", "Song of Solomon"),
    ("Isa", "Isaiah"),
    ("Jer", "Jeremiah"),
    ("Lam", "Lamentations"),
    ("Ezek", "Ezekiel"),
    ("Dan", "Daniel"),
    ("Hos", "Hosea"),
    ("Joel", "Joel"),
    ("Amos", "Amos"),
    ("Obad", "Obadiah"),
    ("Jonah", "Jonah"),
    ("Mic", "Micah"),
    ("Nah", "Nahum"),
    ("Hab", "Habakkuk"),
    ("Zeph", "Zephaniah"),
    ("Hag", "Haggai"),
    ("Zech", "Zechariah"),
    ("Mal", "Malachi"),
    ("Matt", "Matthew"),
    ("Mark", "Mark"),
    ("Luke", "Luke"),
    ("John", "John"),
    ("Acts", "Acts"),
    ("Rom", "Romans"),
    ("1Cor", "I Corinthians"),
    ("2Cor", "II Corinthians"),
    ("Gal", "Galatians"),
    ("Eph", "Ephesians"),
    ("Phil", "Philippians"),
    ("Col", "Colossians"),
    ("1Thess", "I Thessalonians"),
    ("2Thess", "II Thessalonians"),
    ("1Tim", "I Timothy"),
    ("2Tim", "II Timothy"),
    ("Titus", "Titus"),
    ("Phlm", "Philemon"),
    ("Heb", "Hebrews"),
    ("Jas", "James"),
    ("1Pet", "I Peter"),
    ("2Pet", "II Peter"),
    ("1John", "I John"),
    ("2John", "II John"),
    ("3John", "III John"),
    ("Jude", "Jude"),
    ("Rev", "Revelation of John"),
];

/// A book of the 66-book canon, identified by its canonical number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Book(u8);

impl Book {
    /// Number of books in the canon.
    pub const COUNT: usize = BOOKS.len();

    /// Looks up a book by OSIS abbreviation (`Gen`, `1Cor`, ...).
    ///
    /// Matching is case-sensitive, as the dataset is.
    pub fn from_osis(abbreviation: &str) -> Result<Self> {
        BOOKS
            .iter()
            .position(|(osis, _)| *osis == abbreviation)
            .map(|index| Book(index as u8 + 1))
            .ok_or_else(|| Error::UnknownBook(abbreviation.to_string()))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn osis(self) -> &'static str {
        BOOKS[usize::from(self.0 - 1)].0
    }

    pub fn name(self) -> &'static str {
        BOOKS[usize::from(self.0 - 1)].1
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.osis())
    }
}

impl TryFrom<String> for Book {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Book::from_osis(&value)
    }
}

impl From<Book> for String {
    fn from(value: Book) -> Self {
        value.osis().to_string()
    }
}
