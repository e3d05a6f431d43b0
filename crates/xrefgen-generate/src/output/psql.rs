use std::io::{self, Write};

use sha2::{Digest, Sha256};

use xrefgen_core::CrossReference;

pub const TABLE_NAME: &str = "cross_references";

const COLUMNS: [&str; 9] = [
    "from_book",
    "from_chapter",
    "from_verse",
    "to_book",
    "to_chapter_start",
    "to_verse_start",
    "to_chapter_end",
    "to_verse_end",
    "votes",
];

/// Totals for a finished SQL file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsqlSummary {
    pub rows: u64,
    pub bytes: u64,
    pub sha256: String,
}

/// Streams cross references into a PostgreSQL script.
///
/// The script creates the table and index idempotently, then inserts rows
/// inside one transaction using multi-row `INSERT` statements.
pub struct PsqlWriter<W: Write> {
    out: DigestWriter<W>,
    batch_size: usize,
    pending: Vec<CrossReference>,
    rows: u64,
}

impl<W: Write> PsqlWriter<W> {
    /// Writes the preamble and opens the transaction.
    ///
    /// A `batch_size` of zero is treated as one.
    pub fn begin(
        inner: W,
        batch_size: usize,
        source_name: &str,
        attribution: Option<&str>,
    ) -> io::Result<Self> {
        let mut out = DigestWriter::new(inner);

        writeln!(out, "-- Cross references generated from {source_name}")?;
        if let Some(attribution) = attribution {
            writeln!(out, "-- Source: {attribution}")?;
        }
        writeln!(out)?;
        writeln!(out, "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (")?;
        writeln!(out, "    from_book TEXT NOT NULL,")?;
        writeln!(out, "    from_chapter INTEGER NOT NULL,")?;
        writeln!(out, "    from_verse INTEGER NOT NULL,")?;
        writeln!(out, "    to_book TEXT NOT NULL,")?;
        writeln!(out, "    to_chapter_start INTEGER NOT NULL,")?;
        writeln!(out, "    to_verse_start INTEGER NOT NULL,")?;
        writeln!(out, "    to_chapter_end INTEGER NOT NULL,")?;
        writeln!(out, "    to_verse_end INTEGER NOT NULL,")?;
        writeln!(out, "    votes INTEGER NOT NULL")?;
        writeln!(out, ");")?;
        writeln!(out)?;
        writeln!(
            out,
            "CREATE INDEX IF NOT EXISTS idx_{TABLE_NAME}_from ON {TABLE_NAME} (from_book, from_chapter, from_verse);"
        )?;
        writeln!(out)?;
        writeln!(out, "BEGIN;")?;

        Ok(Self {
            out,
            batch_size: batch_size.max(1),
            pending: Vec::new(),
            rows: 0,
        })
    }

    pub fn push(&mut self, record: CrossReference) -> io::Result<()> {
        self.pending.push(record);
        if self.pending.len() >= self.batch_size {
            self.flush_batch()?;
        }
        Ok(())
    }

    /// Flushes pending rows, commits, and returns the file totals along with
    /// the inner writer.
    pub fn finish(mut self) -> io::Result<(PsqlSummary, W)> {
        self.flush_batch()?;
        writeln!(self.out, "COMMIT;")?;
        self.out.flush()?;

        let (inner, bytes, sha256) = self.out.into_parts();
        let summary = PsqlSummary {
            rows: self.rows,
            bytes,
            sha256,
        };
        Ok((summary, inner))
    }

    fn flush_batch(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        writeln!(
            self.out,
            "INSERT INTO {TABLE_NAME} ({}) VALUES",
            COLUMNS.join(", ")
        )?;
        let last = self.pending.len() - 1;
        for (index, record) in self.pending.iter().enumerate() {
            let terminator = if index == last { ";" } else { "," };
            writeln!(self.out, "{}{terminator}", values_tuple(record))?;
        }

        self.rows += self.pending.len() as u64;
        self.pending.clear();
        Ok(())
    }
}

fn values_tuple(record: &CrossReference) -> String {
    format!(
        "({}, {}, {}, {}, {}, {}, {}, {}, {})",
        quote_literal(record.from.book.name()),
        record.from.chapter,
        record.from.verse,
        quote_literal(record.to.book().name()),
        record.to.start.chapter,
        record.to.start.verse,
        record.to.end.chapter,
        record.to.end.verse,
        record.votes,
    )
}

/// Renders a PostgreSQL string literal, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

struct DigestWriter<W: Write> {
    inner: W,
    bytes: u64,
    hasher: Sha256,
}

impl<W: Write> DigestWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            bytes: 0,
            hasher: Sha256::new(),
        }
    }

    fn into_parts(self) -> (W, u64, String) {
        let digest = hex::encode(self.hasher.finalize());
        (self.inner, self.bytes, digest)
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.hasher.update(&buf[..size]);
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
