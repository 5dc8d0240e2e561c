//! Delimited-text codec for the collection files.
//!
//! Every collection is stored as one record per line with comma-separated fields. A field is
//! wrapped in double quotes when it contains the delimiter, a quote, a line break, or
//! leading/trailing whitespace; quotes inside a wrapped field are doubled.
//!
//! Decoding is a single character scan over the whole file with an "inside quotes" flag:
//!
//! - a quote opens a quoted field only at the start of a field; elsewhere it is literal,
//! - a delimiter splits fields only outside quotes,
//! - a line break ends the record only outside quotes, so a quoted line break continues the
//!   record onto the next physical line,
//! - a doubled quote inside a quoted field is a literal quote,
//! - unquoted fields are trimmed of surrounding whitespace,
//! - blank lines are skipped.
//!
//! Rows whose field count does not match the record type are dropped and counted in
//! [`Decoded::skipped_rows`] rather than failing the whole load. An unbalanced quote is
//! confined to its own physical line (see [`decode`]).

use crate::constants::{FIELD_DELIMITER, QUOTE};
use crate::records::Record;
use std::borrow::Cow;

/// Result of decoding a collection file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<R> {
    pub records: Vec<R>,
    /// Non-blank rows discarded because their field count was wrong.
    pub skipped_rows: usize,
}

/// Escapes a single field for writing.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == FIELD_DELIMITER || c == QUOTE || c == '\n' || c == '\r')
        || field.trim() != field;

    if !needs_quotes {
        return Cow::Borrowed(field);
    }

    let mut escaped = String::with_capacity(field.len() + 2);
    escaped.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            escaped.push(QUOTE);
        }
        escaped.push(c);
    }
    escaped.push(QUOTE);
    Cow::Owned(escaped)
}

/// Encodes one row of fields, without a trailing newline.
pub fn encode_row<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let mut line = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(FIELD_DELIMITER);
        }
        line.push_str(&escape_field(field));
    }
    line
}

/// Encodes a whole collection, one newline-terminated line per record.
pub fn encode<R: Record>(records: &[R]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&encode_row(record.to_fields()));
        out.push('\n');
    }
    out
}

/// Splits file contents into rows of unescaped fields. Blank lines are skipped.
pub fn parse_rows(contents: &str) -> Vec<Vec<String>> {
    scan_rows(contents).into_iter().map(|row| row.fields).collect()
}

/// Decodes a collection file into records of type `R`.
///
/// A row that ran over several physical lines through an open quote and still has the wrong
/// field count is taken to be an unbalanced quote. Its lines are then decoded one at a time,
/// so the bad quote costs only its own line.
pub fn decode<R: Record>(contents: &str) -> Decoded<R> {
    let mut decoded = Decoded {
        records: Vec::new(),
        skipped_rows: 0,
    };

    for row in scan_rows(contents) {
        if row.fields.len() == R::FIELD_COUNT || !row.text.contains('\n') {
            decoded.push_fields(row.fields);
            continue;
        }
        for line in row.text.lines() {
            for fields in parse_rows(line) {
                decoded.push_fields(fields);
            }
        }
    }

    decoded
}

impl<R: Record> Decoded<R> {
    fn push_fields(&mut self, fields: Vec<String>) {
        if fields.len() != R::FIELD_COUNT {
            self.skipped_rows += 1;
            return;
        }
        match R::from_fields(fields) {
            Some(record) => self.records.push(record),
            None => self.skipped_rows += 1,
        }
    }
}

/// One parsed row and the source text it was read from, without the final line break.
struct ScannedRow<'a> {
    fields: Vec<String>,
    text: &'a str,
}

fn scan_rows(contents: &str) -> Vec<ScannedRow<'_>> {
    let mut rows = Vec::new();
    let mut parser = RowParser::default();
    let mut row_start = 0;
    let mut chars = contents.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let next = chars.peek().map(|&(_, next)| next);

        if parser.in_quotes {
            if c == QUOTE {
                if next == Some(QUOTE) {
                    chars.next();
                    parser.current.push(QUOTE);
                } else {
                    parser.in_quotes = false;
                }
            } else {
                parser.current.push(c);
            }
            continue;
        }

        match c {
            // Only a quote at the start of a field opens quoting; elsewhere it is literal.
            QUOTE if !parser.quoted && parser.current.trim().is_empty() => {
                parser.current.clear();
                parser.in_quotes = true;
                parser.quoted = true;
            }
            FIELD_DELIMITER => parser.finish_field(),
            '\r' if next == Some('\n') => {}
            '\n' => {
                if let Some(fields) = parser.finish_row() {
                    rows.push(ScannedRow {
                        fields,
                        text: &contents[row_start..i],
                    });
                }
                row_start = i + 1;
            }
            // Whitespace between a closing quote and the delimiter is padding.
            c if parser.quoted && c.is_whitespace() => {}
            c => parser.current.push(c),
        }
    }

    if let Some(fields) = parser.finish_row() {
        rows.push(ScannedRow {
            fields,
            text: &contents[row_start..],
        });
    }
    rows
}

#[derive(Default)]
struct RowParser {
    fields: Vec<String>,
    current: String,
    in_quotes: bool,
    quoted: bool,
    row_quoted: bool,
}

impl RowParser {
    fn finish_field(&mut self) {
        let raw = std::mem::take(&mut self.current);
        let value = if self.quoted {
            raw
        } else {
            raw.trim().to_string()
        };
        self.row_quoted |= self.quoted;
        self.quoted = false;
        self.fields.push(value);
    }

    /// Ends the current row; `None` for a blank line.
    fn finish_row(&mut self) -> Option<Vec<String>> {
        self.finish_field();
        self.in_quotes = false;
        let fields = std::mem::take(&mut self.fields);
        let blank = !self.row_quoted && fields.len() == 1 && fields[0].is_empty();
        self.row_quoted = false;
        (!blank).then_some(fields)
    }
}
