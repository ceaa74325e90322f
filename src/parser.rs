use std::io::Read;

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, VarsentryError};
use crate::model::ParseResult;

/// Parse dotenv entries from UTF-8 text.
///
/// Malformed lines never stop the parse: each one is recorded in
/// [`ParseResult::errors`] and the remaining lines are still read.
pub fn parse(input: &str) -> ParseResult {
    let mut values = IndexMap::new();
    let mut errors = Vec::new();
    let mut line_count = 0usize;

    for (idx, segment) in input.split('\n').enumerate() {
        line_count += 1;
        let line = segment.strip_suffix('\r').unwrap_or(segment);
        let line_num = u32::try_from(idx + 1).unwrap_or(u32::MAX);

        match parse_line(line) {
            Line::Skip => {
                tracing::trace!(line = line_num, "skipping blank or comment line");
            }
            Line::Entry(key, value) => {
                values.insert(key.to_owned(), value.to_owned());
            }
            Line::Malformed(kind) => {
                errors.push(VarsentryError::at_line(kind, line_num, line));
            }
        }
    }

    tracing::debug!(
        lines = line_count,
        entries = values.len(),
        errors = errors.len(),
        "parsed dotenv input"
    );

    ParseResult {
        values,
        errors,
        line_count,
    }
}

/// Parse dotenv entries from UTF-8 bytes.
pub fn parse_bytes(input: &[u8]) -> Result<ParseResult, Error> {
    let text = std::str::from_utf8(input)?;
    Ok(parse(text))
}

/// Parse dotenv entries from a reader.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<ParseResult, Error> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse_bytes(&buf)
}

enum Line<'a> {
    Skip,
    Entry(&'a str, &'a str),
    Malformed(ErrorKind),
}

/// Trim whitespace and byte-order marks, so a BOM-prefixed first line parses
/// like any other.
fn trim_line(text: &str) -> &str {
    text.trim_matches(|ch: char| ch.is_whitespace() || ch == '\u{feff}')
}

fn parse_line(line: &str) -> Line<'_> {
    let trimmed = trim_line(line);
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Line::Skip;
    }

    let Some((raw_key, value)) = line.split_once('=') else {
        return Line::Malformed(ErrorKind::ParseMissingEquals);
    };

    let key = trim_line(raw_key);
    if key.is_empty() {
        return Line::Malformed(ErrorKind::ParseInvalidLine);
    }

    Line::Entry(key, value)
}
