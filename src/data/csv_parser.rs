//! CSV and TSV parsing
//!
//! Parses a delimited-text resource into a [`ParsedTable`]: the first record is
//! the header, blank lines are skipped and every field is coerced through
//! [`DataCell::parse`].
//!
//! ## Memory Limits
//!
//! To prevent unbounded memory growth:
//! - Bodies larger than 100MB are rejected (see [`MAX_CSV_SIZE_MB`])
//! - Bodies with more than 100,000 records are rejected (see [`MAX_CSV_ROWS`])

use crate::constants::{MAX_CSV_ROWS, MAX_CSV_SIZE_MB};
use crate::data::error::{DataError, DataResult};
use crate::types::{DataCell, ParsedTable, RawRecord};

/// Parse a raw resource body
///
/// Checks the size limit, decodes UTF-8 (dropping a leading byte order mark)
/// and detects the delimiter from content.
pub fn parse_csv_bytes(body: &[u8]) -> DataResult<ParsedTable> {
    let size_mb = body.len() as u64 / (1024 * 1024);
    if size_mb > MAX_CSV_SIZE_MB as u64 {
        return Err(DataError::TooLarge {
            size_mb,
            max_mb: MAX_CSV_SIZE_MB,
        });
    }

    let content =
        std::str::from_utf8(body).map_err(|e| DataError::InvalidEncoding(e.to_string()))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let delimiter = detect_delimiter(content);
    parse_csv_content(content, delimiter)
}

/// Parse CSV/TSV content from a string
///
/// # Memory Limits
/// - Content resulting in more than [`MAX_CSV_ROWS`] records will return [`DataError::TooManyRows`]
pub fn parse_csv_content(content: &str, delimiter: char) -> DataResult<ParsedTable> {
    let mut records = split_records(content, delimiter)?.into_iter();

    let headers: Vec<String> = records
        .next()
        .ok_or(DataError::EmptyFile)?
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataError::NoColumns);
    }

    let mut rows: Vec<RawRecord> = Vec::new();
    for fields in records {
        if rows.len() >= MAX_CSV_ROWS {
            return Err(DataError::TooManyRows {
                rows: rows.len() + 1,
                max_rows: MAX_CSV_ROWS,
            });
        }
        rows.push(RawRecord::new(
            fields.iter().map(|f| DataCell::parse(f)).collect(),
        ));
    }

    Ok(ParsedTable {
        headers,
        records: rows,
        delimiter,
    })
}

/// Detect the delimiter from the first few lines
pub fn detect_delimiter(content: &str) -> char {
    let first_lines: String = content.lines().take(5).collect::<Vec<_>>().join("\n");

    let comma_count = first_lines.matches(',').count();
    let tab_count = first_lines.matches('\t').count();
    let semicolon_count = first_lines.matches(';').count();

    if tab_count > comma_count && tab_count > semicolon_count {
        '\t'
    } else if semicolon_count > comma_count {
        ';'
    } else {
        ','
    }
}

/// Split content into records of unquoted fields.
///
/// Quoted fields may contain delimiters, doubled quotes and line breaks.
/// Blank lines produce no record.
fn split_records(content: &str, delimiter: char) -> DataResult<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line = 1;
    let mut quote_line = 0;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                in_quotes = true;
                quote_line = line;
                at_field_start = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
                at_field_start = true;
                line += 1;
            }
            c if c == delimiter => {
                record.push(std::mem::take(&mut field));
                at_field_start = true;
            }
            _ => {
                field.push(c);
                at_field_start = false;
            }
        }
    }

    if in_quotes {
        return Err(DataError::UnterminatedQuote { line: quote_line });
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.len() == 1 && record[0].trim().is_empty();
    if !blank {
        records.push(record);
    }
}
