//! Record codec for the flat-file store.
//!
//! Rows are RFC 4180 CSV: fields containing a comma, quote, CR or LF are
//! wrapped in double quotes with inner quotes doubled. The reader is a full
//! row parser, so a quoted newline stays inside its record.

use crate::models::attendance_record::{AttendanceRecord, parse_timestamp};
use std::borrow::Cow;

/// Header written to a freshly created attendance file.
pub const HEADER: [&str; 4] = ["Name", "MIS", "Timestamp", "IP Address"];

pub fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Encodes one row, including its trailing newline.
pub fn encode_row(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

pub fn encode_record(record: &AttendanceRecord) -> String {
    encode_row(&[
        record.name.as_str(),
        record.identifier.as_str(),
        record.formatted_timestamp().as_str(),
        record.origin.as_str(),
    ])
}

/// Splits CSV text into rows of unescaped fields. Blank lines are dropped.
pub fn parse_rows(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                if !row.is_empty() || !field.is_empty() {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
            }
            _ => field.push(c),
        }
    }

    if !row.is_empty() || !field.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Converts a parsed row back into a record; `None` if the row is malformed.
pub fn row_to_record(row: &[String]) -> Option<AttendanceRecord> {
    let [name, identifier, timestamp, origin] = row else {
        return None;
    };
    let timestamp = parse_timestamp(timestamp)?;
    Some(AttendanceRecord::new(
        name.as_str(),
        identifier.as_str(),
        timestamp,
        origin.as_str(),
    ))
}

/// Decodes a whole file. Returns the records in storage order and the number
/// of malformed rows that were skipped. A leading header row is not counted.
pub fn decode_records(input: &str) -> (Vec<AttendanceRecord>, usize) {
    let mut records = Vec::new();
    let mut skipped = 0;

    for (i, row) in parse_rows(input).iter().enumerate() {
        if i == 0 && row.iter().map(String::as_str).eq(HEADER) {
            continue;
        }
        match row_to_record(row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    (records, skipped)
}
