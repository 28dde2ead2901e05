//! Decode advisory CSV text into header-keyed rows.
//!
//! The decoder is deliberately forgiving: it never fails. A double quote
//! toggles quoted mode, commas inside quotes are kept as data, and an
//! unterminated quote simply runs to the end of its line. Quote characters
//! never appear in emitted values. Embedded newlines inside quoted fields are
//! not supported; every physical line is one row.

use super::types::RawRecord;

/// Header names plus the rows decoded against them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRecord>,
}

/// Parse CSV text into rows keyed by header name.
///
/// # Returns
///
/// One `RawRecord` per non-blank data line, in input order. Blank or
/// whitespace-only input yields an empty vector.
#[allow(dead_code)]
pub fn parse_csv(text: &str) -> Vec<RawRecord> {
    parse_csv_table(text).rows
}

/// Parse CSV text, keeping the header list alongside the rows.
pub fn parse_csv_table(text: &str) -> CsvTable {
    // A leading byte-order mark is not part of the first header name.
    let trimmed = text.strip_prefix('\u{feff}').unwrap_or(text).trim();
    if trimmed.is_empty() {
        return CsvTable::default();
    }

    let mut lines = trimmed.split('\n');
    let headers = match lines.next() {
        Some(line) => parse_header(line),
        None => return CsvTable::default(),
    };

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let values = parse_csv_line(line);
        let mut record = RawRecord::new();
        // Short rows pad with empty strings, extra values are dropped.
        for (index, header) in headers.iter().enumerate() {
            let value = values.get(index).cloned().unwrap_or_default();
            record.insert(header.clone(), value);
        }
        rows.push(record);
    }

    log::debug!("Parsed {} CSV rows against {} headers", rows.len(), headers.len());
    CsvTable { headers, rows }
}

/// Split the header line on every comma, then trim and strip quotes.
///
/// Header names are not expected to contain commas, so quoted mode is not
/// honoured here.
pub fn parse_header(line: &str) -> Vec<String> {
    line.split(',').map(|h| h.trim().replace('"', "")).collect()
}

/// Split a single data line into trimmed field values.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    values.push(current.trim().to_string());
    values
}
