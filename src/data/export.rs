//! Serialize advisories back to CSV text for download.
//!
//! Values are written as-is: no quoting or escaping. A field that contains a
//! comma will therefore split into two columns if the output is parsed again.

use super::normalizer::FIELD_ALIASES;
use super::types::AdvisoryRecord;

/// Header row: the first alias of every canonical field, in canonical order.
pub fn export_header() -> String {
    FIELD_ALIASES.iter().map(|aliases| aliases[0]).collect::<Vec<_>>().join(",")
}

/// Render `records` as CSV, header first, one line per record.
pub fn to_csv(records: &[AdvisoryRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(export_header());
    for record in records {
        lines.push(
            [
                record.id.as_str(),
                record.title.as_str(),
                record.vendor.as_str(),
                record.severity.as_str(),
                record.cvss_score.as_str(),
                record.publication_date.as_str(),
            ]
            .join(","),
        );
    }
    lines.join("\n")
}
