//! Map raw CSV rows onto the canonical `AdvisoryRecord` shape.
//!
//! Two source schemas are accepted: the CISA master feed and the bundled
//! sample data. Each canonical field resolves through an ordered alias list;
//! the first alias holding a non-empty value wins.

use super::types::{AdvisoryRecord, RawRecord};

pub const ID_ALIASES: &[&str] = &["ICS-CERT_Number", "Advisory ID"];
pub const TITLE_ALIASES: &[&str] = &["ICS-CERT_Advisory_Title", "Title"];
pub const VENDOR_ALIASES: &[&str] = &["Vendor"];
pub const SEVERITY_ALIASES: &[&str] = &["Severity", "CVSS_Severity"];
pub const CVSS_SCORE_ALIASES: &[&str] = &["CVSS Score", "Cumulative_CVSS"];
pub const PUBLICATION_DATE_ALIASES: &[&str] = &["Publication Date", "Original_Release_Date"];

/// Alias lists in canonical field order.
pub const FIELD_ALIASES: [&[&str]; 6] = [
    ID_ALIASES,
    TITLE_ALIASES,
    VENDOR_ALIASES,
    SEVERITY_ALIASES,
    CVSS_SCORE_ALIASES,
    PUBLICATION_DATE_ALIASES,
];

/// Resolve a field through its alias list. Missing everywhere means empty.
fn lookup(row: &RawRecord, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Whether a header list carries any identifier column at all.
pub fn has_identifier_column(headers: &[String]) -> bool {
    headers.iter().any(|h| ID_ALIASES.contains(&h.as_str()))
}

/// Normalize a single row.
///
/// # Returns
///
/// `None` when the row has no identifier; such rows are not admitted.
pub fn normalize(row: &RawRecord) -> Option<AdvisoryRecord> {
    let id = lookup(row, ID_ALIASES);
    if id.is_empty() {
        return None;
    }

    Some(AdvisoryRecord {
        id,
        title: lookup(row, TITLE_ALIASES),
        vendor: lookup(row, VENDOR_ALIASES),
        severity: lookup(row, SEVERITY_ALIASES),
        cvss_score: lookup(row, CVSS_SCORE_ALIASES),
        publication_date: lookup(row, PUBLICATION_DATE_ALIASES),
    })
}

/// Normalize rows in order, dropping the ones without an identifier.
pub fn normalize_all(rows: &[RawRecord]) -> Vec<AdvisoryRecord> {
    let records: Vec<AdvisoryRecord> = rows.iter().filter_map(normalize).collect();
    let skipped = rows.len() - records.len();
    if skipped > 0 {
        log::debug!("Skipped {} rows without an advisory identifier", skipped);
    }
    records
}
