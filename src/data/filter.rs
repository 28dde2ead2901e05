//! Severity and vendor filtering over normalized advisories.

use super::types::AdvisoryRecord;
use serde::Serialize;

/// Sentinel criterion value meaning "no restriction".
pub const ALL: &str = "all";

/// User-selected filter criteria. `None`, empty, or `all` disables a criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub severity: Option<String>,
    pub vendor: Option<String>,
}

impl FilterCriteria {
    pub fn new(severity: Option<String>, vendor: Option<String>) -> Self {
        Self { severity, vendor }
    }

    /// Whether the record satisfies both criteria.
    pub fn matches(&self, record: &AdvisoryRecord) -> bool {
        passes(self.severity.as_deref(), &record.severity) && passes(self.vendor.as_deref(), &record.vendor)
    }

    /// True when neither criterion restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        active_needle(self.severity.as_deref()).is_none() && active_needle(self.vendor.as_deref()).is_none()
    }
}

/// Lower-cased needle for an active criterion, `None` when inactive.
///
/// Only the sentinel check ignores surrounding whitespace; an active needle
/// is matched exactly as given.
fn active_needle(criterion: Option<&str>) -> Option<String> {
    let value = criterion?;
    if value.is_empty() || value.trim().eq_ignore_ascii_case(ALL) {
        return None;
    }
    Some(value.to_lowercase())
}

/// Case-insensitive substring test against the whole field text.
fn passes(criterion: Option<&str>, text: &str) -> bool {
    match active_needle(criterion) {
        Some(needle) => text.to_lowercase().contains(&needle),
        None => true,
    }
}

/// Return the records matching `criteria`, preserving input order.
pub fn filter_records(records: &[AdvisoryRecord], criteria: &FilterCriteria) -> Vec<AdvisoryRecord> {
    records.iter().filter(|record| criteria.matches(record)).cloned().collect()
}
