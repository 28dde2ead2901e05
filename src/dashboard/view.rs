//! Presentation-ready view models.
//!
//! These are plain data handed to whatever draws the dashboard. Nothing here
//! touches the dataset state; every value is built from slices passed in.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::data::aggregator::split_vendors;
use crate::data::{AdvisoryRecord, Aggregates, FilterCriteria, MonthlyBucket, SeverityBucket, SeverityCounts, VendorCount};

/// Table body text when nothing could be loaded at all.
pub const NO_DATA_MESSAGE: &str = "No advisory data could be loaded.";
/// Table body text when the current filters leave nothing to show.
pub const NO_MATCH_MESSAGE: &str = "No data matches the current filters.";
/// Severity label for rows without any severity text.
pub const UNKNOWN_SEVERITY: &str = "Unknown";

/// Summary statistics card values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatisticsView {
    /// Number of advisories passing the current filters.
    pub total: usize,
    pub severity: SeverityCounts,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryRow {
    pub id: String,
    pub title: String,
    pub vendor: String,
    /// Severity text, or `Unknown` when the record has none.
    pub severity_label: String,
    /// Badge style class derived from the severity bucket.
    pub badge_class: &'static str,
    pub cvss_score: String,
    pub publication_date: String,
}

impl From<&AdvisoryRecord> for AdvisoryRow {
    fn from(record: &AdvisoryRecord) -> Self {
        let severity_label = if record.severity.is_empty() {
            UNKNOWN_SEVERITY.to_string()
        } else {
            record.severity.clone()
        };
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            vendor: record.vendor.clone(),
            severity_label,
            badge_class: badge_class(&record.severity),
            cvss_score: record.cvss_score.clone(),
            publication_date: record.publication_date.clone(),
        }
    }
}

/// Badge class for a severity text, using the histogram's bucket order.
pub fn badge_class(severity: &str) -> &'static str {
    match SeverityBucket::classify(severity) {
        Some(SeverityBucket::Critical) => "bg-danger",
        Some(SeverityBucket::High) => "bg-warning",
        Some(SeverityBucket::Medium) => "bg-info",
        Some(SeverityBucket::Low) => "bg-success",
        None => "bg-secondary",
    }
}

/// The visible slice of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TablePage {
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_records: usize,
    pub rows: Vec<AdvisoryRow>,
    /// Inline message that replaces the table body when there are no rows.
    pub message: Option<String>,
}

/// Number of pages needed for `len` rows.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 { 0 } else { len.div_ceil(page_size) }
}

/// Everything the dashboard shows at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub criteria: FilterCriteria,
    pub statistics: StatisticsView,
    pub vendor_chart: Vec<VendorCount>,
    pub timeline_chart: Vec<MonthlyBucket>,
    pub table: TablePage,
    /// Choices for the vendor filter control, drawn from the full dataset.
    pub vendor_options: Vec<String>,
}

/// Distinct vendor names across `records`, sorted ascending.
pub fn vendor_options(records: &[AdvisoryRecord]) -> Vec<String> {
    let names: BTreeSet<&str> = records.iter().flat_map(|r| split_vendors(&r.vendor)).collect();
    names.into_iter().map(str::to_string).collect()
}

/// Inputs for [`build_view`], borrowed from the coordinator's state.
pub struct ViewInputs<'a> {
    pub criteria: &'a FilterCriteria,
    pub full: &'a [AdvisoryRecord],
    pub filtered: &'a [AdvisoryRecord],
    pub aggregates: Aggregates,
    pub page: usize,
    pub page_size: usize,
    pub page_rows: &'a [AdvisoryRecord],
}

/// Assemble a complete view.
pub fn build_view(inputs: ViewInputs<'_>) -> DashboardView {
    let message = if !inputs.page_rows.is_empty() {
        None
    } else if inputs.full.is_empty() {
        Some(NO_DATA_MESSAGE.to_string())
    } else {
        Some(NO_MATCH_MESSAGE.to_string())
    };

    DashboardView {
        criteria: inputs.criteria.clone(),
        statistics: StatisticsView {
            total: inputs.filtered.len(),
            severity: inputs.aggregates.severity,
        },
        vendor_chart: inputs.aggregates.vendors,
        timeline_chart: inputs.aggregates.timeline,
        table: TablePage {
            page: inputs.page,
            page_size: inputs.page_size,
            total_pages: total_pages(inputs.filtered.len(), inputs.page_size),
            total_records: inputs.filtered.len(),
            rows: inputs.page_rows.iter().map(AdvisoryRow::from).collect(),
            message,
        },
        vendor_options: vendor_options(inputs.full),
    }
}
