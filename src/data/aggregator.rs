//! Derived statistics over any slice of advisories.
//!
//! Every function here is pure and recomputes from scratch: a severity
//! histogram, a vendor frequency ranking and a monthly publication series.

use super::types::{AdvisoryRecord, SeverityBucket};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Number of vendors kept in the ranking.
pub const TOP_VENDORS: usize = 10;

/// Number of most recent months kept in the timeline.
pub const TIMELINE_MONTHS: usize = 12;

/// Date-only layouts tried after RFC 3339 and the date-time layouts.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Count of records per severity bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn get(&self, bucket: SeverityBucket) -> usize {
        match bucket {
            SeverityBucket::Critical => self.critical,
            SeverityBucket::High => self.high,
            SeverityBucket::Medium => self.medium,
            SeverityBucket::Low => self.low,
        }
    }

    fn increment(&mut self, bucket: SeverityBucket) {
        match bucket {
            SeverityBucket::Critical => self.critical += 1,
            SeverityBucket::High => self.high += 1,
            SeverityBucket::Medium => self.medium += 1,
            SeverityBucket::Low => self.low += 1,
        }
    }
}

/// One entry of the vendor ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorCount {
    pub vendor: String,
    pub count: usize,
}

/// One calendar month of the publication timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    /// Sortable `YYYY-MM` key.
    pub key: String,
    /// Short display label such as `Jan 24`.
    pub label: String,
    pub count: usize,
}

/// All three aggregates for one record slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub severity: SeverityCounts,
    pub vendors: Vec<VendorCount>,
    pub timeline: Vec<MonthlyBucket>,
}

/// Compute every aggregate over `records`.
pub fn aggregate(records: &[AdvisoryRecord]) -> Aggregates {
    Aggregates {
        severity: severity_counts(records),
        vendors: vendor_histogram(records),
        timeline: monthly_series(records),
    }
}

/// Histogram over the four severity buckets.
///
/// A record lands in at most one bucket (first match in priority order).
/// Records matching no bucket are not counted anywhere.
pub fn severity_counts(records: &[AdvisoryRecord]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for bucket in records.iter().filter_map(|r| SeverityBucket::classify(&r.severity)) {
        counts.increment(bucket);
    }
    counts
}

/// Split a vendor field into trimmed, non-empty names.
pub fn split_vendors(vendor: &str) -> impl Iterator<Item = &str> {
    vendor.split(',').map(str::trim).filter(|v| !v.is_empty())
}

/// Rank vendors by advisory count, top [`TOP_VENDORS`] only.
///
/// Multi-vendor records count once for each listed vendor. Equal counts keep
/// the order in which vendors were first seen.
pub fn vendor_histogram(records: &[AdvisoryRecord]) -> Vec<VendorCount> {
    let mut ranking: Vec<VendorCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for vendor in records.iter().flat_map(|r| split_vendors(&r.vendor)) {
        match positions.get(vendor) {
            Some(&index) => ranking[index].count += 1,
            None => {
                positions.insert(vendor, ranking.len());
                ranking.push(VendorCount {
                    vendor: vendor.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, which gives the first-seen tie order.
    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking.truncate(TOP_VENDORS);
    ranking
}

/// Parse publication date text into a calendar date.
///
/// # Returns
///
/// `None` for empty or unrecognised text.
pub fn parse_publication_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATE_TIME_FORMATS.iter().find_map(|f| NaiveDateTime::parse_from_str(text, f).ok()) {
        return Some(dt.date());
    }
    DATE_FORMATS.iter().find_map(|f| NaiveDate::parse_from_str(text, f).ok())
}

/// Count advisories per publication month, most recent [`TIMELINE_MONTHS`] only.
///
/// Records whose date does not parse are skipped here and nowhere else.
/// Buckets come back in ascending `YYYY-MM` order.
pub fn monthly_series(records: &[AdvisoryRecord]) -> Vec<MonthlyBucket> {
    let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        match parse_publication_date(&record.publication_date) {
            Some(date) => *months.entry((date.year(), date.month())).or_insert(0) += 1,
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        log::debug!("{} records without a usable publication date left out of the timeline", skipped);
    }

    let keep_from = months.len().saturating_sub(TIMELINE_MONTHS);
    months
        .into_iter()
        .skip(keep_from)
        .map(|((year, month), count)| MonthlyBucket {
            key: format!("{:04}-{:02}", year, month),
            label: month_label(year, month),
            count,
        })
        .collect()
}

/// Short month label, e.g. `Jan 24`.
fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %y").to_string())
        .unwrap_or_else(|| format!("{:04}-{:02}", year, month))
}
