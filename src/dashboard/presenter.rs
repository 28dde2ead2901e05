//! Presentation adapters.
//!
//! The coordinator hands every freshly built `DashboardView` to a `Presenter`.
//! `ViewSnapshot` keeps the latest one for the command line, which then renders
//! it as a text report or JSON.

use super::view::DashboardView;
use crate::data::SeverityBucket;

/// Receives each republished view.
pub trait Presenter {
    fn publish(&mut self, view: &DashboardView) -> anyhow::Result<()>;
}

/// Presenter that remembers the most recent view and how many were published.
#[derive(Debug, Default)]
pub struct ViewSnapshot {
    latest: Option<DashboardView>,
    published: usize,
}

impl ViewSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&DashboardView> {
        self.latest.as_ref()
    }

    #[cfg(test)]
    pub fn published(&self) -> usize {
        self.published
    }
}

impl Presenter for ViewSnapshot {
    fn publish(&mut self, view: &DashboardView) -> anyhow::Result<()> {
        self.latest = Some(view.clone());
        self.published += 1;
        Ok(())
    }
}

fn criterion_text(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "all",
    }
}

/// Plain-text report of a view.
pub struct TextReport<'a>(pub &'a DashboardView);

impl std::fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let view = self.0;
        let stats = &view.statistics;

        writeln!(f, "ICS Advisory Dashboard")?;
        writeln!(
            f,
            "Filters: severity={} vendor={}",
            criterion_text(view.criteria.severity.as_deref()),
            criterion_text(view.criteria.vendor.as_deref())
        )?;
        writeln!(f, "Total advisories: {}", stats.total)?;
        let buckets: Vec<String> = SeverityBucket::ALL
            .iter()
            .map(|bucket| format!("{}: {}", bucket, stats.severity.get(*bucket)))
            .collect();
        writeln!(f, "{}", buckets.join("  "))?;

        writeln!(f, "\nTop vendors")?;
        if view.vendor_chart.is_empty() {
            writeln!(f, "  (no data)")?;
        }
        for entry in &view.vendor_chart {
            writeln!(f, "  {:<40} {:>5}", entry.vendor, entry.count)?;
        }

        writeln!(f, "\nAdvisories published per month")?;
        if view.timeline_chart.is_empty() {
            writeln!(f, "  (no data)")?;
        }
        for bucket in &view.timeline_chart {
            writeln!(f, "  {:<8} {:>5}", bucket.label, bucket.count)?;
        }

        let table = &view.table;
        writeln!(
            f,
            "\nPage {} of {} ({} advisories)",
            table.page,
            table.total_pages.max(1),
            table.total_records
        )?;
        if let Some(message) = &table.message {
            return writeln!(f, "  {}", message);
        }
        writeln!(f, "ID | Title | Vendor | Severity | CVSS | Published")?;
        for row in &table.rows {
            writeln!(
                f,
                "{} | {} | {} | {} | {} | {}",
                row.id, row.title, row.vendor, row.severity_label, row.cvss_score, row.publication_date
            )?;
        }
        Ok(())
    }
}

/// Render a view as a plain-text report.
pub fn render_text(view: &DashboardView) -> String {
    TextReport(view).to_string()
}

/// Render a view as pretty-printed JSON.
pub fn render_json(view: &DashboardView) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}
