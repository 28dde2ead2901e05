//! # Dashboard Coordination
//!
//! `Dashboard` sequences the advisory pipeline and owns the only mutable
//! session state, a `DatasetState` value.
//!
//! ## Responsibilities
//!
//! - Loads the primary source, falling back to the sample source, and finally
//!   to an empty dataset. Load failures never escape `load`.
//! - Re-runs the filter on every criteria change and resets to page 1
//! - Rebuilds all aggregates from scratch and publishes a new view
//!
//! ## State Management
//!
//! `DatasetState` is replaced wholesale on every derivation step. The full
//! dataset is shared behind an `Rc` so that a refilter only allocates the new
//! filtered slice.

use std::rc::Rc;

use super::presenter::Presenter;
use super::view::{DashboardView, ViewInputs, build_view, total_pages};
use crate::data::{AdvisoryRecord, FilterCriteria, aggregate, filter_records, has_identifier_column, normalize_all, parse_csv_table, to_csv};
use crate::source::{AdvisoryFetcher, DashboardConfig, LoadError, SourceLocation};

/// Dataset snapshot owned by the coordinator.
#[derive(Debug, Clone)]
pub struct DatasetState {
    /// Every admitted record from the last load.
    pub full_dataset: Rc<[AdvisoryRecord]>,
    /// Records passing the current criteria, in original order.
    pub filtered_dataset: Rc<[AdvisoryRecord]>,
    /// 1-based page cursor over `filtered_dataset`.
    pub current_page: usize,
    pub page_size: usize,
}

impl DatasetState {
    /// Empty state, as before the first load or after every source failed.
    pub fn empty(page_size: usize) -> Self {
        Self::loaded(Vec::new(), page_size, &FilterCriteria::default())
    }

    /// Fresh state for a newly loaded dataset.
    pub fn loaded(records: Vec<AdvisoryRecord>, page_size: usize, criteria: &FilterCriteria) -> Self {
        let full: Rc<[AdvisoryRecord]> = Rc::from(records);
        let filtered = if criteria.is_unrestricted() {
            Rc::clone(&full)
        } else {
            Rc::from(filter_records(&full, criteria))
        };
        Self {
            full_dataset: full,
            filtered_dataset: filtered,
            current_page: 1,
            page_size,
        }
    }

    /// New state with the filter re-run and the cursor back on page 1.
    pub fn refiltered(&self, criteria: &FilterCriteria) -> Self {
        Self {
            full_dataset: Rc::clone(&self.full_dataset),
            filtered_dataset: Rc::from(filter_records(&self.full_dataset, criteria)),
            current_page: 1,
            page_size: self.page_size,
        }
    }

    /// New state pointing at another page.
    pub fn at_page(&self, page: usize) -> Self {
        Self {
            current_page: page,
            ..self.clone()
        }
    }

    /// Slice `[(n-1)*size, n*size)` of the filtered records; empty when out of range.
    pub fn page(&self, n: usize) -> &[AdvisoryRecord] {
        if n == 0 {
            return &[];
        }
        let len = self.filtered_dataset.len();
        let start = (n - 1).saturating_mul(self.page_size);
        if start >= len {
            return &[];
        }
        let end = start.saturating_add(self.page_size).min(len);
        &self.filtered_dataset[start..end]
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_dataset.len(), self.page_size)
    }
}

/// Which source ended up populating the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Primary feed, with the number of admitted records.
    Primary(usize),
    /// Sample data after the primary failed.
    Fallback(usize),
    /// Both sources failed; the dataset is empty.
    Empty,
}

/// The view coordinator.
pub struct Dashboard<F: AdvisoryFetcher, P: Presenter> {
    fetcher: F,
    presenter: P,
    config: DashboardConfig,
    criteria: FilterCriteria,
    state: DatasetState,
}

impl<F: AdvisoryFetcher, P: Presenter> Dashboard<F, P> {
    pub fn new(fetcher: F, presenter: P, config: DashboardConfig) -> Self {
        let state = DatasetState::empty(config.page_size.max(1));
        Self {
            fetcher,
            presenter,
            config,
            criteria: FilterCriteria::default(),
            state,
        }
    }

    /// Fetch, parse and normalize one configured source.
    fn load_source(&self, source: &str) -> Result<Vec<AdvisoryRecord>, LoadError> {
        let location = SourceLocation::resolve(self.config.base_url.as_deref(), source)?;
        let text = self.fetcher.fetch(&location)?;

        let table = parse_csv_table(&text);
        if table.headers.iter().all(|h| h.is_empty()) {
            return Err(LoadError::Unusable(format!("{} has no header line", location)));
        }
        if !has_identifier_column(&table.headers) {
            return Err(LoadError::Unusable(format!("{} has no advisory identifier column", location)));
        }
        Ok(normalize_all(&table.rows))
    }

    /// Replace the dataset from the primary source, or the fallback, or nothing.
    ///
    /// Current criteria are re-applied to the new dataset and the cursor
    /// returns to page 1. Never fails: total failure leaves an empty dataset.
    pub fn load(&mut self) -> LoadOutcome {
        log::info!("Loading ICS advisory data...");

        let (records, outcome) = match self.load_source(&self.config.primary_source) {
            Ok(records) => {
                log::info!("Loaded {} advisory records", records.len());
                let count = records.len();
                (records, LoadOutcome::Primary(count))
            }
            Err(e) => {
                log::warn!("Error loading CSV data: {}", e);
                log::info!("Loading sample data...");
                match self.load_source(&self.config.fallback_source) {
                    Ok(records) => {
                        log::info!("Loaded {} sample records (fallback)", records.len());
                        let count = records.len();
                        (records, LoadOutcome::Fallback(count))
                    }
                    Err(e) => {
                        log::error!("Error loading sample data: {}", e);
                        (Vec::new(), LoadOutcome::Empty)
                    }
                }
            }
        };

        self.state = DatasetState::loaded(records, self.state.page_size, &self.criteria);
        self.publish();
        outcome
    }

    /// Re-filter the full dataset, reset to page 1 and republish.
    pub fn apply_filters(&mut self, criteria: FilterCriteria) {
        self.state = self.state.refiltered(&criteria);
        self.criteria = criteria;
        log::debug!(
            "Filters applied: {} of {} advisories match",
            self.state.filtered_dataset.len(),
            self.state.full_dataset.len()
        );
        self.publish();
    }

    /// Move the table cursor. Out-of-range pages are ignored.
    ///
    /// # Returns
    ///
    /// `true` when the page changed and a new view was published.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page == 0 || page > self.state.total_pages() || page == self.state.current_page {
            return false;
        }
        self.state = self.state.at_page(page);
        self.publish();
        true
    }

    /// Records on page `n` of the filtered dataset.
    pub fn get_page(&self, n: usize) -> &[AdvisoryRecord] {
        self.state.page(n)
    }

    /// Build the current view from scratch.
    pub fn view(&self) -> DashboardView {
        let state = &self.state;
        build_view(ViewInputs {
            criteria: &self.criteria,
            full: &state.full_dataset,
            filtered: &state.filtered_dataset,
            aggregates: aggregate(&state.filtered_dataset),
            page: state.current_page,
            page_size: state.page_size,
            page_rows: self.get_page(state.current_page),
        })
    }

    /// Filtered records as CSV text for download.
    pub fn export_filtered(&self) -> String {
        to_csv(&self.state.filtered_dataset)
    }

    #[cfg(test)]
    pub fn state(&self) -> &DatasetState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn publish(&mut self) {
        let view = self.view();
        if let Err(e) = self.presenter.publish(&view) {
            log::warn!("Failed to publish dashboard view: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::presenter::ViewSnapshot;
    use crate::dashboard::view::{NO_DATA_MESSAGE, NO_MATCH_MESSAGE};
    use crate::data::SeverityCounts;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const MASTER_CSV: &str = "ICS-CERT_Number,ICS-CERT_Advisory_Title,Vendor,CVSS_Severity,Cumulative_CVSS,Original_Release_Date
ICSA-24-011-01,Acme PLC,\"Siemens, Schneider Electric\",Critical,9.8,2024-01-11
ICSA-24-015-02,Pump Controller,Siemens,High - CVSS 8.5,8.5,2024-01-15
,Missing identifier,Acme,Low,2.0,2024-01-20
ICSA-24-032-01,HMI Panel,Rockwell Automation,critical/high,9.1,2024-02-01
ICSA-24-040-01,Gateway,ABB,Medium,5.0,not a date
";

    const SAMPLE_CSV: &str = "Advisory ID,Title,Vendor,Severity,CVSS Score,Publication Date
SAMPLE-001,Sample advisory,Acme,Low,3.1,2023-12-01
";

    /// Serves canned responses keyed by location text and records each request.
    #[derive(Default)]
    struct StubFetcher {
        responses: HashMap<String, Result<String, u16>>,
        requests: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn with(mut self, location: &str, response: Result<&str, u16>) -> Self {
            self.responses.insert(location.to_string(), response.map(str::to_string));
            self
        }
    }

    impl AdvisoryFetcher for StubFetcher {
        fn fetch(&self, location: &SourceLocation) -> Result<String, LoadError> {
            let key = location.to_string();
            self.requests.borrow_mut().push(key.clone());
            match self.responses.get(&key) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(LoadError::Status(*status)),
                None => Err(LoadError::Network("connection refused".to_string())),
            }
        }
    }

    fn config(page_size: usize) -> DashboardConfig {
        DashboardConfig {
            base_url: Some("https://example.org/dash/".to_string()),
            primary_source: "master.csv".to_string(),
            fallback_source: "sample.csv".to_string(),
            page_size,
            ..Default::default()
        }
    }

    const PRIMARY_URL: &str = "https://example.org/dash/master.csv";
    const FALLBACK_URL: &str = "https://example.org/dash/sample.csv";

    fn loaded_dashboard(page_size: usize) -> Dashboard<StubFetcher, ViewSnapshot> {
        let fetcher = StubFetcher::default().with(PRIMARY_URL, Ok(MASTER_CSV));
        let mut dashboard = Dashboard::new(fetcher, ViewSnapshot::new(), config(page_size));
        assert_eq!(dashboard.load(), LoadOutcome::Primary(4));
        dashboard
    }

    fn ids(records: &[AdvisoryRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_load_primary_admits_identified_rows() {
        let dashboard = loaded_dashboard(50);
        let state = dashboard.state();
        assert_eq!(
            ids(&state.full_dataset),
            vec!["ICSA-24-011-01", "ICSA-24-015-02", "ICSA-24-032-01", "ICSA-24-040-01"]
        );
        assert_eq!(state.filtered_dataset.len(), 4);
        assert_eq!(state.current_page, 1);
        assert_eq!(dashboard.presenter().published(), 1);
        assert_eq!(*dashboard.fetcher.requests.borrow(), vec![PRIMARY_URL.to_string()]);
    }

    #[test]
    fn test_load_primary_with_byte_order_mark() {
        let fetcher = StubFetcher::default().with(PRIMARY_URL, Ok("\u{feff}ICS-CERT_Number,Vendor\nICSA-1,Siemens\n"));
        let mut dashboard = Dashboard::new(fetcher, ViewSnapshot::new(), config(50));
        assert_eq!(dashboard.load(), LoadOutcome::Primary(1));
        assert_eq!(dashboard.state().full_dataset[0].vendor, "Siemens");
    }

    #[test]
    fn test_load_falls_back_on_status_error() {
        let fetcher = StubFetcher::default().with(PRIMARY_URL, Err(404)).with(FALLBACK_URL, Ok(SAMPLE_CSV));
        let mut dashboard = Dashboard::new(fetcher, ViewSnapshot::new(), config(50));
        assert_eq!(dashboard.load(), LoadOutcome::Fallback(1));
        assert_eq!(ids(&dashboard.state().full_dataset), vec!["SAMPLE-001"]);
        assert_eq!(dashboard.state().full_dataset[0].cvss_score, "3.1");
    }

    #[test]
    fn test_load_falls_back_on_unusable_payload() {
        let fetcher = StubFetcher::default()
            .with(PRIMARY_URL, Ok("<html>Not Found</html>"))
            .with(FALLBACK_URL, Ok(SAMPLE_CSV));
        let mut dashboard = Dashboard::new(fetcher, ViewSnapshot::new(), config(50));
        assert_eq!(dashboard.load(), LoadOutcome::Fallback(1));

        let empty = StubFetcher::default().with(PRIMARY_URL, Ok("  \n")).with(FALLBACK_URL, Ok(SAMPLE_CSV));
        let mut dashboard = Dashboard::new(empty, ViewSnapshot::new(), config(50));
        assert_eq!(dashboard.load(), LoadOutcome::Fallback(1));
    }

    #[test]
    fn test_load_total_failure_is_empty_not_fatal() {
        let mut dashboard = Dashboard::new(StubFetcher::default(), ViewSnapshot::new(), config(50));
        assert_eq!(dashboard.load(), LoadOutcome::Empty);
        assert!(dashboard.state().full_dataset.is_empty());

        let view = dashboard.presenter().latest().unwrap();
        assert_eq!(view.statistics.total, 0);
        assert_eq!(view.statistics.severity, SeverityCounts::default());
        assert!(view.vendor_chart.is_empty());
        assert!(view.timeline_chart.is_empty());
        assert_eq!(view.table.message.as_deref(), Some(NO_DATA_MESSAGE));
        assert!(dashboard.get_page(1).is_empty());
    }

    #[test]
    fn test_apply_filters_recomputes_and_resets_page() {
        let mut dashboard = loaded_dashboard(1);
        assert!(dashboard.set_page(3));
        assert_eq!(dashboard.state().current_page, 3);

        dashboard.apply_filters(FilterCriteria::new(Some("critical".to_string()), None));
        assert_eq!(dashboard.state().current_page, 1);
        assert_eq!(ids(&dashboard.state().filtered_dataset), vec!["ICSA-24-011-01", "ICSA-24-032-01"]);
        assert_eq!(dashboard.state().full_dataset.len(), 4);

        let view = dashboard.presenter().latest().unwrap();
        assert_eq!(view.statistics.total, 2);
        assert_eq!(view.statistics.severity.critical, 2);
        assert_eq!(view.statistics.severity.high, 0);
        assert_eq!(view.table.total_pages, 2);
        assert_eq!(view.vendor_options, vec!["ABB", "Rockwell Automation", "Schneider Electric", "Siemens"]);
        assert_eq!(dashboard.presenter().published(), 3);
    }

    #[test]
    fn test_vendor_filter_and_aggregates() {
        let mut dashboard = loaded_dashboard(50);
        dashboard.apply_filters(FilterCriteria::new(Some("all".to_string()), Some("siemens".to_string())));

        let view = dashboard.view();
        assert_eq!(view.statistics.total, 2);
        assert_eq!(view.vendor_chart[0].vendor, "Siemens");
        assert_eq!(view.vendor_chart[0].count, 2);
        assert_eq!(view.vendor_chart[1].vendor, "Schneider Electric");
        let months: Vec<_> = view.timeline_chart.iter().map(|b| (b.key.as_str(), b.count)).collect();
        assert_eq!(months, vec![("2024-01", 2)]);
    }

    #[test]
    fn test_no_match_message() {
        let mut dashboard = loaded_dashboard(50);
        dashboard.apply_filters(FilterCriteria::new(None, Some("nobody".to_string())));
        let view = dashboard.view();
        assert!(view.table.rows.is_empty());
        assert_eq!(view.table.message.as_deref(), Some(NO_MATCH_MESSAGE));
        assert_eq!(view.table.total_pages, 0);
    }

    #[test]
    fn test_get_page_bounds() {
        let dashboard = loaded_dashboard(3);
        assert_eq!(ids(dashboard.get_page(1)), vec!["ICSA-24-011-01", "ICSA-24-015-02", "ICSA-24-032-01"]);
        assert_eq!(ids(dashboard.get_page(2)), vec!["ICSA-24-040-01"]);
        assert!(dashboard.get_page(3).is_empty());
        assert!(dashboard.get_page(0).is_empty());
        assert!(dashboard.get_page(usize::MAX).is_empty());
    }

    #[test]
    fn test_set_page_ignores_out_of_range() {
        let mut dashboard = loaded_dashboard(3);
        assert!(!dashboard.set_page(0));
        assert!(!dashboard.set_page(3));
        assert!(!dashboard.set_page(1));
        assert!(dashboard.set_page(2));
        assert_eq!(dashboard.view().table.rows.len(), 1);
    }

    #[test]
    fn test_criteria_survive_reload() {
        let fetcher = StubFetcher::default().with(PRIMARY_URL, Ok(MASTER_CSV));
        let mut dashboard = Dashboard::new(fetcher, ViewSnapshot::new(), config(50));
        dashboard.apply_filters(FilterCriteria::new(Some("medium".to_string()), None));
        assert!(dashboard.state().filtered_dataset.is_empty());

        dashboard.load();
        assert_eq!(ids(&dashboard.state().filtered_dataset), vec!["ICSA-24-040-01"]);

        dashboard.load();
        assert_eq!(ids(&dashboard.state().filtered_dataset), vec!["ICSA-24-040-01"]);
    }

    #[test]
    fn test_export_filtered() {
        let mut dashboard = loaded_dashboard(50);
        dashboard.apply_filters(FilterCriteria::new(Some("medium".to_string()), None));
        let csv = dashboard.export_filtered();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "ICSA-24-040-01,Gateway,ABB,Medium,5.0,not a date");
    }
}
