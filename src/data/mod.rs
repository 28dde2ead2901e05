//! Client-side advisory data pipeline.
//!
//! - `csv_parser`: raw text to header-keyed rows
//! - `normalizer`: rows to canonical `AdvisoryRecord`s
//! - `filter`: severity and vendor criteria
//! - `aggregator`: severity, vendor and monthly statistics
//! - `export`: records back to CSV text

pub mod aggregator;
pub mod csv_parser;
pub mod export;
pub mod filter;
pub mod normalizer;
pub mod types;

pub use aggregator::{Aggregates, MonthlyBucket, SeverityCounts, VendorCount, aggregate};
pub use csv_parser::parse_csv_table;
pub use export::to_csv;
pub use filter::{FilterCriteria, filter_records};
pub use normalizer::{has_identifier_column, normalize_all};
pub use types::{AdvisoryRecord, SeverityBucket};
