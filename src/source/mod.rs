//! Data source module: configuration and the raw CSV fetch.
//!
//! The dashboard treats fetching as an opaque call returning text; this module
//! provides the HTTP and filesystem implementations behind `AdvisoryFetcher`.

pub mod client;
pub mod config;

pub use client::{AdvisoryFetcher, LoadError, SourceFetcher, SourceLocation};
pub use config::DashboardConfig;
