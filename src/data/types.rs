//! Type definitions shared across the advisory data pipeline.

use serde::Serialize;
use std::collections::HashMap;

/// One decoded CSV row, keyed by header name.
///
/// Header names are stored exactly as they appear in the (trimmed, unquoted)
/// header line. When a header repeats, the value from the later column wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing any earlier value under the same header.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(header.into(), value.into());
    }

    /// Look up a column value by exact header name.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (header, value) in iter {
            record.insert(header, value);
        }
        record
    }
}

/// Canonical advisory row produced by the normalizer.
///
/// All downstream logic works on this shape only; every field is kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdvisoryRecord {
    /// Advisory identifier. Never empty for an admitted record.
    pub id: String,
    pub title: String,
    /// One or more vendor names, comma separated.
    pub vendor: String,
    /// Free-text severity label.
    pub severity: String,
    /// CVSS score as published, not validated.
    pub cvss_score: String,
    /// Publication date text, parsed lazily for the timeline.
    pub publication_date: String,
}

/// Severity bucket used by the histogram and row badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBucket {
    Critical,
    High,
    Medium,
    Low,
}

impl SeverityBucket {
    /// Buckets in classification priority order.
    pub const ALL: [SeverityBucket; 4] = [
        SeverityBucket::Critical,
        SeverityBucket::High,
        SeverityBucket::Medium,
        SeverityBucket::Low,
    ];

    /// Lower-case keyword matched against severity text.
    pub fn keyword(self) -> &'static str {
        match self {
            SeverityBucket::Critical => "critical",
            SeverityBucket::High => "high",
            SeverityBucket::Medium => "medium",
            SeverityBucket::Low => "low",
        }
    }

    /// Classify free-text severity. The first bucket whose keyword occurs in the
    /// lower-cased text wins, so `"critical/high"` is `Critical`.
    pub fn classify(severity: &str) -> Option<SeverityBucket> {
        let lowered = severity.to_lowercase();
        Self::ALL.into_iter().find(|bucket| lowered.contains(bucket.keyword()))
    }
}

impl std::fmt::Display for SeverityBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityBucket::Critical => write!(f, "Critical"),
            SeverityBucket::High => write!(f, "High"),
            SeverityBucket::Medium => write!(f, "Medium"),
            SeverityBucket::Low => write!(f, "Low"),
        }
    }
}
