//! Fetch raw advisory CSV text from a remote URL or a local file.

use reqwest::Url;
use reqwest::blocking::Client;
use std::path::PathBuf;
use std::time::Duration;

/// Error type for data source failures.
#[derive(Debug)]
pub enum LoadError {
    /// Source string could not be turned into a URL or path.
    InvalidLocation(String),
    /// Transport-level failure (DNS, connect, timeout, body read).
    Network(String),
    /// Server answered with a non-success status.
    Status(u16),
    /// Local file could not be read.
    Io(String),
    /// Payload decoded, but has no usable CSV structure.
    Unusable(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::InvalidLocation(msg) => write!(f, "Invalid source location: {}", msg),
            LoadError::Network(msg) => write!(f, "Network error: {}", msg),
            LoadError::Status(code) => write!(f, "HTTP error! status: {}", code),
            LoadError::Io(msg) => write!(f, "Failed to read file: {}", msg),
            LoadError::Unusable(msg) => write!(f, "Unusable CSV data: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

/// A resolved data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Remote(Url),
    Local(PathBuf),
}

impl SourceLocation {
    /// Resolve a configured source string.
    ///
    /// Absolute `http(s)` URLs are used as-is. Anything else is joined onto
    /// `base_url` when one is set, or treated as a filesystem path otherwise.
    pub fn resolve(base_url: Option<&str>, source: &str) -> Result<Self, LoadError> {
        if let Ok(url) = Url::parse(source) {
            if matches!(url.scheme(), "http" | "https") {
                return Ok(SourceLocation::Remote(url));
            }
        }

        match base_url {
            Some(base) => {
                let base = Url::parse(base).map_err(|e| LoadError::InvalidLocation(format!("{}: {}", base, e)))?;
                let url = base.join(source).map_err(|e| LoadError::InvalidLocation(format!("{}: {}", source, e)))?;
                Ok(SourceLocation::Remote(url))
            }
            None => Ok(SourceLocation::Local(PathBuf::from(source))),
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLocation::Remote(url) => write!(f, "{}", url),
            SourceLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Opaque byte-producing call used by the dashboard to load CSV text.
pub trait AdvisoryFetcher {
    fn fetch(&self, location: &SourceLocation) -> Result<String, LoadError>;
}

/// Fetcher backed by a blocking HTTP client and the local filesystem.
pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    /// Create a new SourceFetcher with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client })
    }

    fn fetch_remote(&self, url: &Url) -> Result<String, LoadError> {
        log::info!("Fetching {}", url);

        let response = self.client.get(url.clone()).send().map_err(|e| LoadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }
        response.text().map_err(|e| LoadError::Network(e.to_string()))
    }
}

impl AdvisoryFetcher for SourceFetcher {
    fn fetch(&self, location: &SourceLocation) -> Result<String, LoadError> {
        match location {
            SourceLocation::Remote(url) => self.fetch_remote(url),
            SourceLocation::Local(path) => {
                log::info!("Reading {}", path.display());
                std::fs::read_to_string(path).map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))
            }
        }
    }
}
