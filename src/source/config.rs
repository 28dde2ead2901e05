//! Configuration loading for advisory data sources.

use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_PRIMARY_SOURCE: &str = "ICS-CERT_ADV/CISA_ICS_ADV_Master.csv";
pub const DEFAULT_FALLBACK_SOURCE: &str = "data/sample_advisories.csv";
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Where advisory data comes from and how it is paged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DashboardConfig {
    /// Base URL that relative sources are resolved against. Without one,
    /// relative sources are read from the local filesystem.
    pub base_url: Option<String>,
    /// Master advisory feed.
    pub primary_source: String,
    /// Sample data used when the primary feed cannot be loaded.
    pub fallback_source: String,
    /// Table rows per page.
    pub page_size: usize,
    /// HTTP request timeout.
    pub request_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            primary_source: DEFAULT_PRIMARY_SOURCE.to_string(),
            fallback_source: DEFAULT_FALLBACK_SOURCE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the config.toml file
    ///
    /// # Returns
    /// * `Ok(DashboardConfig)` with defaults filled in for missing keys
    /// * `Err(String)` with a descriptive error message otherwise
    pub fn load(config_path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(config_path).map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        let config: DashboardConfig = toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))?;
        if config.page_size == 0 {
            return Err("page-size must be at least 1".to_string());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_keys_missing() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.page_size, 50);
        assert_eq!(config.primary_source, "ICS-CERT_ADV/CISA_ICS_ADV_Master.csv");
    }

    #[test]
    fn test_kebab_case_keys() {
        let config = DashboardConfig::from_toml(
            r#"
base-url = "https://example.org/ICS-Advisory-Dashboard/"
fallback-source = "data/other.csv"
page-size = 25
"#,
        )
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://example.org/ICS-Advisory-Dashboard/"));
        assert_eq!(config.fallback_source, "data/other.csv");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_rejects_zero_page_size_and_bad_toml() {
        assert!(DashboardConfig::from_toml("page-size = 0").is_err());
        assert!(DashboardConfig::from_toml("page-size = \"many\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "primary-source = \"feed.csv\"").unwrap();
        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.primary_source, "feed.csv");

        let missing = DashboardConfig::load(Path::new("/nonexistent/config.toml"));
        assert!(missing.unwrap_err().starts_with("Failed to read config file"));
    }
}
