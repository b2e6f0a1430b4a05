use std::time::Duration;

use super::error::{BseError, Result};

/// Configuration for the Bse client
#[derive(Debug, Clone)]
pub struct BseConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Rate limit in requests per second
    pub rate_limit: u32,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Base URLs for the exchange endpoints
    pub base_urls: BseUrls,
}

/// Base URLs for the BSE endpoints used by the client
#[derive(Debug, Clone)]
pub struct BseUrls {
    /// Corporate announcements API (category/subcategory search)
    pub announcements: String,
    /// Quote search endpoint used for company lookup
    pub company_search: String,
    /// Prefix for relative attachment names returned by the announcements API
    pub attachments: String,
    /// Web front end origin, sent as `Origin`/`Referer`
    pub origin: String,
}

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

impl Default for BseConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            rate_limit: 5,
            timeout: Duration::from_secs(30),
            base_urls: BseUrls::default(),
        }
    }
}

impl BseConfig {
    /// Creates a new BseConfig with custom settings
    ///
    /// # Basic usage
    ///
    /// ```ignore
    /// use bsekit::{Bse, BseConfig};
    /// use std::time::Duration;
    ///
    /// let config = BseConfig::new("research_tool/1.0", 2, Duration::from_secs(60), None);
    /// let bse = Bse::with_config(config)?;
    /// ```
    pub fn new(
        user_agent: impl Into<String>,
        rate_limit: u32,
        timeout: Duration,
        base_urls: Option<BseUrls>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            rate_limit,
            timeout,
            base_urls: base_urls.unwrap_or_default(),
        }
    }
}

impl Default for BseUrls {
    fn default() -> Self {
        Self {
            announcements: "https://api.bseindia.com/BseIndiaAPI/api/AnnSubCategoryGetData/w"
                .to_string(),
            company_search: "https://api.bseindia.com/Msource/1D/getQouteSearch.aspx".to_string(),
            attachments: "https://www.bseindia.com/xml-data/corpfiling/AttachHis/".to_string(),
            origin: "https://www.bseindia.com".to_string(),
        }
    }
}

/// Environment variable holding the extraction service API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the extraction model.
pub const MODEL_ENV: &str = "GEMINI_MODEL";

/// Settings for the hosted results extraction service.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub api_key: String,
    /// Model identifier, e.g. `gemini-2.5-flash`
    pub model: String,
    /// Base URL of the generative language API
    pub endpoint: String,
    /// Extraction of a large PDF can take minutes
    pub timeout: Duration,
}

impl ExtractionConfig {
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";
    pub const DEFAULT_ENDPOINT: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_string(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(300),
        }
    }

    /// Builds the configuration from `GEMINI_API_KEY` (and optionally `GEMINI_MODEL`).
    pub fn from_env() -> Result<Self> {
        Self::resolve(None)
    }

    /// Uses `api_key` when given and non-blank, otherwise falls back to the environment.
    ///
    /// # Errors
    ///
    /// Returns `BseError::ConfigError` when neither source provides a key.
    pub fn resolve(api_key: Option<&str>) -> Result<Self> {
        let key = match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => key.to_string(),
            None => std::env::var(API_KEY_ENV)
                .ok()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| {
                    BseError::ConfigError(format!(
                        "An API key must be provided either directly or via {}",
                        API_KEY_ENV
                    ))
                })?,
        };

        let mut config = Self::new(key);
        if let Ok(model) = std::env::var(MODEL_ENV) {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins() {
        let config = ExtractionConfig::resolve(Some("  explicit-key ")).unwrap();
        assert_eq!(config.api_key, "explicit-key");
        assert!(config.endpoint.starts_with("https://"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ExtractionConfig::new("k")
            .with_model("gemini-2.5-pro")
            .with_endpoint("http://localhost:9000")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_default_urls() {
        let urls = BseUrls::default();
        assert!(urls.attachments.ends_with("/AttachHis/"));
        assert!(urls.announcements.contains("AnnSubCategoryGetData"));
    }
}
