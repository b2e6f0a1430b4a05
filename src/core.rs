use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware, state::InMemoryState,
    state::NotKeyed,
};
use reqwest::StatusCode;
use reqwest::header::{
    ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, REFERER, RETRY_AFTER, USER_AGENT,
};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::config::{BseConfig, BseUrls};
use super::error::{BseError, Result};
use super::traits::DocumentFetcher;
use async_trait::async_trait;

const MAX_RETRIES: u32 = 5;
const INITIAL_BACKOFF_MS: u64 = 1000;
const PREVIEW_CHARS: usize = 200;

type Governor = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}

#[derive(Debug, Clone)]
pub struct Bse {
    /// HTTP client for making requests
    pub(crate) client: reqwest::Client,

    /// Token bucket rate limiter shared by all clones
    pub(crate) rate_limiter: Arc<Governor>,

    /// Corporate announcements endpoint
    pub(crate) announcements_url: String,

    /// Quote search endpoint
    pub(crate) company_search_url: String,

    /// Prefix for relative attachment names
    pub(crate) attachments_url: String,
}

/// HTTP client for the BSE India public endpoints with built-in rate limiting and retry logic.
///
/// `Bse` is the entry point for talking to the exchange: it searches corporate
/// announcements by category and date window, looks up companies by name, and downloads
/// the PDF attachments behind announcement links. It implements
/// [`FilingSource`](crate::FilingSource), [`DocumentFetcher`] and (with the `company`
/// feature) [`CompanyLookup`](crate::CompanyLookup), so it plugs directly into
/// [`fetch_range`](crate::fetch_range) and [`extract_results`](crate::extract_results).
///
/// # Rate Limiting
///
/// The exchange throttles aggressive clients. Requests go through a token bucket
/// (5 requests per second by default):
///
/// ```text
/// Token Bucket (capacity: 5 tokens)
/// ┌──────────────────────────┐
/// │ ████████████████████████ │  ← Tokens refill at 5/sec
/// └──────────────────────────┘
///      ↓ consume on request
/// ```
///
/// # Error Handling
///
/// HTTP 429 responses and transport failures are retried up to 5 times with exponential
/// backoff and jitter. HTTP 404 maps to `BseError::NotFound`; any other unexpected status
/// is returned immediately as `BseError::InvalidResponse` with a preview of the body.
///
/// # Examples
///
/// ```rust
/// # use bsekit::Bse;
/// let bse = Bse::new()?;
/// # Ok::<(), bsekit::BseError>(())
/// ```
///
/// With custom configuration:
///
/// ```rust
/// # use bsekit::{Bse, BseConfig, BseUrls};
/// # use std::time::Duration;
/// let config = BseConfig {
///     user_agent: "research_tool/1.0".to_string(),
///     rate_limit: 2,
///     timeout: Duration::from_secs(60),
///     base_urls: BseUrls::default(),
/// };
/// let bse = Bse::with_config(config)?;
/// # Ok::<(), bsekit::BseError>(())
/// ```
impl Bse {
    /// Creates a new client with the default configuration.
    ///
    /// Defaults: a browser-like user agent (the API rejects unknown agents), 5 requests
    /// per second, a 30-second timeout and the public BSE endpoints.
    pub fn new() -> Result<Self> {
        Self::with_config(BseConfig::default())
    }

    /// Creates a client with custom configuration settings.
    ///
    /// Use this constructor to point the client at a mock server, to lower the request
    /// rate, or to change the timeout.
    ///
    /// # Errors
    ///
    /// Returns `BseError::ConfigError` if the user agent or origin is not a valid header
    /// value, the rate limit is zero, or the HTTP client cannot be built.
    pub fn with_config(config: BseConfig) -> Result<Self> {
        let BseConfig {
            user_agent,
            rate_limit,
            timeout,
            base_urls,
        } = config;
        let BseUrls {
            announcements,
            company_search,
            attachments,
            origin,
        } = base_urls;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent)
                .map_err(|e| BseError::ConfigError(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            ORIGIN,
            HeaderValue::from_str(origin.trim_end_matches('/'))
                .map_err(|e| BseError::ConfigError(format!("Invalid origin: {}", e)))?,
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(&format!("{}/", origin.trim_end_matches('/')))
                .map_err(|e| BseError::ConfigError(format!("Invalid referer: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| BseError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(rate_limit).ok_or_else(|| {
                BseError::ConfigError("Rate limit must be greater than zero".to_string())
            })?,
        )));

        Ok(Bse {
            client,
            rate_limiter,
            announcements_url: announcements,
            company_search_url: company_search,
            attachments_url: attachments,
        })
    }

    /// Exponential backoff with ±10% jitter: 1s, 2s, 4s, 8s, 16s.
    fn calculate_backoff(retry: u32) -> Duration {
        let base_ms = INITIAL_BACKOFF_MS << retry;
        let spread = base_ms as f64 * 0.2 * (fastrand::f64() - 0.5);
        Duration::from_millis((base_ms as f64 + spread).max(0.0) as u64)
    }

    /// Seconds from a numeric `Retry-After` header, if the server sent one.
    fn retry_after(response: &reqwest::Response) -> Option<Duration> {
        response
            .headers()
            .get(RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }

    /// Issues a rate-limited GET and returns the first `200 OK` response.
    ///
    /// Transport failures and HTTP 429 are retried up to `MAX_RETRIES` times. 429 waits
    /// for `Retry-After` when present, otherwise for the jittered backoff.
    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        let mut attempt = 0;

        loop {
            self.rate_limiter.until_ready().await;

            let wait = match self.client.get(url).send().await {
                Err(e) if attempt >= MAX_RETRIES => return Err(BseError::RequestError(e)),
                Err(e) => {
                    let wait = Self::calculate_backoff(attempt);
                    tracing::warn!(
                        "GET {} failed: {}. Attempt {}/{}, retrying in {:?}",
                        url,
                        e,
                        attempt + 1,
                        MAX_RETRIES + 1,
                        wait
                    );
                    wait
                }
                Ok(response) => match response.status() {
                    StatusCode::OK => return Ok(response),
                    StatusCode::NOT_FOUND => return Err(BseError::NotFound),
                    StatusCode::TOO_MANY_REQUESTS if attempt >= MAX_RETRIES => {
                        return Err(BseError::RateLimitExceeded);
                    }
                    StatusCode::TOO_MANY_REQUESTS => {
                        let wait = Self::retry_after(&response)
                            .unwrap_or_else(|| Self::calculate_backoff(attempt));
                        tracing::warn!(
                            "Throttled (429) on {}. Attempt {}/{}, waiting {:?}",
                            url,
                            attempt + 1,
                            MAX_RETRIES + 1,
                            wait
                        );
                        wait
                    }
                    status => {
                        let body = response.text().await.unwrap_or_default();
                        return Err(BseError::InvalidResponse(format!(
                            "Unexpected status {} for {}: {}",
                            status,
                            url,
                            preview(&body)
                        )));
                    }
                },
            };

            sleep(wait).await;
            attempt += 1;
        }
    }

    /// Fetches binary content (PDF attachments).
    ///
    /// # Errors
    ///
    /// * `BseError::NotFound` - The resource doesn't exist (HTTP 404)
    /// * `BseError::RateLimitExceeded` - Still throttled after the last retry
    /// * `BseError::RequestError` - Network failure after the last retry
    /// * `BseError::InvalidResponse` - Any other HTTP status
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send(url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Fetches text content, checking that JSON endpoints really answered JSON.
    ///
    /// When the exchange blocks a client it serves an HTML page with status 200. With
    /// `expect_json`, a `text/html` response is accepted only if its body looks like JSON;
    /// otherwise it becomes `BseError::UnexpectedContentType` with a preview of the page.
    ///
    /// Retries as [`get_bytes`](Self::get_bytes) does.
    pub async fn get(&self, url: &str, expect_json: bool) -> Result<String> {
        let response = self.send(url).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let body = response.text().await?;

        if expect_json && content_type.contains("text/html") {
            let start = body.trim_start();
            if !(start.starts_with('{') || start.starts_with('[')) {
                return Err(BseError::UnexpectedContentType {
                    url: url.to_string(),
                    expected_pattern: "application/json".to_string(),
                    got_content_type: content_type,
                    content_preview: preview(&body),
                });
            }
            tracing::debug!("JSON body served as text/html from {}", url);
        }

        Ok(body)
    }

    /// Returns the corporate announcements endpoint.
    pub fn announcements_url(&self) -> &str {
        &self.announcements_url
    }

    /// Returns the quote search endpoint.
    pub fn company_search_url(&self) -> &str {
        &self.company_search_url
    }

    /// Returns the prefix used for relative attachment names.
    pub fn attachments_url(&self) -> &str {
        &self.attachments_url
    }
}

#[async_trait]
impl DocumentFetcher for Bse {
    async fn fetch_document(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Downloading document {}", url);
        self.get_bytes(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_backoff() {
        let backoff0 = Bse::calculate_backoff(0);
        let backoff1 = Bse::calculate_backoff(1);
        let backoff2 = Bse::calculate_backoff(2);

        assert!(backoff0 < backoff1);
        assert!(backoff1 < backoff2);

        assert!(backoff0.as_millis() >= 800 && backoff0.as_millis() <= 1200);
        assert!(backoff1.as_millis() >= 1600 && backoff1.as_millis() <= 2400);
        assert!(backoff2.as_millis() >= 3200 && backoff2.as_millis() <= 4800);
    }

    #[test]
    fn test_zero_rate_limit_is_rejected() {
        let config = BseConfig {
            rate_limit: 0,
            ..BseConfig::default()
        };
        assert!(matches!(
            Bse::with_config(config),
            Err(BseError::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let config = BseConfig {
            user_agent: "bad\nagent".to_string(),
            ..BseConfig::default()
        };
        assert!(matches!(
            Bse::with_config(config),
            Err(BseError::ConfigError(_))
        ));
    }

    #[test]
    fn test_urls_from_config() {
        let bse = Bse::new().unwrap();
        assert!(bse.announcements_url().contains("AnnSubCategoryGetData"));
        assert!(bse.attachments_url().ends_with("/AttachHis/"));
    }
}
