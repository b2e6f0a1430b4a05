use thiserror::Error;

#[derive(Error, Debug)]
pub enum BseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid quarter: must be between 1 and 4")]
    InvalidQuarter,

    #[error("Invalid fiscal year: {0} is outside the supported calendar")]
    InvalidFiscalYear(i32),

    #[error("Invalid quarter label: {0:?} (expected \"Q<1-4> FY<year>\")")]
    InvalidQuarterLabel(String),

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Filing source error: {0}")]
    AdapterError(String),

    #[error("Extraction service error: {0}")]
    ExtractionServiceError(String),

    #[error("Malformed extraction response: {reason}. Response preview: {preview}...")]
    MalformedExtractionResponse { reason: String, preview: String },

    #[error("No results announcements found for {0}")]
    NoResultsForQuarter(String),

    #[error("No candidate document at index {index} ({available} available)")]
    NoCandidateAtIndex { index: usize, available: usize },

    #[error("Candidate document at index {index} has no document link")]
    MissingDocumentLink { index: usize },

    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(
        "Unexpected content type from URL {url}. Expected pattern {expected_pattern}, but got Content-Type: {got_content_type}. Content preview: {content_preview}..."
    )]
    UnexpectedContentType {
        url: String,
        expected_pattern: String,
        got_content_type: String,
        content_preview: String,
    },
}

impl BseError {
    /// Returns `true` for failures that originate in the filing or company
    /// lookup adapters (transport, status or payload problems).
    pub fn is_adapter_error(&self) -> bool {
        matches!(
            self,
            BseError::RequestError(_)
                | BseError::NotFound
                | BseError::InvalidResponse(_)
                | BseError::RateLimitExceeded
                | BseError::AdapterError(_)
                | BseError::JsonError(_)
                | BseError::UnexpectedContentType { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BseError>;
