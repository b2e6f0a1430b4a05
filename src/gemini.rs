//! Google Gemini implementation of [`ResultsExtractor`].
//!
//! The PDF is sent inline (base64) together with the standard-field system instruction
//! and a prompt naming the quarter and statement type. The reply text of the first
//! candidate is returned untouched; parsing happens in
//! [`parse_extraction_response`](crate::parse_extraction_response).

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use super::config::ExtractionConfig;
use super::error::{BseError, Result};
use super::extraction::ResultType;
use super::prompt::{extraction_prompt, system_instruction};
use super::quarter::FiscalQuarter;
use super::traits::ResultsExtractor;

const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback", default)]
    prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(rename = "finishReason", default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

/// Results extractor backed by the Gemini `generateContent` API.
#[derive(Debug, Clone)]
pub struct GeminiExtractor {
    client: reqwest::Client,
    config: ExtractionConfig,
}

impl GeminiExtractor {
    /// # Errors
    ///
    /// Returns `BseError::ConfigError` if the API key is blank or the HTTP client cannot
    /// be built.
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(BseError::ConfigError(
                "Extraction API key must not be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BseError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Builds an extractor from an explicit key, falling back to `GEMINI_API_KEY`.
    pub fn from_key_or_env(api_key: Option<&str>) -> Result<Self> {
        Self::new(ExtractionConfig::resolve(api_key)?)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(
        quarter: FiscalQuarter,
        result_type: ResultType,
        document: &[u8],
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(system_instruction()),
                    ..Part::default()
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: PDF_MIME_TYPE.to_string(),
                            data: general_purpose::STANDARD.encode(document),
                        }),
                        ..Part::default()
                    },
                    Part {
                        text: Some(extraction_prompt(quarter, result_type)),
                        ..Part::default()
                    },
                ],
            }],
        }
    }
}

/// Concatenates the text parts of the first candidate.
fn response_text(body: &str) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        BseError::ExtractionServiceError(format!("Unreadable service response: {}", e))
    })?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(BseError::ExtractionServiceError(format!(
            "Service returned no candidates (feedback: {})",
            response
                .prompt_feedback
                .map(|f| f.to_string())
                .unwrap_or_else(|| "none".to_string())
        )));
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(BseError::ExtractionServiceError(format!(
            "Service returned an empty answer (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }
    Ok(text)
}

#[async_trait]
impl ResultsExtractor for GeminiExtractor {
    async fn extract(
        &self,
        quarter: FiscalQuarter,
        result_type: ResultType,
        document: &[u8],
    ) -> Result<String> {
        let request = Self::build_request(quarter, result_type, document);

        tracing::debug!(
            "Sending {} byte document to {} for {} {}",
            document.len(),
            self.config.model,
            quarter,
            result_type
        );

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BseError::ExtractionServiceError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BseError::ExtractionServiceError(e.to_string()))?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => format!("{} {}", envelope.error.code, envelope.error.message),
                Err(_) => body.chars().take(200).collect(),
            };
            return Err(BseError::ExtractionServiceError(format!(
                "HTTP {}: {}",
                status, detail
            )));
        }

        response_text(&body)
    }
}
