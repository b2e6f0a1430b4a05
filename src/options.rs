use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{BseError, Result};

/// One announcement category to fetch per quarter.
///
/// `name` is the logical label callers reason about ("Results", "Transcript", ...) and
/// does not have to be unique: two configs may both be labelled "Results" while hitting
/// different exchange categories. Per quarter, the first config with a given name that
/// yields records wins and later configs with that name are skipped.
///
/// Loaded from JSON, unknown keys are rejected:
///
/// ```json
/// {"name": "Results", "category": "Board Meeting", "filter": "result", "lookahead": true}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    pub name: String,
    /// Exchange-side category code, e.g. `Result` or `Company Update`
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Case-insensitive substring required in `headline + " " + title`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Search the following quarter's window instead of the target quarter's.
    #[serde(default)]
    pub lookahead: bool,
}

impl FilterConfig {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            subcategory: None,
            filter: None,
            lookahead: false,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_lookahead(mut self, lookahead: bool) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Returns `true` if the headline/title pair passes this config's filter.
    ///
    /// Configs without a filter accept everything.
    pub fn matches(&self, headline: &str, title: &str) -> bool {
        match self.filter.as_deref() {
            Some(filter) => {
                let combined = format!("{} {}", headline, title).to_lowercase();
                combined.contains(&filter.to_lowercase())
            }
            None => true,
        }
    }

    /// The standard category set: results and investor material are published in the
    /// quarter after the one they describe, hence `lookahead`.
    pub fn default_set() -> Vec<FilterConfig> {
        vec![
            FilterConfig::new("Results", "Result").with_lookahead(true),
            FilterConfig::new("Results", "Board Meeting")
                .with_filter("result")
                .with_lookahead(true),
            FilterConfig::new("Presentation", "Company Update")
                .with_filter("presentation")
                .with_lookahead(true),
            FilterConfig::new("Transcript", "Company Update")
                .with_filter("transcript")
                .with_lookahead(true),
            FilterConfig::new("Insider trading", "Insider Trading / SAST"),
            FilterConfig::new("Press Release", "Company Update").with_filter("press release"),
            FilterConfig::new("Resignations", "Company Update").with_filter("resignation"),
        ]
    }

    fn validate(&self, position: usize) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BseError::ConfigError(format!(
                "filter config #{} has an empty name",
                position
            )));
        }
        if self.category.trim().is_empty() {
            return Err(BseError::ConfigError(format!(
                "filter config #{} ({}) has an empty category",
                position, self.name
            )));
        }
        Ok(())
    }
}

/// Parses an ordered JSON array of filter configs.
///
/// # Errors
///
/// * `BseError::ConfigError` for unknown keys, missing fields, or empty names/categories
pub fn parse_filter_configs(json: &str) -> Result<Vec<FilterConfig>> {
    let configs: Vec<FilterConfig> = serde_json::from_str(json)
        .map_err(|e| BseError::ConfigError(format!("Invalid filter configs: {}", e)))?;

    for (position, config) in configs.iter().enumerate() {
        config.validate(position)?;
    }
    Ok(configs)
}

/// Reads filter configs from a JSON file.
pub fn load_filter_configs(path: impl AsRef<Path>) -> Result<Vec<FilterConfig>> {
    let content = std::fs::read_to_string(path)?;
    parse_filter_configs(&content)
}
