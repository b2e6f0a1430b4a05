//! Results extraction bridge.
//!
//! Picks one "results" announcement for a quarter, downloads its PDF and hands it to a
//! [`ResultsExtractor`]. The service answers with a JSON object mapping field names to
//! values, often wrapped in a markdown code fence:
//!
//! ````text
//! ```json
//! {"CoreRevenue": "1234.5", "OtherIncome": ""}
//! ```
//! ````
//!
//! The reply is turned into an ordered [`ExtractedTable`]. Values are coerced to numbers
//! where possible and left missing otherwise; nothing else is validated.
//!
//! A quarter often has several candidate documents (the results filing itself, the
//! board meeting outcome, a newspaper publication). When a candidate yields nothing
//! usable ([`ExtractedTable::is_empty_result`]), callers retry with the next
//! `candidate_index`. The bridge never retries on its own.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use super::error::{BseError, Result};
use super::quarter::{FiscalQuarter, parse_quarter_label};
use super::record::AnnouncementRecord;
use super::traits::{DocumentFetcher, ResultsExtractor};

/// Config name whose records are extraction candidates (compared case-insensitively).
pub const RESULTS_CONFIG_NAME: &str = "results";

/// Which statement set to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    Consolidated,
    Standalone,
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultType::Consolidated => f.write_str("Consolidated"),
            ResultType::Standalone => f.write_str("Standalone"),
        }
    }
}

impl FromStr for ResultType {
    type Err = BseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "consolidated" => Ok(ResultType::Consolidated),
            "standalone" => Ok(ResultType::Standalone),
            other => Err(BseError::ConfigError(format!(
                "Unknown result type {:?} (expected Consolidated or Standalone)",
                other
            ))),
        }
    }
}

/// One extracted line item. `value` is `None` when the service left it blank or it is
/// not numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub field_name: String,
    pub value: Option<f64>,
}

/// Extraction output for one candidate document, in the order the service reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTable {
    pub quarter: FiscalQuarter,
    pub result_type: ResultType,
    pub candidate_index: usize,
    pub document_link: String,
    pub fields: Vec<ExtractedField>,
}

impl ExtractedTable {
    /// `true` when no field carries a non-zero value, i.e. the document yielded nothing
    /// usable and the next candidate should be tried.
    pub fn is_empty_result(&self) -> bool {
        self.fields
            .iter()
            .all(|field| field.value.is_none_or(|v| v == 0.0))
    }

    /// Value of the first field named `field_name`.
    pub fn value(&self, field_name: &str) -> Option<f64> {
        self.fields
            .iter()
            .find(|field| field.field_name == field_name)
            .and_then(|field| field.value)
    }

    /// Writes the table as CSV: a `Field` column and one value column named after the
    /// quarter label. Missing values are written as empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Field".to_string(), self.quarter.label()])?;
        for field in &self.fields {
            let value = field.value.map(|v| v.to_string()).unwrap_or_default();
            csv.write_record([field.field_name.as_str(), value.as_str()])?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| BseError::InvalidResponse(e.to_string()))
    }
}

/// Removes a surrounding markdown code fence (```` ```json ```` or ```` ``` ````).
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses the service reply into ordered fields.
///
/// # Errors
///
/// * `BseError::MalformedExtractionResponse` - not JSON after fence stripping, or not an object
pub fn parse_extraction_response(text: &str) -> Result<Vec<ExtractedField>> {
    let body = strip_code_fence(text);
    let preview = || body.chars().take(200).collect::<String>();

    let value: Value =
        serde_json::from_str(body).map_err(|e| BseError::MalformedExtractionResponse {
            reason: e.to_string(),
            preview: preview(),
        })?;

    let Value::Object(map) = value else {
        return Err(BseError::MalformedExtractionResponse {
            reason: "expected a JSON object of field/value pairs".to_string(),
            preview: preview(),
        });
    };

    Ok(map
        .into_iter()
        .map(|(field_name, value)| ExtractedField {
            field_name,
            value: coerce_value(&value),
        })
        .collect())
}

fn coerce_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Records of the "results" config for `quarter`, in fetch order.
pub fn results_candidates(
    records: &[AnnouncementRecord],
    quarter: FiscalQuarter,
) -> Vec<&AnnouncementRecord> {
    records
        .iter()
        .filter(|r| r.config_name.eq_ignore_ascii_case(RESULTS_CONFIG_NAME) && r.quarter == quarter)
        .collect()
}

/// Picks the `candidate_index`-th results record for `quarter_label`.
///
/// # Errors
///
/// * `BseError::InvalidQuarterLabel` / `BseError::InvalidQuarter` - malformed label
/// * `BseError::NoResultsForQuarter` - no results records for the quarter
/// * `BseError::NoCandidateAtIndex` - fewer than `candidate_index + 1` candidates
pub fn select_candidate<'a>(
    records: &'a [AnnouncementRecord],
    quarter_label: &str,
    candidate_index: usize,
) -> Result<&'a AnnouncementRecord> {
    let quarter = parse_quarter_label(quarter_label)?;
    let candidates = results_candidates(records, quarter);

    if candidates.is_empty() {
        return Err(BseError::NoResultsForQuarter(quarter_label.to_string()));
    }
    candidates
        .get(candidate_index)
        .copied()
        .ok_or(BseError::NoCandidateAtIndex {
            index: candidate_index,
            available: candidates.len(),
        })
}

/// Extracts financial line items from one candidate results document.
///
/// # Errors
///
/// * Candidate selection errors, see [`select_candidate`]
/// * `BseError::MissingDocumentLink` - the candidate has no document
/// * Download errors from `documents`
/// * `BseError::ExtractionServiceError` - the service call failed
/// * `BseError::MalformedExtractionResponse` - the reply is not a JSON object
pub async fn extract_results<D, E>(
    records: &[AnnouncementRecord],
    quarter_label: &str,
    result_type: ResultType,
    candidate_index: usize,
    documents: &D,
    extractor: &E,
) -> Result<ExtractedTable>
where
    D: DocumentFetcher + ?Sized,
    E: ResultsExtractor + ?Sized,
{
    let candidate = select_candidate(records, quarter_label, candidate_index)?;
    let link = candidate
        .document_link
        .as_deref()
        .ok_or(BseError::MissingDocumentLink {
            index: candidate_index,
        })?;

    tracing::info!(
        "Extracting {} results for {} from candidate {}: {}",
        result_type,
        quarter_label,
        candidate_index,
        link
    );

    let document = documents.fetch_document(link).await?;
    let response = extractor
        .extract(candidate.quarter, result_type, &document)
        .await
        .map_err(|e| match e {
            BseError::ExtractionServiceError(_) => e,
            other => BseError::ExtractionServiceError(other.to_string()),
        })?;

    let fields = parse_extraction_response(&response)?;
    let table = ExtractedTable {
        quarter: candidate.quarter,
        result_type,
        candidate_index,
        document_link: link.to_string(),
        fields,
    };

    if table.is_empty_result() {
        tracing::warn!(
            "Candidate {} for {} yielded no usable values",
            candidate_index,
            quarter_label
        );
    }
    Ok(table)
}
