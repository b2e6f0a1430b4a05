//! Trait definitions for the collaborators the retrieval pipeline talks to.
//!
//! The pipeline functions ([`fetch_quarter`](crate::fetch_quarter),
//! [`fetch_range`](crate::fetch_range), [`extract_results`](crate::extract_results))
//! are generic over these traits. The [`Bse`](crate::Bse) client implements the
//! exchange-facing ones and [`GeminiExtractor`](crate::GeminiExtractor) implements
//! [`ResultsExtractor`], but any implementation works, which is how the tests drive
//! the pipeline with in-memory fixtures.

#[cfg(feature = "company")]
use super::company::CompanyMatch;
use super::error::Result;
use super::extraction::ResultType;
use super::options::FilterConfig;
use super::quarter::{DateRange, FiscalQuarter};
use super::record::FilingItem;
use async_trait::async_trait;

/// Source of filing records for one company, category and date window.
///
/// Implementations may already apply `config.filter`; the quarter fetcher re-applies it
/// regardless.
#[async_trait]
pub trait FilingSource {
    /// Returns the filings of `company_id` published within `range` that match `config`.
    async fn search(
        &self,
        company_id: &str,
        range: DateRange,
        config: &FilterConfig,
    ) -> Result<Vec<FilingItem>>;

    /// Host prefix used to absolutize relative attachment links.
    fn document_base_url(&self) -> &str;
}

/// Company search by free text (name or ticker).
#[cfg(feature = "company")]
#[async_trait]
pub trait CompanyLookup {
    /// Returns candidate companies with their exchange identifiers.
    async fn lookup(&self, query: &str) -> Result<Vec<CompanyMatch>>;
}

/// Downloads the document behind an announcement link.
#[async_trait]
pub trait DocumentFetcher {
    async fn fetch_document(&self, url: &str) -> Result<Vec<u8>>;
}

/// Hosted document-understanding service turning a results PDF into field/value JSON.
#[async_trait]
pub trait ResultsExtractor {
    /// Returns the raw text response; it is expected to hold one JSON object, possibly
    /// wrapped in a markdown code fence.
    async fn extract(
        &self,
        quarter: FiscalQuarter,
        result_type: ResultType,
        document: &[u8],
    ) -> Result<String>;
}
