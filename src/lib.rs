//! # BseKit - Quarter-range retrieval of BSE corporate announcements
//!
//! BseKit fetches a listed company's announcements from the Bombay Stock Exchange one
//! fiscal quarter at a time, arranges them into a category × quarter table and, on
//! request, turns a quarterly results PDF into financial line items through a hosted
//! document-understanding service.
//!
//! ## Features
//!
//! - **Rate-limited HTTP client** - Retries with jittered backoff against the exchange API
//! - **Fiscal quarters** - Indian fiscal calendar (April-March) date windows and labels
//! - **Filter configs** - Named category/keyword searches with next-quarter lookahead
//! - **Range fetching** - Sequential quarter-by-quarter retrieval with per-name deduplication
//! - **Pivoting** - Config × quarter lookup of document links and headlines
//! - **Results extraction** - Candidate selection, PDF download and JSON reply parsing
//! - **Company lookup** (`company` feature) - Scrip code search by name or ticker
//! - **Gemini extractor** (`gemini` feature) - [`ResultsExtractor`] backed by Google Gemini
//!
//! ## Requirements
//!
//! BseKit is async and requires a runtime such as [tokio](https://tokio.rs). Adapter
//! calls are always awaited one after another; nothing is fetched concurrently.
//!
//! ## Basic Usage
//!
//! ```ignore
//! use bsekit::{Bse, FilterConfig, FiscalQuarter, fetch_range, pivot};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bse = Bse::new()?;
//!     let configs = FilterConfig::default_set();
//!
//!     let start = FiscalQuarter::new(1, 2025)?;
//!     let end = FiscalQuarter::new(4, 2025)?;
//!     let records = fetch_range(&bse, "500825", start, end, &configs).await?;
//!
//!     let table = pivot(&records, &configs);
//!     for row in table.rows() {
//!         for (column, cell) in table.row_cells(row) {
//!             println!("{row} {column}: {} documents", cell.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod options;
mod quarter;
mod record;
mod traits;

mod announcements;
mod extraction;
mod fetch;
mod pivot;
mod prompt;

#[cfg(feature = "company")]
mod company;
#[cfg(feature = "gemini")]
mod gemini;

// Core client (always available)
pub use config::{API_KEY_ENV, BseConfig, BseUrls, ExtractionConfig, MODEL_ENV};
pub use core::Bse;
pub use error::{BseError, Result};

// Domain types
pub use options::{FilterConfig, load_filter_configs, parse_filter_configs};
pub use quarter::{
    DateRange, FiscalQuarter, Quarter, label_sort_key, next_quarter, parse_quarter_label,
    quarter_date_range,
};
pub use record::{AnnouncementRecord, FilingItem, RecordDate, absolutize_link};

// Pipeline
pub use announcements::{AnnouncementQuery, AnnouncementResponse, RawAnnouncement, RowCount};
pub use extraction::{
    ExtractedField, ExtractedTable, RESULTS_CONFIG_NAME, ResultType, extract_results,
    parse_extraction_response, results_candidates, select_candidate, strip_code_fence,
};
pub use fetch::{MAX_RANGE_FISCAL_YEARS, check_range_span, fetch_quarter, fetch_range};
pub use pivot::{PivotCell, PivotTable, pivot};
pub use prompt::{STANDARD_FIELDS, extraction_prompt, is_standard_field, system_instruction};

#[cfg(feature = "company")]
pub use company::{CompanyMatch, parse_company_matches};
#[cfg(feature = "gemini")]
pub use gemini::GeminiExtractor;

// Collaborator traits
#[cfg(feature = "company")]
pub use traits::CompanyLookup;
pub use traits::{DocumentFetcher, FilingSource, ResultsExtractor};

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
