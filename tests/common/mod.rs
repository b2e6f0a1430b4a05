use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use bsekit::{
    BseError, DateRange, DocumentFetcher, FilingItem, FilingSource, FilterConfig, FiscalQuarter,
    ResultType, ResultsExtractor,
};

pub const DOCUMENT_BASE: &str = "https://www.bseindia.com/xml-data/corpfiling/AttachHis/";

pub fn fixture_path(relative: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

pub fn read_fixture(relative: impl AsRef<Path>) -> String {
    fs::read_to_string(fixture_path(relative)).expect("fixture file should be readable")
}

#[allow(dead_code)]
pub fn bse() -> bsekit::Bse {
    bsekit::Bse::new().unwrap()
}

#[allow(dead_code)]
pub fn fq(quarter: u8, fiscal_year: i32) -> FiscalQuarter {
    FiscalQuarter::new(quarter, fiscal_year).unwrap()
}

#[allow(dead_code)]
pub fn item(headline: &str, title: &str, link: Option<&str>) -> FilingItem {
    FilingItem {
        headline: headline.to_string(),
        title: title.to_string(),
        raw_date: Some("2024-10-25T18:45:12.123".to_string()),
        link: link.map(str::to_string),
    }
}

/// One recorded adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub struct SearchCall {
    pub company_id: String,
    pub range: DateRange,
    pub category: String,
}

/// In-memory filing source keyed by (category, window start), recording every call.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingSource {
    responses: HashMap<(String, DateRange), Vec<FilingItem>>,
    by_category: HashMap<String, Vec<FilingItem>>,
    pub calls: Mutex<Vec<SearchCall>>,
    fail_on: Option<String>,
}

#[allow(dead_code)]
impl RecordingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items returned for `category` in any window.
    pub fn with_category(mut self, category: &str, items: Vec<FilingItem>) -> Self {
        self.by_category.insert(category.to_string(), items);
        self
    }

    /// Items returned for `category` in exactly `range`.
    pub fn with_window(mut self, category: &str, range: DateRange, items: Vec<FilingItem>) -> Self {
        self.responses.insert((category.to_string(), range), items);
        self
    }

    pub fn failing_on(mut self, category: &str) -> Self {
        self.fail_on = Some(category.to_string());
        self
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FilingSource for RecordingSource {
    async fn search(
        &self,
        company_id: &str,
        range: DateRange,
        config: &FilterConfig,
    ) -> bsekit::Result<Vec<FilingItem>> {
        self.calls.lock().unwrap().push(SearchCall {
            company_id: company_id.to_string(),
            range,
            category: config.category.clone(),
        });

        if self.fail_on.as_deref() == Some(config.category.as_str()) {
            return Err(BseError::AdapterError("source unavailable".to_string()));
        }

        if let Some(items) = self.responses.get(&(config.category.clone(), range)) {
            return Ok(items.clone());
        }
        Ok(self
            .by_category
            .get(&config.category)
            .cloned()
            .unwrap_or_default())
    }

    fn document_base_url(&self) -> &str {
        DOCUMENT_BASE
    }
}

/// Serves the same bytes for every URL and remembers which ones were requested.
#[derive(Default)]
#[allow(dead_code)]
pub struct StaticDocuments {
    pub requested: Mutex<Vec<String>>,
}

#[async_trait]
impl DocumentFetcher for StaticDocuments {
    async fn fetch_document(&self, url: &str) -> bsekit::Result<Vec<u8>> {
        self.requested.lock().unwrap().push(url.to_string());
        Ok(format!("%PDF {}", url).into_bytes())
    }
}

/// Answers with a canned reply per document link.
#[allow(dead_code)]
pub struct CannedExtractor {
    pub replies: HashMap<String, Result<String, String>>,
}

#[async_trait]
impl ResultsExtractor for CannedExtractor {
    async fn extract(
        &self,
        _quarter: FiscalQuarter,
        _result_type: ResultType,
        document: &[u8],
    ) -> bsekit::Result<String> {
        let text = String::from_utf8_lossy(document);
        let link = text.trim_start_matches("%PDF ");
        match self.replies.get(link) {
            Some(Ok(reply)) => Ok(reply.clone()),
            Some(Err(message)) => Err(BseError::InvalidResponse(message.clone())),
            None => Err(BseError::NotFound),
        }
    }
}
