//! Corporate announcements search.
//!
//! BSE exposes announcements through a category search endpoint: given a scrip code, a
//! category (and optional subcategory) and a `YYYYMMDD` date window, it returns a JSON
//! document whose `Table` array holds one row per announcement.
//!
//! This module implements [`FilingSource`] for [`Bse`], which is the adapter the quarter
//! fetcher calls once per filter config and quarter.
//!
//! # Examples
//!
//! ```ignore
//! use bsekit::{Bse, FilingSource, FilterConfig, FiscalQuarter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bse = Bse::new()?;
//!     let window = FiscalQuarter::new(2, 2025)?.date_range()?;
//!     let config = FilterConfig::new("Results", "Result");
//!
//!     for item in bse.search("500825", window, &config).await? {
//!         println!("{} | {:?}", item.headline, item.link);
//!     }
//!     Ok(())
//! }
//! ```

use super::Bse;
use super::error::{BseError, Result};
use super::options::FilterConfig;
use super::quarter::DateRange;
use super::record::FilingItem;
use super::traits::FilingSource;
use async_trait::async_trait;
use serde::Deserialize;

/// Response from the announcements endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementResponse {
    /// Announcement rows; absent when nothing matched
    #[serde(rename = "Table", default)]
    pub table: Vec<RawAnnouncement>,

    /// Paging information (`ROWCNT`), when reported
    #[serde(rename = "Table1", default)]
    pub paging: Vec<RowCount>,
}

/// One announcement row as the exchange reports it. Every field may be null.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAnnouncement {
    #[serde(rename = "HEADLINE", default)]
    pub headline: Option<String>,
    #[serde(rename = "NEWSSUB", default)]
    pub news_sub: Option<String>,
    #[serde(rename = "NEWS_DT", default)]
    pub news_dt: Option<String>,
    #[serde(rename = "ATTACHMENTNAME", default)]
    pub attachment_name: Option<String>,
    #[serde(rename = "CATEGORYNAME", default)]
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RowCount {
    #[serde(rename = "ROWCNT", default)]
    pub row_count: Option<u64>,
}

impl From<RawAnnouncement> for FilingItem {
    fn from(raw: RawAnnouncement) -> Self {
        FilingItem {
            headline: raw.headline.unwrap_or_default(),
            title: raw.news_sub.unwrap_or_default(),
            raw_date: raw.news_dt,
            link: raw.attachment_name,
        }
    }
}

/// Query parameters for one announcements search.
#[derive(Debug, Clone)]
pub struct AnnouncementQuery {
    pub scrip_code: String,
    pub category: String,
    /// `-1` means "all subcategories"
    pub subcategory: String,
    /// Start date, `YYYYMMDD`
    pub from_date: String,
    /// End date, `YYYYMMDD`
    pub to_date: String,
    pub page: u32,
}

impl AnnouncementQuery {
    /// Builds the query for `config` over `range`.
    pub fn new(scrip_code: impl Into<String>, range: DateRange, config: &FilterConfig) -> Self {
        let (from_date, to_date) = range.format_compact();
        Self {
            scrip_code: scrip_code.into(),
            category: config.category.clone(),
            subcategory: config
                .subcategory
                .clone()
                .unwrap_or_else(|| "-1".to_string()),
            from_date,
            to_date,
            page: 1,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn to_query_params(&self) -> Vec<(String, String)> {
        vec![
            ("pageno".to_string(), self.page.to_string()),
            ("strCat".to_string(), self.category.clone()),
            ("strPrevDate".to_string(), self.from_date.clone()),
            ("strScrip".to_string(), self.scrip_code.clone()),
            ("strSearch".to_string(), "P".to_string()),
            ("strToDate".to_string(), self.to_date.clone()),
            ("strType".to_string(), "C".to_string()),
            ("subcategory".to_string(), self.subcategory.clone()),
        ]
    }
}

impl Bse {
    /// Runs one announcements query and returns the decoded response.
    pub async fn announcements(&self, query: &AnnouncementQuery) -> Result<AnnouncementResponse> {
        let query_string = serde_urlencoded::to_string(query.to_query_params())
            .map_err(|e| BseError::InvalidResponse(e.to_string()))?;

        let url = format!("{}?{}", self.announcements_url(), query_string);
        let response = self.get(&url, true).await?;

        Ok(serde_json::from_str(&response)?)
    }

    /// Parses an announcements response body.
    pub fn announcements_from_string(&self, content: &str) -> Result<AnnouncementResponse> {
        Ok(serde_json::from_str(content)?)
    }
}

#[async_trait]
impl FilingSource for Bse {
    /// Searches one category over one window and applies the config's filter.
    async fn search(
        &self,
        company_id: &str,
        range: DateRange,
        config: &FilterConfig,
    ) -> Result<Vec<FilingItem>> {
        tracing::debug!(
            "Requesting {} announcements ({}) for {} in {}",
            config.name,
            config.category,
            company_id,
            range
        );

        let query = AnnouncementQuery::new(company_id, range, config);
        let response = self.announcements(&query).await?;

        Ok(response
            .table
            .into_iter()
            .map(FilingItem::from)
            .filter(|item| config.matches(&item.headline, &item.title))
            .collect())
    }

    fn document_base_url(&self) -> &str {
        self.attachments_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FiscalQuarter;

    #[test]
    fn test_query_params() {
        let range = FiscalQuarter::new(4, 2024).unwrap().date_range().unwrap();
        let config = FilterConfig::new("Results", "Board Meeting").with_filter("result");
        let params = AnnouncementQuery::new("500180", range, &config).to_query_params();

        assert!(params.contains(&("strCat".to_string(), "Board Meeting".to_string())));
        assert!(params.contains(&("strPrevDate".to_string(), "20240101".to_string())));
        assert!(params.contains(&("strToDate".to_string(), "20240331".to_string())));
        assert!(params.contains(&("strScrip".to_string(), "500180".to_string())));
        assert!(params.contains(&("subcategory".to_string(), "-1".to_string())));
        assert!(params.contains(&("pageno".to_string(), "1".to_string())));
    }

    #[test]
    fn test_query_params_with_subcategory() {
        let range = FiscalQuarter::new(1, 2025).unwrap().date_range().unwrap();
        let config = FilterConfig::new("AGM", "AGM/EGM").with_subcategory("AGM");
        let query = AnnouncementQuery::new("500825", range, &config).with_page(2);
        let params = query.to_query_params();

        assert!(params.contains(&("subcategory".to_string(), "AGM".to_string())));
        assert!(params.contains(&("pageno".to_string(), "2".to_string())));
    }

    #[test]
    fn test_null_fields_map_to_empty_strings() {
        let response: AnnouncementResponse = serde_json::from_str(
            r#"{"Table": [{"HEADLINE": null, "NEWSSUB": "Outcome", "NEWS_DT": null, "ATTACHMENTNAME": null}]}"#,
        )
        .unwrap();
        let item = FilingItem::from(response.table[0].clone());
        assert_eq!(item.headline, "");
        assert_eq!(item.title, "Outcome");
        assert_eq!(item.raw_date, None);
        assert_eq!(item.link, None);
        assert!(response.paging.is_empty());
    }
}
