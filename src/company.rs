//! Company lookup.
//!
//! Announcements are keyed by the exchange's scrip code (e.g. `500825`), which users
//! rarely know. The quote search endpoint used by the exchange's own search box takes a
//! free-text query and answers with an HTML fragment:
//!
//! ```html
//! <li class="quotemenu">
//!   <a id="/stock-share-price/britannia-industries-ltd/britannia/500825/">
//!     <span>BRITANNIA INDUSTRIES LTD</span> ...
//!   </a>
//! </li>
//! ```
//!
//! The last path segment of the anchor `id` is the scrip code and the first `span` holds
//! the display name.

use super::Bse;
use super::error::{BseError, Result};
use super::traits::CompanyLookup;
use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// A company matching a lookup query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMatch {
    pub name: String,
    pub scrip_code: String,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| BseError::AdapterError(format!("Invalid selector {}: {:?}", css, e)))
}

/// Extracts company matches from the quote search HTML fragment.
///
/// Entries without an anchor `id` are skipped. When the anchor has no `span`, its full
/// text is used as the name.
pub fn parse_company_matches(html: &str) -> Result<Vec<CompanyMatch>> {
    let document = Html::parse_fragment(html);
    let item_selector = selector("li.quotemenu")?;
    let anchor_selector = selector("a")?;
    let name_selector = selector("span")?;

    let mut matches = Vec::new();
    for item in document.select(&item_selector) {
        let Some(anchor) = item.select(&anchor_selector).next() else {
            continue;
        };
        let Some(id) = anchor.value().attr("id") else {
            continue;
        };
        let Some(scrip_code) = id
            .trim()
            .trim_matches('/')
            .rsplit('/')
            .next()
            .filter(|code| !code.is_empty())
        else {
            continue;
        };

        let name = match anchor.select(&name_selector).next() {
            Some(span) => span.text().collect::<String>(),
            None => anchor.text().collect::<String>(),
        };

        matches.push(CompanyMatch {
            name: name.trim().to_string(),
            scrip_code: scrip_code.to_string(),
        });
    }

    Ok(matches)
}

#[async_trait]
impl CompanyLookup for Bse {
    /// Searches equities by name or ticker.
    async fn lookup(&self, query: &str) -> Result<Vec<CompanyMatch>> {
        let params = [("Type", "EQ"), ("text", query), ("flag", "site")];
        let query_string = serde_urlencoded::to_string(params)
            .map_err(|e| BseError::InvalidResponse(e.to_string()))?;

        let url = format!("{}?{}", self.company_search_url(), query_string);
        let html = self.get(&url, false).await?;
        let matches = parse_company_matches(&html)?;

        tracing::info!("Company lookup {:?} returned {} matches", query, matches.len());
        Ok(matches)
    }
}
