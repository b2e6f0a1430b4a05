//! Announcement records produced by the quarter fetcher.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::quarter::FiscalQuarter;

const NEWS_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One filing as returned by a [`FilingSource`](crate::FilingSource), before it is
/// attributed to a config and quarter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilingItem {
    pub headline: String,
    pub title: String,
    /// Date text exactly as the source reported it
    pub raw_date: Option<String>,
    /// Attachment link, relative or absolute
    pub link: Option<String>,
}

/// Announcement date, normalized when the source text could be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordDate {
    Parsed(NaiveDate),
    Raw(String),
}

impl RecordDate {
    /// Parses the exchange's `NEWS_DT` text (`2024-10-25T18:45:12.123`).
    ///
    /// Fractional seconds are dropped before parsing. Text that still does not parse is
    /// kept verbatim, including anything after the first `.`, so one odd record never
    /// fails the whole fetch and the raw value is never truncated.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.split('.').next().unwrap_or(raw).trim();
        match NaiveDateTime::parse_from_str(trimmed, NEWS_DATE_FORMAT) {
            Ok(datetime) => RecordDate::Parsed(datetime.date()),
            Err(e) => {
                tracing::warn!("Keeping unparsed announcement date {:?}: {}", raw, e);
                RecordDate::Raw(raw.to_string())
            }
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RecordDate::Parsed(date) => Some(*date),
            RecordDate::Raw(_) => None,
        }
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordDate::Parsed(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            RecordDate::Raw(raw) => f.write_str(raw),
        }
    }
}

/// A filing attributed to a filter config and to the quarter it was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRecord {
    pub config_name: String,
    pub date: RecordDate,
    pub headline: String,
    pub title: String,
    pub document_link: Option<String>,
    /// Target quarter, even when the filing was found in a lookahead window
    pub quarter: FiscalQuarter,
}

impl AnnouncementRecord {
    pub(crate) fn from_item(
        item: FilingItem,
        config_name: &str,
        quarter: FiscalQuarter,
        document_base_url: &str,
    ) -> Self {
        let date = match item.raw_date.as_deref() {
            Some(raw) => RecordDate::parse(raw),
            None => RecordDate::Raw(String::new()),
        };
        Self {
            config_name: config_name.to_string(),
            date,
            headline: item.headline,
            title: item.title,
            document_link: item
                .link
                .filter(|l| !l.trim().is_empty())
                .map(|l| absolutize_link(&l, document_base_url)),
            quarter,
        }
    }

    /// Quarter label used as the pivot column key, e.g. `"Q2 FY2025"`.
    pub fn quarter_label(&self) -> String {
        self.quarter.label()
    }
}

/// Prefixes relative attachment names with the document host.
pub fn absolutize_link(link: &str, document_base_url: &str) -> String {
    if link.starts_with("http") {
        link.to_string()
    } else {
        format!(
            "{}/{}",
            document_base_url.trim_end_matches('/'),
            link.trim_start_matches('/')
        )
    }
}
