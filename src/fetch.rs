//! Quarter and range fetchers.
//!
//! [`fetch_quarter`] runs every filter config against one quarter and merges the
//! results; [`fetch_range`] walks a closed range of quarters and concatenates them.
//!
//! Calls are issued strictly one after another: a range of N quarters with M configs
//! costs up to N×M sequential adapter calls.
//!
//! Results announcements for a quarter are usually published during the *following*
//! quarter (board meetings approving Q3 numbers happen in January-February). Configs
//! with `lookahead` therefore search the next quarter's window, but the records they
//! return are still attributed to the target quarter.

use std::collections::HashSet;

use super::error::{BseError, Result};
use super::options::FilterConfig;
use super::quarter::FiscalQuarter;
use super::record::AnnouncementRecord;
use super::traits::FilingSource;

/// Ranges longer than this are refused by [`check_range_span`].
pub const MAX_RANGE_FISCAL_YEARS: i32 = 5;

/// Fetches the announcements of `company_id` for one quarter.
///
/// Configs are processed in order. Once a config has contributed records under a name,
/// later configs with the same name are skipped for this quarter. Each config searches
/// either the target window or, with `lookahead`, the next quarter's window; its
/// results are re-filtered with `config.filter` and stamped with `quarter`.
///
/// # Errors
///
/// Adapter failures are returned as-is; no call is retried here.
pub async fn fetch_quarter<S>(
    source: &S,
    company_id: &str,
    quarter: FiscalQuarter,
    configs: &[FilterConfig],
) -> Result<Vec<AnnouncementRecord>>
where
    S: FilingSource + ?Sized,
{
    let current_window = quarter.date_range()?;
    let lookahead_window = quarter.next()?.date_range()?;

    let mut records = Vec::new();
    let mut seen_names: HashSet<&str> = HashSet::new();

    for config in configs {
        if seen_names.contains(config.name.as_str()) {
            tracing::debug!(
                "Skipping {} ({}) for {}: name already fetched",
                config.name,
                config.category,
                quarter
            );
            continue;
        }

        let window = if config.lookahead {
            lookahead_window
        } else {
            current_window
        };

        let items = source.search(company_id, window, config).await?;
        let kept: Vec<AnnouncementRecord> = items
            .into_iter()
            .filter(|item| config.matches(&item.headline, &item.title))
            .map(|item| {
                AnnouncementRecord::from_item(
                    item,
                    &config.name,
                    quarter,
                    source.document_base_url(),
                )
            })
            .collect();

        tracing::debug!(
            "{} ({}) for {} in {}: {} records",
            config.name,
            config.category,
            quarter,
            window,
            kept.len()
        );

        if !kept.is_empty() {
            seen_names.insert(config.name.as_str());
            records.extend(kept);
        }
    }

    Ok(records)
}

/// Fetches every quarter from `start` to `end` inclusive, in chronological order.
///
/// The fetcher itself places no limit on the span; see [`check_range_span`].
///
/// # Errors
///
/// * `BseError::InvalidRange` - `start` is after `end`
/// * Any adapter error from [`fetch_quarter`]
pub async fn fetch_range<S>(
    source: &S,
    company_id: &str,
    start: FiscalQuarter,
    end: FiscalQuarter,
    configs: &[FilterConfig],
) -> Result<Vec<AnnouncementRecord>>
where
    S: FilingSource + ?Sized,
{
    if start > end {
        return Err(BseError::InvalidRange {
            start: start.label(),
            end: end.label(),
        });
    }

    let mut records = Vec::new();
    let mut quarter = start;
    let mut visited = 0usize;

    loop {
        let quarter_records = fetch_quarter(source, company_id, quarter, configs).await?;
        records.extend(quarter_records);
        visited += 1;
        if quarter >= end {
            break;
        }
        quarter = quarter.next()?;
    }

    tracing::info!(
        "Fetched {} announcements for {} across {} quarters ({}..={})",
        records.len(),
        company_id,
        visited,
        start,
        end
    );

    Ok(records)
}

/// Rejects ranges spanning more than `max_fiscal_years` fiscal years (counted
/// inclusively, so FY2024..FY2028 is five years).
pub fn check_range_span(
    start: FiscalQuarter,
    end: FiscalQuarter,
    max_fiscal_years: i32,
) -> Result<()> {
    if start > end {
        return Err(BseError::InvalidRange {
            start: start.label(),
            end: end.label(),
        });
    }
    let span = end.fiscal_year() - start.fiscal_year() + 1;
    if span > max_fiscal_years {
        return Err(BseError::ConfigError(format!(
            "Range {}..={} spans {} fiscal years, at most {} allowed",
            start, end, span, max_fiscal_years
        )));
    }
    Ok(())
}
