//! Fiscal quarter calendar.
//!
//! Indian listed companies report on an April-March fiscal year: fiscal year `FY2025`
//! starts on 1 April 2024 and ends on 31 March 2025. Announcements are searched by
//! calendar date, so every quarter the caller names has to be turned into a concrete
//! `[start, end]` window first.
//!
//! ```text
//!            FY2025
//! ┌─────────┬─────────┬─────────┬─────────┐
//! │   Q1    │   Q2    │   Q3    │   Q4    │
//! │ Apr-Jun │ Jul-Sep │ Oct-Dec │ Jan-Mar │
//! │  2024   │  2024   │  2024   │  2025   │
//! └─────────┴─────────┴─────────┴─────────┘
//! ```
//!
//! Quarters are displayed and keyed by their label, `"Q{quarter} FY{fiscal_year}"`
//! (e.g. `Q3 FY2025`). [`label_sort_key`] turns a label back into a sortable
//! `(fiscal_year, quarter)` pair.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{BseError, Result};

/// Quarter of a fiscal year (Q1-Q4).
///
/// Each quarter maps to specific calendar months:
/// - Q1: April through June (previous calendar year)
/// - Q2: July through September (previous calendar year)
/// - Q3: October through December (previous calendar year)
/// - Q4: January through March (same calendar year as the fiscal year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1 = 1,
    Q2 = 2,
    Q3 = 3,
    Q4 = 4,
}

impl Quarter {
    /// Creates a Quarter from its number (1-4)
    ///
    /// # Returns
    /// * `Ok(Quarter)` if the number is valid
    /// * `Err(BseError::InvalidQuarter)` otherwise
    pub fn from_number(number: u8) -> Result<Self> {
        match number {
            1 => Ok(Quarter::Q1),
            2 => Ok(Quarter::Q2),
            3 => Ok(Quarter::Q3),
            4 => Ok(Quarter::Q4),
            _ => Err(BseError::InvalidQuarter),
        }
    }

    /// Converts the quarter to its integer representation (1-4).
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Calendar month in which the quarter starts.
    fn start_month(&self) -> u32 {
        match self {
            Quarter::Q1 => 4,
            Quarter::Q2 => 7,
            Quarter::Q3 => 10,
            Quarter::Q4 => 1,
        }
    }
}

/// An inclusive calendar date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns `true` if `date` falls inside the window (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Formats both bounds as `YYYYMMDD`, the format the announcements API expects.
    pub fn format_compact(&self) -> (String, String) {
        (
            self.start.format("%Y%m%d").to_string(),
            self.end.format("%Y%m%d").to_string(),
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// A quarter of a specific fiscal year, e.g. `Q3 FY2025`.
///
/// Ordering is chronological: by fiscal year first, then quarter. The field order
/// below is what makes the derived `Ord` correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FiscalQuarter {
    fiscal_year: i32,
    quarter: Quarter,
}

impl FiscalQuarter {
    /// Creates a fiscal quarter, validating the quarter number.
    ///
    /// # Errors
    ///
    /// - `InvalidQuarter` if `quarter` is not 1-4
    pub fn new(quarter: u8, fiscal_year: i32) -> Result<Self> {
        Ok(Self::from_parts(Quarter::from_number(quarter)?, fiscal_year))
    }

    pub fn from_parts(quarter: Quarter, fiscal_year: i32) -> Self {
        Self {
            fiscal_year,
            quarter,
        }
    }

    pub fn quarter(&self) -> Quarter {
        self.quarter
    }

    pub fn quarter_number(&self) -> u8 {
        self.quarter.as_u8()
    }

    pub fn fiscal_year(&self) -> i32 {
        self.fiscal_year
    }

    /// The quarter immediately following this one; Q4 wraps to Q1 of the next fiscal year.
    ///
    /// # Errors
    ///
    /// - `InvalidFiscalYear` if the fiscal year cannot be incremented
    pub fn next(&self) -> Result<Self> {
        let next = match self.quarter {
            Quarter::Q1 => Self::from_parts(Quarter::Q2, self.fiscal_year),
            Quarter::Q2 => Self::from_parts(Quarter::Q3, self.fiscal_year),
            Quarter::Q3 => Self::from_parts(Quarter::Q4, self.fiscal_year),
            Quarter::Q4 => Self::from_parts(
                Quarter::Q1,
                self.fiscal_year
                    .checked_add(1)
                    .ok_or(BseError::InvalidFiscalYear(self.fiscal_year))?,
            ),
        };
        Ok(next)
    }

    /// Calendar window covered by this quarter.
    ///
    /// The window starts on the first day of the quarter's first month and ends on the
    /// last day of its third month.
    ///
    /// # Errors
    ///
    /// - `InvalidFiscalYear` if the dates cannot be represented
    pub fn date_range(&self) -> Result<DateRange> {
        let calendar_year = match self.quarter {
            Quarter::Q4 => Some(self.fiscal_year),
            _ => self.fiscal_year.checked_sub(1),
        };
        let start = calendar_year
            .and_then(|year| NaiveDate::from_ymd_opt(year, self.quarter.start_month(), 1))
            .ok_or(BseError::InvalidFiscalYear(self.fiscal_year))?;
        let end = start
            .checked_add_months(Months::new(3))
            .and_then(|d| d.pred_opt())
            .ok_or(BseError::InvalidFiscalYear(self.fiscal_year))?;
        Ok(DateRange { start, end })
    }

    /// Display label, e.g. `"Q3 FY2025"`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FiscalQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} FY{}", self.quarter.as_u8(), self.fiscal_year)
    }
}

impl FromStr for FiscalQuarter {
    type Err = BseError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BseError::InvalidQuarterLabel(s.to_string());
        let (fiscal_year, quarter, rest) = scan_label_prefix(s).ok_or_else(invalid)?;
        if !rest.is_empty() {
            return Err(invalid());
        }
        Self::new(quarter, fiscal_year)
    }
}

/// Calendar window for `quarter` of `fiscal_year`.
///
/// # Errors
///
/// - `InvalidQuarter` for quarters outside 1-4
pub fn quarter_date_range(quarter: u8, fiscal_year: i32) -> Result<DateRange> {
    FiscalQuarter::new(quarter, fiscal_year)?.date_range()
}

/// The `(quarter, fiscal_year)` pair following the given one.
pub fn next_quarter(quarter: u8, fiscal_year: i32) -> Result<(u8, i32)> {
    let next = FiscalQuarter::new(quarter, fiscal_year)?.next()?;
    Ok((next.quarter_number(), next.fiscal_year()))
}

/// Parses a `"Q{q} FY{fy}"` label into a [`FiscalQuarter`].
///
/// Unlike [`label_sort_key`], the whole label must match: trailing text is rejected.
pub fn parse_quarter_label(label: &str) -> Result<FiscalQuarter> {
    label.parse()
}

/// Sort key for a quarter label: `(fiscal_year, quarter)`.
///
/// Labels that do not match `Q<digit> FY<digits>` map to `(0, 0)` and therefore sort
/// before every well-formed label.
pub fn label_sort_key(label: &str) -> (i32, u8) {
    scan_label(label).unwrap_or((0, 0))
}

/// Matches `Q<digit> FY<digits>` at the start of `label`; trailing text is ignored.
fn scan_label(label: &str) -> Option<(i32, u8)> {
    scan_label_prefix(label).map(|(fiscal_year, quarter, _)| (fiscal_year, quarter))
}

/// Like [`scan_label`], also returning the unmatched remainder.
fn scan_label_prefix(label: &str) -> Option<(i32, u8, &str)> {
    let rest = label.strip_prefix('Q')?;
    let mut chars = rest.chars();
    let quarter = chars.next()?.to_digit(10)? as u8;
    let rest = chars.as_str().strip_prefix(" FY")?;

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let fiscal_year = rest[..end].parse::<i32>().ok()?;
    Some((fiscal_year, quarter, &rest[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quarter_windows_fy2025() {
        let cases = [
            (1, date(2024, 4, 1), date(2024, 6, 30)),
            (2, date(2024, 7, 1), date(2024, 9, 30)),
            (3, date(2024, 10, 1), date(2024, 12, 31)),
            (4, date(2025, 1, 1), date(2025, 3, 31)),
        ];
        for (q, start, end) in cases {
            let range = quarter_date_range(q, 2025).unwrap();
            assert_eq!(range.start, start, "Q{q} start");
            assert_eq!(range.end, end, "Q{q} end");
        }
    }

    #[test]
    fn test_invalid_quarter() {
        assert!(matches!(
            quarter_date_range(0, 2025),
            Err(BseError::InvalidQuarter)
        ));
        assert!(matches!(
            quarter_date_range(5, 2025),
            Err(BseError::InvalidQuarter)
        ));
        assert!(matches!(next_quarter(7, 2025), Err(BseError::InvalidQuarter)));
    }

    #[test]
    fn test_every_quarter_spans_three_months() {
        for fy in 1995..2060 {
            for q in 1..=4 {
                let range = quarter_date_range(q, fy).unwrap();
                assert_eq!(range.start.day(), 1);
                let months = (range.end.year() - range.start.year()) * 12
                    + range.end.month() as i32
                    - range.start.month() as i32;
                assert_eq!(months, 2, "Q{q} FY{fy}");
                // last day of the month: the next day starts a new month
                assert_eq!(range.end.succ_opt().unwrap().day(), 1);
            }
            let q4 = quarter_date_range(4, fy).unwrap();
            let next_q1 = quarter_date_range(1, fy + 1).unwrap();
            assert_eq!(q4.end.succ_opt().unwrap(), next_q1.start);
        }
    }

    #[test]
    fn test_leap_year_q4() {
        let range = quarter_date_range(4, 2024).unwrap();
        assert_eq!(range.end, date(2024, 3, 31));
        assert!(range.contains(date(2024, 2, 29)));
    }

    #[test]
    fn test_next_quarter_wraps() {
        assert_eq!(next_quarter(1, 2024).unwrap(), (2, 2024));
        assert_eq!(next_quarter(3, 2024).unwrap(), (4, 2024));
        assert_eq!(next_quarter(4, 2024).unwrap(), (1, 2025));
    }

    #[test]
    fn test_next_quarter_at_last_fiscal_year() {
        assert_eq!(next_quarter(3, i32::MAX).unwrap(), (4, i32::MAX));
        assert!(matches!(
            next_quarter(4, i32::MAX),
            Err(BseError::InvalidFiscalYear(i32::MAX))
        ));
        assert!(FiscalQuarter::new(4, i32::MAX).unwrap().next().is_err());
        assert!(matches!(
            quarter_date_range(1, i32::MIN),
            Err(BseError::InvalidFiscalYear(i32::MIN))
        ));
    }

    #[test]
    fn test_ordering_is_chronological() {
        let q4_24 = FiscalQuarter::new(4, 2024).unwrap();
        let q1_25 = FiscalQuarter::new(1, 2025).unwrap();
        let q2_25 = FiscalQuarter::new(2, 2025).unwrap();
        assert!(q4_24 < q1_25);
        assert!(q1_25 < q2_25);
    }

    #[test]
    fn test_label_round_trip() {
        for fy in [2000, 2024, 2025, 2100] {
            for q in 1..=4 {
                let fq = FiscalQuarter::new(q, fy).unwrap();
                assert_eq!(fq.label(), format!("Q{q} FY{fy}"));
                assert_eq!(label_sort_key(&fq.label()), (fy, q));
                assert_eq!(parse_quarter_label(&fq.label()).unwrap(), fq);
            }
        }
    }

    #[test]
    fn test_malformed_labels() {
        assert_eq!(label_sort_key("FY2025 Q1"), (0, 0));
        assert_eq!(label_sort_key("Q FY2025"), (0, 0));
        assert_eq!(label_sort_key("Q1 FY"), (0, 0));
        assert_eq!(label_sort_key(""), (0, 0));
        assert!(matches!(
            parse_quarter_label("Quarter 1"),
            Err(BseError::InvalidQuarterLabel(_))
        ));
        assert!(matches!(
            parse_quarter_label("Q9 FY2025"),
            Err(BseError::InvalidQuarter)
        ));
    }

    #[test]
    fn test_parse_rejects_trailing_text() {
        for label in ["Q3 FY2025 junk", "Q3 FY2025 ", "Q3 FY2025x"] {
            assert!(
                matches!(
                    parse_quarter_label(label),
                    Err(BseError::InvalidQuarterLabel(_))
                ),
                "{label:?}"
            );
        }
        // sort keys stay lenient
        assert_eq!(label_sort_key("Q3 FY2025 junk"), (2025, 3));
    }

    #[test]
    fn test_format_compact() {
        let range = quarter_date_range(3, 2024).unwrap();
        assert_eq!(
            range.format_compact(),
            ("20231001".to_string(), "20231231".to_string())
        );
    }
}
