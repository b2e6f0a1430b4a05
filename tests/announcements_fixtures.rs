mod common;

use bsekit::{FilingItem, FilterConfig, RecordDate, fetch_quarter};
use chrono::NaiveDate;
use common::{RecordingSource, bse, fq, read_fixture};

fn fixture_items(name: &str) -> Vec<FilingItem> {
    let content = read_fixture(format!("announcements/{}", name));
    bse()
        .announcements_from_string(&content)
        .unwrap()
        .table
        .into_iter()
        .map(FilingItem::from)
        .collect()
}

#[test]
fn parse_announcements_response() {
    let content = read_fixture("announcements/results.json");
    let response = bse().announcements_from_string(&content).unwrap();

    assert_eq!(response.table.len(), 3);
    assert_eq!(response.paging[0].row_count, Some(3));

    let first = &response.table[0];
    assert_eq!(first.category_name.as_deref(), Some("Result"));
    assert_eq!(
        first.attachment_name.as_deref(),
        Some("6f0d1c2e-8a7b-4c5d-9e3f-1a2b3c4d5e6f.pdf")
    );
    assert!(response.table[2].headline.is_none());
}

#[test]
fn parse_empty_response() {
    let content = read_fixture("announcements/empty.json");
    let response = bse().announcements_from_string(&content).unwrap();
    assert!(response.table.is_empty());
}

#[test]
fn filing_items_from_rows() {
    let items = fixture_items("results.json");

    assert_eq!(
        items[0].title,
        "Britannia Industries Ltd - 500825 - Financial Results For The Quarter Ended December 31, 2024"
    );
    assert_eq!(items[0].raw_date.as_deref(), Some("2025-02-05T16:12:40.57"));
    assert_eq!(items[2].headline, "");
}

#[tokio::test]
async fn records_from_fixture_rows() {
    let source = RecordingSource::new().with_category("Result", fixture_items("results.json"));
    let configs = vec![FilterConfig::new("Results", "Result").with_lookahead(true)];

    let records = fetch_quarter(&source, "500825", fq(3, 2025), &configs)
        .await
        .unwrap();
    assert_eq!(records.len(), 3);

    // Relative attachment names get the document host, absolute ones are kept.
    assert_eq!(
        records[0].document_link.as_deref(),
        Some(
            "https://www.bseindia.com/xml-data/corpfiling/AttachHis/6f0d1c2e-8a7b-4c5d-9e3f-1a2b3c4d5e6f.pdf"
        )
    );
    assert_eq!(
        records[1].document_link.as_deref(),
        Some("https://www.bseindia.com/xml-data/corpfiling/AttachLive/a1b2c3d4.pdf")
    );
    assert_eq!(records[2].document_link, None);

    assert_eq!(
        records[0].date,
        RecordDate::Parsed(NaiveDate::from_ymd_opt(2025, 2, 5).unwrap())
    );
    assert_eq!(
        records[1].date,
        RecordDate::Parsed(NaiveDate::from_ymd_opt(2025, 2, 6).unwrap())
    );
    assert_eq!(records[2].date, RecordDate::Raw("not a date".to_string()));

    assert!(records.iter().all(|r| r.quarter == fq(3, 2025)));
    assert!(records.iter().all(|r| r.quarter_label() == "Q3 FY2025"));
}

#[tokio::test]
async fn filter_applies_to_fixture_rows() {
    let source = RecordingSource::new().with_category("Result", fixture_items("results.json"));
    let configs = vec![FilterConfig::new("Publications", "Result").with_filter("NEWSPAPER")];

    let records = fetch_quarter(&source, "500825", fq(3, 2025), &configs)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].headline,
        "Newspaper advertisement of financial results"
    );
}
