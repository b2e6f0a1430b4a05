use bsekit::{
    AnnouncementQuery, Bse, DocumentFetcher, FilingSource, FilterConfig, FiscalQuarter,
    fetch_range, pivot,
};

#[tokio::test]
#[ignore]
async fn announcements_for_quarter() {
    let bse = Bse::new().unwrap();
    let window = FiscalQuarter::new(4, 2024).unwrap().date_range().unwrap();
    let query = AnnouncementQuery::new("500825", window, &FilterConfig::new("Results", "Result"));

    let response = bse.announcements(&query).await.unwrap();
    assert!(!response.table.is_empty());
}

#[tokio::test]
#[ignore]
async fn search_applies_filter() {
    let bse = Bse::new().unwrap();
    let window = FiscalQuarter::new(1, 2025).unwrap().date_range().unwrap();
    let config = FilterConfig::new("Results", "Board Meeting").with_filter("result");

    let items = bse.search("500825", window, &config).await.unwrap();
    assert!(items.iter().all(|i| config.matches(&i.headline, &i.title)));
}

#[tokio::test]
#[ignore]
async fn range_and_pivot() {
    let bse = Bse::new().unwrap();
    let configs = FilterConfig::default_set();
    let start = FiscalQuarter::new(1, 2025).unwrap();
    let end = FiscalQuarter::new(2, 2025).unwrap();

    let records = fetch_range(&bse, "500825", start, end, &configs)
        .await
        .unwrap();
    let table = pivot(&records, &configs);

    assert!(table.rows().iter().any(|row| row == "Results"));
    assert!(table.columns().len() <= 2);
}

#[tokio::test]
#[ignore]
async fn download_results_document() {
    let bse = Bse::new().unwrap();
    let configs = vec![FilterConfig::new("Results", "Result").with_lookahead(true)];
    let quarter = FiscalQuarter::new(3, 2025).unwrap();

    let records = fetch_range(&bse, "500825", quarter, quarter, &configs)
        .await
        .unwrap();
    let link = records
        .iter()
        .find_map(|r| r.document_link.as_deref())
        .unwrap();

    let bytes = bse.fetch_document(link).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
