//! Quarter-range announcement pivot
//!
//! Looks up a company by name, fetches its announcements for a range of fiscal quarters
//! and prints the category × quarter table with document counts and links.
//!
//! Run with: `cargo run --example quarter_pivot -- britannia "Q1 FY2025" "Q4 FY2025" [configs.json]`
//!
//! Set `RUST_LOG=bsekit=debug` to see every adapter call.

use bsekit::{
    Bse, CompanyLookup, FilterConfig, MAX_RANGE_FISCAL_YEARS, check_range_span, fetch_range,
    load_filter_configs, parse_quarter_label, pivot,
};
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let query = args.first().map(String::as_str).unwrap_or("britannia");
    let start = parse_quarter_label(args.get(1).map(String::as_str).unwrap_or("Q1 FY2025"))?;
    let end = parse_quarter_label(args.get(2).map(String::as_str).unwrap_or("Q4 FY2025"))?;
    let configs = match args.get(3) {
        Some(path) => load_filter_configs(path)?,
        None => FilterConfig::default_set(),
    };

    check_range_span(start, end, MAX_RANGE_FISCAL_YEARS)?;

    let bse = Bse::new()?;

    println!("=== BSE Quarter Pivot ===\n");

    let matches = bse.lookup(query).await?;
    let Some(company) = matches.first() else {
        println!("No company matches {:?}", query);
        return Ok(());
    };
    println!("✓ {} ({})", company.name, company.scrip_code);
    println!("Fetching {}..={} with {} configs...\n", start, end, configs.len());

    let records = fetch_range(&bse, &company.scrip_code, start, end, &configs).await?;
    println!("✓ {} announcements\n", records.len());

    let table = pivot(&records, &configs);
    if table.is_empty() {
        println!("Nothing to show.");
        return Ok(());
    }

    print!("{:<18}", "");
    for column in table.columns() {
        print!("{:>12}", column);
    }
    println!();
    for row in table.rows() {
        print!("{:<18}", row);
        for (_, cell) in table.row_cells(row) {
            print!("{:>12}", cell.len());
        }
        println!();
    }

    println!("\nDocuments:");
    for row in table.rows() {
        for (column, cell) in table.row_cells(row) {
            for (link, headline) in cell.documents() {
                println!("- [{} {}] {}\n  {}", row, column, headline, link);
            }
        }
    }

    Ok(())
}
