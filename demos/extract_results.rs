//! Results extraction
//!
//! Fetches the results announcements of one quarter and extracts the financial line
//! items of the first candidate document that yields usable values, then prints them
//! as CSV.
//!
//! Requires `GEMINI_API_KEY` in the environment.
//!
//! Run with: `cargo run --example extract_results -- 500825 "Q3 FY2025" consolidated`

use bsekit::{
    Bse, BseError, FilterConfig, GeminiExtractor, ResultType, extract_results, fetch_range,
    parse_quarter_label, results_candidates,
};
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let scrip_code = args.first().map(String::as_str).unwrap_or("500825");
    let label = args.get(1).map(String::as_str).unwrap_or("Q3 FY2025");
    let result_type: ResultType = args
        .get(2)
        .map(String::as_str)
        .unwrap_or("consolidated")
        .parse()?;

    let bse = Bse::new()?;
    let extractor = GeminiExtractor::from_key_or_env(None)?;
    let quarter = parse_quarter_label(label)?;
    let configs = vec![
        FilterConfig::new("Results", "Result").with_lookahead(true),
        FilterConfig::new("Results", "Board Meeting")
            .with_filter("result")
            .with_lookahead(true),
    ];

    println!("=== BSE Results Extraction ===\n");

    let records = fetch_range(&bse, scrip_code, quarter, quarter, &configs).await?;
    let candidates = results_candidates(&records, quarter).len();
    println!("✓ {} candidate documents for {}\n", candidates, label);

    for index in 0..candidates {
        match extract_results(&records, label, result_type, index, &bse, &extractor).await {
            Ok(table) if !table.is_empty_result() => {
                println!("✓ Candidate {}: {}\n", index, table.document_link);
                print!("{}", table.to_csv()?);
                return Ok(());
            }
            Ok(_) => println!("- Candidate {} had no usable values, trying next", index),
            Err(e @ BseError::MissingDocumentLink { .. }) => println!("- {}", e),
            Err(e) => return Err(e.into()),
        }
    }

    println!("No candidate yielded results for {}", label);
    Ok(())
}
