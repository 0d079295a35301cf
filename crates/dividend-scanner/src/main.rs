//! dividend-scanner: rank upcoming dividend candidates from the published calendar.
//!
//! Usage:
//!   cargo run -p dividend-scanner
//!   cargo run -p dividend-scanner -- --top 10 --concurrency 4
//!   cargo run -p dividend-scanner -- --today 2024-03-10 --json

mod config;
mod report;

use calendar_scraper::CalendarScraper;
use chrono::Local;
use currency_client::CurrencyClient;
use dividend_core::DividendPipeline;
use std::time::Duration;

use crate::config::ScannerConfig;

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  dividend-scanner [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --top N            Candidates in the report (default: 5)");
    eprintln!("  --concurrency N    Quote pages fetched at once (default: 1)");
    eprintln!("  --today YYYY-MM-DD Reference date for the ex-dividend filter");
    eprintln!("  --json             Print the report as JSON");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dividend_scanner=info,dividend_core=info,currency_client=warn,calendar_scraper=warn".into()
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let mut config = ScannerConfig::from_env()?;
    if let Err(e) = config.apply_args(&args) {
        print_usage();
        return Err(e);
    }

    let timeout = Duration::from_secs(config.http_timeout_secs);
    let rates = CurrencyClient::new(&config.currency_api_url, config.currency_api_key.clone(), timeout);
    let scraper = CalendarScraper::new(&config.calendar_base_url, &config.calendar_path, timeout);

    let today = config.today.unwrap_or_else(|| Local::now().date_naive());
    tracing::info!(
        "Scanning dividend calendar for ex-dates after {} ({} tracked currencies)",
        today,
        config.tracked_currencies.len()
    );

    let pipeline = DividendPipeline::new(&rates, &scraper, &scraper, config.pipeline_settings());
    let scan = pipeline.run(today).await?;

    tracing::info!(
        "Reporting {} of {} eligible candidates ({} priced)",
        scan.lines.len(),
        scan.eligible,
        scan.priced
    );

    if config.json_output {
        println!("{}", serde_json::to_string_pretty(&scan)?);
    } else {
        print!("{}", report::render_text(&scan));
    }

    Ok(())
}
