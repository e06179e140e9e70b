// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the crawl configuration and its collaborators
//    (HTTP fetcher, selector extractor, CSV sink, console reporter)
// 3. Run the crawl and print the summary
// 4. Exit with proper code (0 = done, 1 = run stopped by an error,
//    2 = bad arguments / startup error)
//
// Logs go to stderr (RUST_LOG controls the level); the summary goes to
// stdout so `--json` output can be piped.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod extract;
mod fetch;
mod model;
mod report;
mod sink;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use cli::{Cli, Commands, RecordArgs};
use config::CrawlConfig;
use crawl::CategoryCrawler;
use error::CrawlError;
use extract::SelectorExtractor;
use fetch::HttpFetcher;
use report::{describe_stop, ConsoleReporter, CrawlReport};
use sink::CsvSink;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,shelf_crawler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Record(args) => handle_record(&args).await,
    }
}

// Handles the 'record' subcommand
//
// Returns:
//   Ok(0) = crawl ran until pagination ended
//   Ok(1) = crawl stopped on a fatal error (partial output is kept)
//   Err   = could not even start (bad URL, bad selector file, ...)
async fn handle_record(args: &RecordArgs) -> Result<i32> {
    let config = CrawlConfig::from_args(args)?;

    let fetcher = HttpFetcher::new(config.request_timeout)
        .context("building HTTP client")?;
    let extractor = SelectorExtractor::new(&config.selectors)?;
    let reporter = ConsoleReporter::new(args.json);
    let mut sink = CsvSink::new(&config.destination);

    let crawler = CategoryCrawler::new(
        &config,
        Arc::new(fetcher),
        Arc::new(extractor),
        Arc::new(reporter),
    );

    match crawler.run(&mut sink).await {
        Ok(report) => {
            print_report(&report, args.json)?;
            Ok(0)
        }
        Err(e) => {
            print_failure(&e, args.json)?;
            Ok(1)
        }
    }
}

fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!();
    println!("📊 Summary:");
    println!("   📄 Pages: {}", report.pages);
    println!("   🧾 Records: {}", report.records);
    println!("   ⚠️  Skipped products: {}", report.skipped_products);
    println!("   🛑 Stopped: {}", describe_stop(&report.stop_reason));
    Ok(())
}

fn print_failure(error: &CrawlError, json: bool) -> Result<()> {
    if json {
        let value = json!({
            "error": error.kind(),
            "page": error.page(),
            "message": error.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match error.page() {
        Some(page) => eprintln!("❌ Run stopped at page {} ({}): {}", page, error.kind(), error),
        None => eprintln!("❌ Run stopped ({}): {}", error.kind(), error),
    }
    eprintln!("   Rows written before the failure are kept.");
    Ok(())
}
