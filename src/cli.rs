// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   shelf-crawler record <URL> <FILENAME> [options]
//
// Example:
//   shelf-crawler record "https://www.petsonic.com/dermatitis-y-problemas-piel-para-perros/" pet_products.csv
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "shelf-crawler",
    version,
    about = "Crawl a paginated product category and write one CSV row per product variant",
    long_about = "shelf-crawler walks every page of a product category, visits each product page, \
                  and appends one row per variant (name, price, image) to a CSV file. \
                  Rows are written page by page, so an interrupted run keeps everything finished so far."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a category page and write the results to a file
    ///
    /// Example: shelf-crawler record https://shop.example/category/ products.csv
    Record(RecordArgs),
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Category URL (page 1 of the listing)
    pub url: String,

    /// Output CSV file
    pub filename: PathBuf,

    /// Product pages fetched concurrently
    #[arg(long, default_value_t = 10)]
    pub workers: usize,

    /// Pause before each category page request, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Timeout for a single request, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Query parameter carrying the page number (page N = URL?p=N)
    #[arg(long, default_value = "p")]
    pub page_param: String,

    /// JSON file overriding the CSS selectors used for extraction
    #[arg(long, value_name = "FILE")]
    pub selectors: Option<PathBuf>,

    /// Keep an existing output file and append to it instead of truncating
    #[arg(long)]
    pub append: bool,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_positional_args() {
        let cli = Cli::parse_from(["shelf-crawler", "record", "https://example.test/cat/", "out.csv"]);
        let Commands::Record(args) = cli.command;
        assert_eq!(args.url, "https://example.test/cat/");
        assert_eq!(args.filename, PathBuf::from("out.csv"));
        assert_eq!(args.workers, 10);
        assert_eq!(args.delay_ms, 1000);
        assert!(!args.json);
    }

    #[test]
    fn test_redirect_and_user_agent_are_not_configurable() {
        for flag in [["--max-redirects", "9"], ["--user-agent", "custom/1.0"]] {
            let mut argv = vec!["shelf-crawler", "record", "https://example.test/cat/", "out.csv"];
            argv.extend(flag);
            assert!(Cli::try_parse_from(argv).is_err(), "{} was accepted", flag[0]);
        }
    }

    #[test]
    fn test_record_requires_filename() {
        let result = Cli::try_parse_from(["shelf-crawler", "record", "https://example.test/cat/"]);
        assert!(result.is_err());
    }
}
