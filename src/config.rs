// src/config.rs
// =============================================================================
// The immutable configuration of one crawl run.
//
// Built once in main.rs from the command-line arguments, validated, and then
// handed to the crawler. Nothing in the crawl core reads the CLI or the
// environment directly.
// =============================================================================

use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::cli::RecordArgs;
use crate::crawl::DEFAULT_WORKERS;
use crate::extract::SelectorConfig;

pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PAGE_PARAM: &str = "p";

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// First listing page; later pages add `page_param` to its query
    pub base_url: Url,
    /// Output CSV file
    pub destination: PathBuf,
    /// Product pages fetched concurrently
    pub workers: usize,
    /// Pause before every listing page request
    pub courtesy_delay: Duration,
    /// Hard limit for a single HTTP request
    pub request_timeout: Duration,
    pub page_param: String,
    /// Keep an existing destination instead of truncating it
    pub append: bool,
    pub selectors: SelectorConfig,
}

impl CrawlConfig {
    // Configuration with every knob at its default
    pub fn new(base_url: &str, destination: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            destination: destination.into(),
            workers: DEFAULT_WORKERS,
            courtesy_delay: DEFAULT_DELAY,
            request_timeout: DEFAULT_TIMEOUT,
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            append: false,
            selectors: SelectorConfig::default(),
        })
    }

    pub fn from_args(args: &RecordArgs) -> Result<Self> {
        let mut config = Self::new(&args.url, &args.filename)?;

        config.workers = args.workers;
        config.courtesy_delay = Duration::from_millis(args.delay_ms);
        config.request_timeout = Duration::from_secs(args.timeout_secs);
        config.append = args.append;

        if args.page_param.trim().is_empty() {
            bail!("--page-param must not be empty");
        }
        config.page_param = args.page_param.clone();

        if let Some(path) = &args.selectors {
            config.selectors = SelectorConfig::from_file(path)?;
        }

        if config.workers == 0 {
            bail!("--workers must be at least 1");
        }

        Ok(config)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid URL '{}'", raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!("unsupported URL scheme '{}' in {}", other, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crate::cli::{Cli, Commands};

    fn record_args(argv: &[&str]) -> RecordArgs {
        let mut full = vec!["shelf-crawler", "record"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Record(args) => args,
        }
    }

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::new("https://example.test/cat/", "out.csv").unwrap();
        assert_eq!(config.workers, 10);
        assert_eq!(config.courtesy_delay, Duration::from_secs(1));
        assert_eq!(config.page_param, "p");
        assert!(!config.append);
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(CrawlConfig::new("not a url", "out.csv").is_err());
        assert!(CrawlConfig::new("ftp://example.test/cat/", "out.csv").is_err());
    }

    #[test]
    fn test_from_args_overrides() {
        let args = record_args(&[
            "https://example.test/cat/",
            "pets.csv",
            "--workers",
            "4",
            "--delay-ms",
            "250",
            "--page-param",
            "page",
            "--append",
        ]);
        let config = CrawlConfig::from_args(&args).unwrap();

        assert_eq!(config.workers, 4);
        assert_eq!(config.courtesy_delay, Duration::from_millis(250));
        assert_eq!(config.page_param, "page");
        assert_eq!(config.destination, PathBuf::from("pets.csv"));
        assert!(config.append);
    }

    #[test]
    fn test_from_args_rejects_zero_workers() {
        let args = record_args(&["https://example.test/cat/", "pets.csv", "--workers", "0"]);
        assert!(CrawlConfig::from_args(&args).is_err());
    }
}
