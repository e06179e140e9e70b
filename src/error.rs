// src/error.rs
// =============================================================================
// Error types for the crawl core.
//
// How each one is treated by the crawler:
// - FetchError on a category page   -> pagination ends normally
// - FetchError on a product page    -> product skipped, crawl continues
// - ExtractionError on a category   -> fatal (the selectors no longer match)
// - ExtractionError on a product    -> product skipped
// - SinkError                       -> fatal (we can't persist anything more)
//
// The binary wraps whatever reaches it in anyhow::Error.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure, DNS failure or timeout
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success, non-redirect status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document from {url} is not HTML markup")]
    NotMarkup { url: String },

    #[error("invalid {field} selector '{selector}': {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// Why a single product was skipped
#[derive(Debug, Error)]
pub enum ProductError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("more than {limit} redirects")]
    TooManyRedirects { limit: usize },

    #[error("invalid product link '{href}'")]
    InvalidLink { href: String },
}

// Errors that stop a run before pagination has ended
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("extraction failed on page {page}: {source}")]
    Extraction {
        page: u32,
        #[source]
        source: ExtractionError,
    },

    #[error("could not write records of page {page}: {source}")]
    Io {
        page: u32,
        #[source]
        source: SinkError,
    },

    #[error("could not prepare output destination: {0}")]
    Destination(#[source] SinkError),
}

impl CrawlError {
    /// Page at which the run stopped, if it got as far as a page
    pub fn page(&self) -> Option<u32> {
        match self {
            CrawlError::Extraction { page, .. } | CrawlError::Io { page, .. } => Some(*page),
            CrawlError::Destination(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CrawlError::Extraction { .. } => "ExtractionError",
            CrawlError::Io { .. } | CrawlError::Destination(_) => "IoError",
        }
    }
}
