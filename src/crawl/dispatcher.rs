// src/crawl/dispatcher.rs
// =============================================================================
// Fetches and extracts the product pages of one listing page concurrently.
//
// How it works:
// 1. Resolve every product link against the listing page URL
// 2. Turn each link into a future: fetch (following redirects) -> extract
// 3. Run the futures through buffer_unordered(workers), so at most `workers`
//    product fetches are in flight at any instant
// 4. Collect each product's records as one batch, in completion order
//
// Failures are per product: a product that can't be fetched or parsed is
// skipped and handed back in `failures`, the rest of the page carries on.
// Nothing is retried.
//
// Record order follows completion order, NOT link order. Products finish
// whenever their server round trip finishes.
// =============================================================================

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use url::Url;

use crate::error::ProductError;
use crate::extract::Extractor;
use crate::fetch::{fetch_following, PageFetcher};
use crate::model::ProductRecord;

pub const DEFAULT_WORKERS: usize = 10;

// Redirect hops followed for one product page (http -> https, renamed slug)
const PRODUCT_REDIRECT_LIMIT: usize = 5;

// A product that was attempted and skipped
#[derive(Debug)]
pub struct ProductFailure {
    pub url: String,
    pub error: ProductError,
}

#[derive(Debug, Default)]
pub struct DispatchOutcome {
    pub records: Vec<ProductRecord>,
    pub failures: Vec<ProductFailure>,
}

pub struct ConcurrentDispatcher {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn Extractor>,
    workers: usize,
}

impl ConcurrentDispatcher {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn Extractor>,
        workers: usize,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            // buffer_unordered(0) would never make progress
            workers: workers.max(1),
        }
    }

    // Processes every product link of a listing page
    //
    // Parameters:
    //   page_url: URL of the listing page (base for relative links)
    //   links: product links in document order
    //
    // Returns once every link has been attempted exactly once.
    pub async fn dispatch(&self, page_url: &str, links: &[String]) -> DispatchOutcome {
        let base = Url::parse(page_url).ok();

        let tasks = links.iter().map(|href| {
            let base = base.as_ref();
            async move {
                let url = match resolve_link(base, href) {
                    Some(url) => url,
                    None => {
                        let error = ProductError::InvalidLink { href: href.clone() };
                        return (href.clone(), Err(error));
                    }
                };
                let result = self.process_product(&url).await;
                (url, result)
            }
        });

        let mut outcome = DispatchOutcome::default();

        let mut completed = stream::iter(tasks).buffer_unordered(self.workers);
        while let Some((url, result)) = completed.next().await {
            match result {
                Ok(records) => {
                    tracing::debug!(%url, records = records.len(), "product extracted");
                    // The whole batch of one product goes in at once
                    outcome.records.extend(records);
                }
                Err(error) => outcome.failures.push(ProductFailure { url, error }),
            }
        }

        outcome
    }

    async fn process_product(&self, url: &str) -> Result<Vec<ProductRecord>, ProductError> {
        let page = fetch_following(self.fetcher.as_ref(), url, PRODUCT_REDIRECT_LIMIT).await?;
        let records = self.extractor.extract_product_records(&page)?;
        Ok(records)
    }
}

// Resolves a possibly-relative product link against the listing page
//
// Examples:
//   base = "https://example.test/cat/?p=2"
//   href = "/shampoo.html"           -> "https://example.test/shampoo.html"
//   href = "https://cdn.test/x.html" -> "https://cdn.test/x.html"
//   href = "mailto:shop@example.test" -> None (not HTTP)
fn resolve_link(base: Option<&Url>, href: &str) -> Option<String> {
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => base?.join(href).ok()?,
    };

    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}
