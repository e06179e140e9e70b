// src/crawl/category.rs
// =============================================================================
// The pagination loop.
//
// One category page at a time, strictly in order:
//
//   FetchingListing -> ExtractingLinks -> Dispatching -> Persisting
//        ^                                                   |
//        +------------------ AdvancingPage <-----------------+
//
// and Done when:
// - the listing request is answered with a redirect (the site sends
//   out-of-range page numbers back to the category), or
// - the listing request fails outright, or
// - a listing page loads but its products yield no records at all.
//
// Those three are the normal end of a crawl. A listing page that isn't
// markup, or an output file we can't write to, stops the run with an error
// instead; whatever was written before that stays valid.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use super::dispatcher::ConcurrentDispatcher;
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::extract::Extractor;
use crate::fetch::{FetchResult, PageFetcher};
use crate::model::{CrawlState, ListingPage};
use crate::report::{CrawlReport, StatusReporter, StopReason};
use crate::sink::RecordSink;

enum Phase {
    FetchingListing,
    ExtractingLinks(FetchResult),
    Dispatching { page: ListingPage, links: Vec<String> },
    Persisting(ListingPage),
    AdvancingPage,
    Done(StopReason),
}

pub struct CategoryCrawler {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn Extractor>,
    dispatcher: ConcurrentDispatcher,
    reporter: Arc<dyn StatusReporter>,
    state: CrawlState,
    courtesy_delay: Duration,
    append: bool,
}

impl CategoryCrawler {
    pub fn new(
        config: &CrawlConfig,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn Extractor>,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        let dispatcher = ConcurrentDispatcher::new(fetcher.clone(), extractor.clone(), config.workers);

        Self {
            fetcher,
            extractor,
            dispatcher,
            reporter,
            state: CrawlState::new(config.base_url.clone(), config.page_param.clone()),
            courtesy_delay: config.courtesy_delay,
            append: config.append,
        }
    }

    // Runs the crawl to completion
    //
    // Returns the run summary when pagination ended normally, or the error
    // (with its page number) that stopped the run.
    pub async fn run(mut self, sink: &mut dyn RecordSink) -> Result<CrawlReport, CrawlError> {
        self.reporter
            .run_started(self.state.base_url().as_str(), sink.destination());

        let prepared = if self.append {
            sink.ensure_header()
        } else {
            sink.reset()
        };
        prepared.map_err(CrawlError::Destination)?;

        let mut pages: u32 = 0;
        let mut records: usize = 0;
        let mut skipped_products: usize = 0;

        let mut phase = Phase::FetchingListing;
        let stop_reason = loop {
            phase = match phase {
                Phase::FetchingListing => self.fetch_listing().await,

                Phase::ExtractingLinks(listing) => {
                    let page_number = self.state.current_page();
                    let links = self
                        .extractor
                        .extract_listing_links(&listing)
                        .map_err(|source| CrawlError::Extraction {
                            page: page_number,
                            source,
                        })?;

                    tracing::debug!(page = page_number, links = links.len(), "listing parsed");
                    Phase::Dispatching {
                        page: ListingPage::new(listing.final_url, page_number),
                        links,
                    }
                }

                Phase::Dispatching { mut page, links } => {
                    let outcome = self.dispatcher.dispatch(&page.url, &links).await;
                    for failure in &outcome.failures {
                        tracing::warn!(
                            page = page.page_number,
                            url = %failure.url,
                            error = %failure.error,
                            "skipping product"
                        );
                    }
                    skipped_products += outcome.failures.len();
                    page.products = outcome.records;
                    Phase::Persisting(page)
                }

                Phase::Persisting(page) if page.is_empty() => Phase::Done(StopReason::EmptyPage {
                    page: page.page_number,
                }),

                Phase::Persisting(page) => {
                    sink.append(&page.products)
                        .map_err(|source| CrawlError::Io {
                            page: page.page_number,
                            source,
                        })?;

                    pages += 1;
                    records += page.products.len();
                    tracing::info!(page = page.page_number, records = page.products.len(), "page persisted");
                    self.reporter
                        .page_completed(page.page_number, page.products.len());
                    Phase::AdvancingPage
                }

                Phase::AdvancingPage => {
                    self.state.advance();
                    Phase::FetchingListing
                }

                Phase::Done(reason) => break reason,
            };
        };

        tracing::info!(pages, records, skipped_products, ?stop_reason, "crawl finished");

        let report = CrawlReport {
            pages,
            records,
            skipped_products,
            stop_reason,
        };
        self.reporter.run_finished(&report);
        Ok(report)
    }

    async fn fetch_listing(&self) -> Phase {
        let url = self.state.current_url();

        tokio::time::sleep(self.courtesy_delay).await;

        match self.fetcher.fetch(&url).await {
            Ok(listing) if listing.redirected => {
                tracing::info!(%url, status = listing.status, to = %listing.final_url, "listing redirected, no more pages");
                Phase::Done(StopReason::Redirected {
                    to: listing.final_url,
                })
            }
            Ok(listing) => Phase::ExtractingLinks(listing),
            Err(error) => {
                tracing::info!(%url, %error, "listing fetch failed, no more pages");
                Phase::Done(StopReason::FetchFailed {
                    error: error.to_string(),
                })
            }
        }
    }
}
