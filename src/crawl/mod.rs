// src/crawl/mod.rs
// =============================================================================
// This module drives the crawl.
//
// Submodules:
// - category: the pagination state machine (one listing page at a time)
// - dispatcher: the bounded worker pool that processes a page's products
//
// Concurrency only ever happens inside one listing page. Page N+1 is not
// requested until page N's records are on disk.
// =============================================================================

mod category;
mod dispatcher;

pub use category::CategoryCrawler;
pub use dispatcher::DEFAULT_WORKERS;
