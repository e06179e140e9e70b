// src/extract/mod.rs
// =============================================================================
// This module turns fetched documents into data.
//
// Submodules:
// - selectors: the site-specific field locations (configurable)
// - html: the scraper-based Extractor driven by those selectors
//
// Extraction is synchronous and CPU-only: it never touches the network, so
// it can run between awaits without holding a parsed document across them.
// =============================================================================

mod html;
mod selectors;

pub use html::SelectorExtractor;
pub use selectors::SelectorConfig;

use crate::error::ExtractionError;
use crate::fetch::FetchResult;
use crate::model::ProductRecord;

pub trait Extractor: Send + Sync {
    /// Product page links of a listing page, in document order
    ///
    /// Links are returned as written in the page (relative or absolute).
    fn extract_listing_links(&self, page: &FetchResult) -> Result<Vec<String>, ExtractionError>;

    /// One record per variant of a product page
    fn extract_product_records(&self, page: &FetchResult) -> Result<Vec<ProductRecord>, ExtractionError>;
}
