// src/model.rs
// =============================================================================
// Plain data types shared by every stage of the crawl.
//
// - ProductRecord: one output row (one purchasable variant)
// - ListingPage: one category page and the records collected for it
// - CrawlState: where the pagination loop currently is
//
// None of these types know how they were fetched or where they are written.
// =============================================================================

use url::Url;

/// One purchasable variant of a product.
///
/// Price and image are kept exactly as the site renders them (currency
/// symbols, relative image paths and so on are not normalised).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub name: String,
    pub price: String,
    pub image_url: String,
}

impl ProductRecord {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            image_url: image_url.into(),
        }
    }
}

// A category page being processed
//
// A fresh ListingPage is built for every pagination step and moved into the
// sink once its records are complete, so no two pages ever share a product
// list.
#[derive(Debug)]
pub struct ListingPage {
    pub url: String,
    pub page_number: u32,
    pub products: Vec<ProductRecord>,
}

impl ListingPage {
    pub fn new(url: impl Into<String>, page_number: u32) -> Self {
        Self {
            url: url.into(),
            page_number,
            products: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// Pagination cursor
//
// Page 1 is the bare base URL; page N > 1 is the base URL with the page
// parameter appended to its query string (`?p=N` by default).
#[derive(Debug, Clone)]
pub struct CrawlState {
    base_url: Url,
    page_param: String,
    current_page: u32,
}

impl CrawlState {
    pub fn new(base_url: Url, page_param: impl Into<String>) -> Self {
        Self {
            base_url,
            page_param: page_param.into(),
            current_page: 1,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn current_url(&self) -> String {
        self.page_url(self.current_page)
    }

    pub fn page_url(&self, page_number: u32) -> String {
        if page_number <= 1 {
            return self.base_url.to_string();
        }

        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair(&self.page_param, &page_number.to_string());
        url.to_string()
    }

    pub fn advance(&mut self) {
        self.current_page += 1;
    }
}
