// src/fetch/mod.rs
// =============================================================================
// This module retrieves pages over HTTP.
//
// Submodules:
// - http: the reqwest-backed PageFetcher used by the real binary
//
// The PageFetcher trait is the seam between the crawl logic and the network.
// The crawler and the dispatcher only ever see a `dyn PageFetcher`, so tests
// can swap in an in-memory fetcher without touching a socket.
//
// Redirects are never followed by the fetcher itself: a 3xx answer comes back
// as a FetchResult with `redirected = true` and the target in `final_url`.
// Whoever called fetch decides what a redirect means (end of pagination for
// a category page, one more hop for a product page).
// =============================================================================

mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;

use crate::error::{FetchError, ProductError};

/// Outcome of a single HTTP GET
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The URL we asked for
    pub requested_url: String,
    /// The URL the server actually served (the redirect target for a 3xx)
    pub final_url: String,
    pub status: u16,
    /// True only when the server answered with a redirect status
    pub redirected: bool,
    /// Decoded response body (empty for redirects)
    pub document: String,
}

impl FetchResult {
    /// A 2xx page served at the URL that was requested
    pub fn page(url: impl Into<String>, document: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            final_url: url.clone(),
            requested_url: url,
            status: 200,
            redirected: false,
            document: document.into(),
        }
    }

    /// A redirect from `url` to `location`
    pub fn redirect(url: impl Into<String>, location: impl Into<String>, status: u16) -> Self {
        Self {
            requested_url: url.into(),
            final_url: location.into(),
            status,
            redirected: true,
            document: String::new(),
        }
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one URL without following redirects
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError>;
}

// Fetches a URL and follows up to `max_redirects` redirect hops
//
// Used for product pages, where a redirect (http -> https, an old slug, ...)
// still leads to a real product document.
pub async fn fetch_following(
    fetcher: &dyn PageFetcher,
    url: &str,
    max_redirects: usize,
) -> Result<FetchResult, ProductError> {
    let mut result = fetcher.fetch(url).await?;
    let mut hops = 0;

    while result.redirected {
        if hops == max_redirects {
            return Err(ProductError::TooManyRedirects {
                limit: max_redirects,
            });
        }
        hops += 1;
        tracing::debug!(from = %result.requested_url, to = %result.final_url, "following redirect");
        result = fetcher.fetch(&result.final_url).await?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapFetcher(HashMap<&'static str, FetchResult>);

    #[async_trait]
    impl PageFetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
            self.0.get(url).cloned().ok_or_else(|| FetchError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[tokio::test]
    async fn test_follow_single_redirect() {
        let fetcher = MapFetcher(HashMap::from([
            ("http://a.test/p", FetchResult::redirect("http://a.test/p", "http://a.test/q", 301)),
            ("http://a.test/q", FetchResult::page("http://a.test/q", "<html></html>")),
        ]));

        let result = fetch_following(&fetcher, "http://a.test/p", 5).await.unwrap();
        assert_eq!(result.final_url, "http://a.test/q");
        assert!(!result.redirected);
    }

    #[tokio::test]
    async fn test_redirect_loop_is_cut_off() {
        let fetcher = MapFetcher(HashMap::from([
            ("http://a.test/p", FetchResult::redirect("http://a.test/p", "http://a.test/q", 302)),
            ("http://a.test/q", FetchResult::redirect("http://a.test/q", "http://a.test/p", 302)),
        ]));

        let err = fetch_following(&fetcher, "http://a.test/p", 3).await.unwrap_err();
        assert!(matches!(err, ProductError::TooManyRedirects { limit: 3 }));
    }

    #[tokio::test]
    async fn test_zero_hops_rejects_any_redirect() {
        let fetcher = MapFetcher(HashMap::from([(
            "http://a.test/p",
            FetchResult::redirect("http://a.test/p", "http://a.test/q", 302),
        )]));

        let err = fetch_following(&fetcher, "http://a.test/p", 0).await.unwrap_err();
        assert!(matches!(err, ProductError::TooManyRedirects { limit: 0 }));
    }
}
