// src/fetch/http.rs
// =============================================================================
// The reqwest implementation of PageFetcher.
//
// Key functionality:
// - One shared Client (connection pooling) with a per-request timeout
// - Redirects are NOT followed: a 3xx answer is reported with its resolved
//   Location so the caller can tell a real redirect from a normal page
// - Non-success statuses and transport failures become FetchError values
//
// Rust concepts:
// - async_trait: lets us put an async fn behind a trait object
// - Url::join: resolves a relative Location header like a browser would
// =============================================================================

use async_trait::async_trait;
use reqwest::{header::LOCATION, redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

use super::{FetchResult, PageFetcher};
use crate::error::FetchError;

/// User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("shelf-crawler/", env!("CARGO_PKG_VERSION"));

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the HTTP client
    //
    // The default User-Agent is the only header we set. `timeout` is the hard
    // limit for one request, connection to last body byte.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        analyze_response(url, response).await
    }
}

// Turns an HTTP response into a FetchResult
//
// - 2xx: read the body, final URL = requested URL
// - 3xx with a Location header: redirect, final URL = resolved Location
// - anything else: HttpStatus error
async fn analyze_response(url: &str, response: Response) -> Result<FetchResult, FetchError> {
    let status = response.status();

    if status.is_success() {
        let document = response.text().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;
        return Ok(FetchResult::page(url, document));
    }

    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|loc| resolve_location(url, loc));

        if let Some(location) = location {
            return Ok(FetchResult::redirect(url, location, status.as_u16()));
        }
    }

    Err(FetchError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
    })
}

// Resolves a Location header against the URL that produced it
//
// Examples:
//   url = "https://example.test/cat/?p=9"
//   location = "/cat/"                  -> "https://example.test/cat/"
//   location = "https://other.test/x"   -> "https://other.test/x"
fn resolve_location(url: &str, location: &str) -> Option<String> {
    let base = Url::parse(url).ok()?;
    base.join(location).ok().map(|u| u.to_string())
}
