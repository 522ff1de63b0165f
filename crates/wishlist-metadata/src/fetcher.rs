// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest-backed [`PageFetcher`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use wishlist_core::{FetchError, FetchedPage, PageFetcher, WishlistError};

/// Maximum redirects followed before giving up on a page.
const MAX_REDIRECTS: usize = 10;

/// Fetches pages with a shared, connection-pooling reqwest client.
///
/// Headers and the deadline are supplied per request so one client can
/// serve every extractor.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, WishlistError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| WishlistError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<FetchedPage, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "scheme '{}' is not supported",
                parsed.scheme()
            )));
        }

        let mut request = self.client.get(parsed).timeout(timeout);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;
        let status = response.status().as_u16();
        debug!(url, status, "page fetched");

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(timeout)
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        Ok(FetchedPage { status, body })
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(timeout)
    } else if err.is_builder() {
        FetchError::InvalidUrl(err.to_string())
    } else {
        FetchError::Transport(err.to_string())
    }
}
