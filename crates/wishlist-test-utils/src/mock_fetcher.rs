// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned page fetcher for extractor tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use wishlist_core::{FetchError, FetchedPage, PageFetcher};

/// A request seen by [`MockFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl RecordedRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serves pre-registered responses keyed by exact URL.
///
/// Unregistered URLs fail with a transport error, like an unreachable host.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: Arc<HashMap<String, Result<FetchedPage, FetchError>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a 200 response with `body` for `url`.
    pub fn with_page(self, url: &str, body: &str) -> Self {
        self.with_response(
            url,
            Ok(FetchedPage {
                status: 200,
                body: body.to_string(),
            }),
        )
    }

    /// Register an arbitrary response for `url`.
    pub fn with_response(mut self, url: &str, response: Result<FetchedPage, FetchError>) -> Self {
        Arc::make_mut(&mut self.responses).insert(url.to_string(), response);
        self
    }

    /// Requests received so far, in order.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<FetchedPage, FetchError> {
        self.requests.lock().await.push(RecordedRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            timeout,
        });
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Transport(format!("no route to {url}"))))
    }
}
