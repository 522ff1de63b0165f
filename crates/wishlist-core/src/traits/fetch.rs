// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP fetch contract consumed by the metadata extractor.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;

/// Raw page returned by a [`PageFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches a page over HTTP.
///
/// Implementations must honour the `User-Agent` entry in `headers` and
/// return [`FetchError::Timeout`] once `timeout` has elapsed. A non-success
/// status is returned as a page, not an error; the caller decides.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<FetchedPage, FetchError>;
}
