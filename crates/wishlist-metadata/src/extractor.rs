// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display name and thumbnail extraction for wish URLs.
//!
//! Extraction never fails. A page that cannot be fetched degrades to the
//! URL's host as the name and no thumbnail; a page that parses but lacks
//! metadata walks a fallback chain for each field.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;
use wishlist_config::model::ScraperConfig;
use wishlist_core::types::{truncate_chars, MAX_DISPLAY_NAME_LEN, MAX_URL_LEN};
use wishlist_core::{FetchError, NewWish, PageFetcher, WishlistError};

use crate::document::PageDocument;
use crate::fetcher::ReqwestFetcher;

/// Meta keys tried in order for the thumbnail, before `link rel=image_src`
/// and the first `<img>`.
const THUMBNAIL_META_KEYS: &[&str] = &["og:image", "twitter:image", "thumbnail"];

/// What extraction produced for one URL.
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// No URL was given; the name passes through untouched.
    Skipped { name: Option<String> },
    /// The page was parsed and yielded a thumbnail.
    Complete { name: String, thumbnail_url: String },
    /// The page was parsed but offered no usable thumbnail.
    NameOnly { name: String },
    /// The page could not be fetched; the name fell back to the host.
    Fallback { name: String, failure: FetchError },
}

impl ExtractionOutcome {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Skipped { name } => name.as_deref(),
            Self::Complete { name, .. } | Self::NameOnly { name } | Self::Fallback { name, .. } => {
                Some(name)
            }
        }
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        match self {
            Self::Complete { thumbnail_url, .. } => Some(thumbnail_url),
            _ => None,
        }
    }

    /// Split into `(name, thumbnail_url)`.
    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        match self {
            Self::Skipped { name } => (name, None),
            Self::Complete {
                name,
                thumbnail_url,
            } => (Some(name), Some(thumbnail_url)),
            Self::NameOnly { name } | Self::Fallback { name, .. } => (Some(name), None),
        }
    }
}

/// Fetches a wish URL and derives its display name and thumbnail.
///
/// Holds no per-call state, so one instance can serve concurrent requests.
pub struct MetadataExtractor<F = ReqwestFetcher> {
    fetcher: Arc<F>,
    user_agent: String,
    timeout: Duration,
}

impl<F> Clone for MetadataExtractor<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
        }
    }
}

impl MetadataExtractor<ReqwestFetcher> {
    /// Extractor backed by a real HTTP client.
    pub fn new(config: &ScraperConfig) -> Result<Self, WishlistError> {
        Ok(Self::with_fetcher(ReqwestFetcher::new()?, config))
    }
}

impl<F: PageFetcher> MetadataExtractor<F> {
    pub fn with_fetcher(fetcher: F, config: &ScraperConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
        }
    }

    /// Derive `(name, thumbnail_url)` for `url`.
    ///
    /// An explicit `existing_name` is kept as is. Without one, the name is
    /// the first non-empty of `og:title`, the `<title>` text, and the URL
    /// host, capped at 200 characters.
    pub async fn extract(
        &self,
        url: Option<&str>,
        existing_name: Option<&str>,
    ) -> (Option<String>, Option<String>) {
        self.extract_outcome(url, existing_name).await.into_parts()
    }

    pub async fn extract_outcome(
        &self,
        url: Option<&str>,
        existing_name: Option<&str>,
    ) -> ExtractionOutcome {
        let existing_name = existing_name.filter(|n| !n.trim().is_empty());
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return ExtractionOutcome::Skipped {
                name: existing_name.map(str::to_string),
            };
        };

        let headers = [("User-Agent", self.user_agent.as_str())];
        let fetched = self.fetcher.get(url, &headers, self.timeout).await;

        let failure = match fetched {
            Ok(page) if page.is_success() => {
                return derive_from_page(url, &page.body, existing_name);
            }
            Ok(page) => FetchError::Status(page.status),
            Err(e) => e,
        };

        warn!(url, error = %failure, "metadata fetch failed, falling back to host name");
        ExtractionOutcome::Fallback {
            name: existing_name
                .map(str::to_string)
                .unwrap_or_else(|| fallback_name(url)),
            failure,
        }
    }

    /// Fill the derived fields of an insert candidate in place.
    pub async fn populate(&self, wish: &mut NewWish) {
        let (name, thumbnail_url) = self
            .extract(wish.url.as_deref(), wish.display_name.as_deref())
            .await;
        wish.display_name = name;
        wish.thumbnail_url = thumbnail_url;
    }
}

fn derive_from_page(url: &str, body: &str, existing_name: Option<&str>) -> ExtractionOutcome {
    let doc = PageDocument::parse(body);

    let name = match existing_name {
        Some(name) => name.to_string(),
        None => {
            let derived = doc
                .meta_content("og:title")
                .or_else(|| doc.first_element_text("title"))
                .unwrap_or_else(|| fallback_name(url));
            truncate_chars(&derived, MAX_DISPLAY_NAME_LEN)
        }
    };

    let candidate = THUMBNAIL_META_KEYS
        .iter()
        .find_map(|key| doc.meta_content(key))
        .or_else(|| doc.link_href("image_src"))
        .or_else(|| doc.first_image_src());

    let thumbnail_url = candidate.and_then(|src| {
        let resolved = resolve_image_url(url, &src);
        if resolved.is_none() {
            debug!(url, src = %src, "dropping unresolvable thumbnail");
        }
        resolved.filter(|t| t.chars().count() <= MAX_URL_LEN)
    });

    match thumbnail_url {
        Some(thumbnail_url) => ExtractionOutcome::Complete {
            name,
            thumbnail_url,
        },
        None => ExtractionOutcome::NameOnly { name },
    }
}

/// Host (with port, when explicit) of `url`, or `""` when it does not parse.
pub fn host_of(url: &str) -> String {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return String::new();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Last-resort name: the host, or the raw URL when it has none.
fn fallback_name(url: &str) -> String {
    let host = host_of(url);
    if host.is_empty() {
        truncate_chars(url.trim(), MAX_DISPLAY_NAME_LEN)
    } else {
        host
    }
}

/// Resolve an image source found on `page_url`.
///
/// Sources that already carry a scheme are returned unchanged. Anything
/// else is joined onto the page origin, so `/img/a.png` and `img/a.png` on
/// `https://x.com/page` both become `https://x.com/img/a.png`.
pub fn resolve_image_url(page_url: &str, src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    if Url::parse(src).is_ok() {
        return Some(src.to_string());
    }
    let origin = Url::parse(page_url.trim()).ok()?.join("/").ok()?;
    origin.join(src).ok().map(String::from)
}
