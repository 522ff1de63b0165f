// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page metadata extraction for wishlist items.
//!
//! Given a wish URL, fetches the page and derives a display name and a
//! thumbnail through an ordered fallback chain. Extraction never fails;
//! an unreachable page falls back to the URL's host.

pub mod document;
pub mod extractor;
pub mod fetcher;

pub use document::PageDocument;
pub use extractor::{host_of, resolve_image_url, ExtractionOutcome, MetadataExtractor};
pub use fetcher::ReqwestFetcher;
