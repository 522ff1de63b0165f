// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the shared wishlist.
//!
//! This crate provides the error taxonomy, the domain types, the fuzzy
//! user-name matcher, and the adapter traits that the metadata extractor and
//! the resilient runner are written against.

pub mod error;
pub mod matching;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{FetchError, WishlistError};
pub use matching::{find_similar, DEFAULT_SIMILARITY_THRESHOLD};
pub use traits::{FetchedPage, Operation, PageFetcher, PersistenceSession};
pub use types::{HealthStatus, NewWish, Priority, User, WishRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wishlist_error_has_all_variants() {
        let _conn = WishlistError::connection("test");
        let _storage = WishlistError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _validation = WishlistError::Validation("test".into());
        let _not_found = WishlistError::NotFound {
            entity: "wish",
            id: "1".into(),
        };
        let _conflict = WishlistError::Conflict("test".into());
        let _internal = WishlistError::Internal("test".into());
    }

    #[test]
    fn only_connection_failures_are_retryable() {
        assert!(WishlistError::connection("db gone").is_retryable());
        assert!(WishlistError::connection("db gone").is_service_unavailable());

        let storage = WishlistError::Storage {
            source: Box::new(std::io::Error::other("UNIQUE constraint failed")),
        };
        assert!(!storage.is_retryable());
        assert!(!WishlistError::Validation("x".into()).is_retryable());
    }

    #[test]
    fn fetched_page_success_range() {
        let ok = FetchedPage {
            status: 204,
            body: String::new(),
        };
        let missing = FetchedPage {
            status: 404,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!missing.is_success());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_session<T: PersistenceSession>() {}
        fn _assert_fetcher<T: PageFetcher>() {}
    }
}
