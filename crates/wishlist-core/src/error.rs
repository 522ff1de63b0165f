// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the shared wishlist.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// The persistence backend is unreachable. Retryable.
    #[error("connection failure: {message}")]
    ConnectionFailure {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors that are not connection related
    /// (constraint violations, malformed SQL, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A record failed field validation before reaching storage.
    #[error("validation error: {0}")]
    Validation(String),

    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The requested change conflicts with current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WishlistError {
    /// Build a [`WishlistError::ConnectionFailure`] without an underlying source.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionFailure {
            message: message.into(),
            source: None,
        }
    }

    /// Whether the resilient runner may retry the failed operation.
    ///
    /// Only connection failures are transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailure { .. })
    }

    /// Whether a request handler should report "service unavailable"
    /// rather than a generic failure.
    pub fn is_service_unavailable(&self) -> bool {
        self.is_retryable()
    }
}

/// Soft failures raised while fetching a page for metadata extraction.
///
/// Returned by [`crate::PageFetcher`] implementations; the extractor
/// recovers from every variant locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request exceeded its deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-success status.
    #[error("server returned HTTP {0}")]
    Status(u16),

    /// DNS, connect, TLS, or redirect failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be read or decoded.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
