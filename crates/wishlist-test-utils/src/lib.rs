// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for wishlist integration tests.
//!
//! Provides scripted adapters for fast, deterministic tests without a
//! database or network.
//!
//! # Components
//!
//! - [`MockSession`] - Persistence session with scripted probe and commit failures
//! - [`MockFetcher`] - Page fetcher serving canned pages and recording requests

pub mod mock_fetcher;
pub mod mock_session;

pub use mock_fetcher::{MockFetcher, RecordedRequest};
pub use mock_session::{MockSession, SessionCall};
