// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Both traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod fetch;
pub mod session;

pub use fetch::{FetchedPage, PageFetcher};
pub use session::{Operation, PersistenceSession};
