// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilience primitives for wishlist persistence writes.
//!
//! - [`HealthTracker`]: rate-limited connection health checks with a
//!   consecutive-failure threshold and reconnect-on-failure.
//! - [`RetryPolicy`]: bounded exponential backoff.
//! - [`ResilientRunner`]: runs an [`Operation`](wishlist_core::Operation)
//!   inside a transaction, gated by the tracker and retried by the policy.

pub mod health;
pub mod retry;
pub mod runner;

pub use health::HealthTracker;
pub use retry::RetryPolicy;
pub use runner::ResilientRunner;
