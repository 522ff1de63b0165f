// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exponential backoff policy for retryable persistence failures.

use std::time::Duration;

use wishlist_config::model::ResilienceConfig;

/// How many times to attempt an operation and how long to wait in between.
///
/// The delay before retry `n` (0-indexed, counted from the first failure)
/// is `base_delay * 2^n`. There is no jitter and no cap; with the default
/// three attempts the waits are 100 ms then 200 ms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never zero.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// A policy that runs the operation exactly once.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn from_config(config: &ResilienceConfig) -> Self {
        Self::new(config.max_attempts, config.base_delay())
    }

    /// Delay after failed attempt `attempt` (0-indexed).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Whether another attempt follows failed attempt `attempt` (0-indexed).
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100))
    }
}
