// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate-limited connection health checks.
//!
//! A [`HealthTracker`] remembers when the backend last answered a probe and
//! how many checks have failed in a row. The state lives behind an async
//! mutex that is held for the whole check, so concurrent callers never
//! probe the same backend twice inside one interval.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use wishlist_config::model::ResilienceConfig;
use wishlist_core::{HealthStatus, PersistenceSession};

/// Statement used to probe the backend.
pub const PROBE_STATEMENT: &str = "SELECT 1";

#[derive(Debug, Default)]
struct HealthState {
    last_success: Option<Instant>,
    last_failure: Option<Instant>,
    consecutive_errors: u32,
}

/// Tracks connection health for one persistence backend.
#[derive(Debug)]
pub struct HealthTracker {
    interval: Duration,
    failure_threshold: u32,
    state: Mutex<HealthState>,
}

impl HealthTracker {
    pub fn new(interval: Duration, failure_threshold: u32) -> Self {
        Self {
            interval,
            failure_threshold: failure_threshold.max(1),
            state: Mutex::new(HealthState::default()),
        }
    }

    pub fn from_config(config: &ResilienceConfig) -> Self {
        Self::new(config.health_check_interval(), config.failure_threshold)
    }

    /// Consecutive failed checks since the last successful probe.
    pub async fn consecutive_errors(&self) -> u32 {
        self.state.lock().await.consecutive_errors
    }

    /// Check backend health, probing only when the cached answer is stale.
    ///
    /// - A success within the interval is trusted without probing.
    /// - Once the threshold is reached, a failure within the interval is
    ///   trusted too, so a dead backend is not hammered by every request.
    /// - Otherwise the backend is probed. A failed probe below the threshold
    ///   disposes the session's connections and probes once more.
    pub async fn check<S>(&self, session: &S) -> HealthStatus
    where
        S: PersistenceSession + ?Sized,
    {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        if let Some(at) = state.last_success {
            if now.duration_since(at) < self.interval {
                return self.cached_status(&state);
            }
        }
        if state.consecutive_errors >= self.failure_threshold {
            if let Some(at) = state.last_failure {
                if now.duration_since(at) < self.interval {
                    debug!(
                        consecutive_errors = state.consecutive_errors,
                        "backend known unhealthy, skipping probe"
                    );
                    return self.cached_status(&state);
                }
            }
        }

        let first = match session.execute(PROBE_STATEMENT).await {
            Ok(()) => {
                Self::record_success(&mut state);
                return HealthStatus::Healthy;
            }
            Err(e) => e,
        };

        state.consecutive_errors = state.consecutive_errors.saturating_add(1);
        state.last_failure = Some(Instant::now());
        warn!(
            consecutive_errors = state.consecutive_errors,
            threshold = self.failure_threshold,
            error = %first,
            "health probe failed"
        );

        if state.consecutive_errors >= self.failure_threshold {
            return HealthStatus::Unhealthy(format!(
                "{} consecutive failed health checks: {first}",
                state.consecutive_errors
            ));
        }

        if let Err(e) = session.dispose().await {
            warn!(error = %e, "failed to dispose connections before reconnect");
        }

        match session.execute(PROBE_STATEMENT).await {
            Ok(()) => {
                info!("backend reachable again after reconnect");
                Self::record_success(&mut state);
                HealthStatus::Healthy
            }
            Err(e) => {
                warn!(error = %e, "health probe failed after reconnect");
                HealthStatus::Unhealthy(format!("reconnect failed: {e}"))
            }
        }
    }

    fn cached_status(&self, state: &HealthState) -> HealthStatus {
        if state.consecutive_errors >= self.failure_threshold {
            HealthStatus::Unhealthy(format!(
                "{} consecutive failed health checks",
                state.consecutive_errors
            ))
        } else {
            HealthStatus::Healthy
        }
    }

    fn record_success(state: &mut HealthState) {
        state.consecutive_errors = 0;
        state.last_success = Some(Instant::now());
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::from_config(&ResilienceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wishlist_test_utils::{MockSession, SessionCall};

    fn tracker() -> HealthTracker {
        HealthTracker::new(Duration::from_secs(30), 3)
    }

    #[tokio::test(start_paused = true)]
    async fn healthy_probe_is_cached_for_the_interval() {
        let session = MockSession::new();
        let tracker = tracker();

        assert!(tracker.check(&session).await.is_healthy());
        assert!(tracker.check(&session).await.is_healthy());
        assert_eq!(session.probe_count().await, 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(tracker.check(&session).await.is_healthy());
        assert_eq!(session.probe_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_probe_reconnects_and_retries_once() {
        let session = MockSession::with_failing_probes(1);
        let tracker = tracker();

        assert!(tracker.check(&session).await.is_healthy());
        assert_eq!(
            session.calls().await,
            vec![
                SessionCall::Execute(PROBE_STATEMENT.into()),
                SessionCall::Dispose,
                SessionCall::Execute(PROBE_STATEMENT.into()),
            ]
        );
        assert_eq!(tracker.consecutive_errors().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_reconnect_is_unhealthy_and_counts_once() {
        let session = MockSession::with_failing_probes(2);
        let tracker = tracker();

        let status = tracker.check(&session).await;
        assert!(!status.is_healthy());
        assert_eq!(tracker.consecutive_errors().await, 1);
        assert_eq!(session.probe_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn threshold_stops_reconnects_and_caches_failure() {
        let session = MockSession::with_failing_probes(100);
        let tracker = tracker();

        for _ in 0..3 {
            assert!(!tracker.check(&session).await.is_healthy());
        }
        assert_eq!(tracker.consecutive_errors().await, 3);
        // Two checks with a reconnect each, then the third gives up after one probe.
        assert_eq!(session.probe_count().await, 5);
        assert_eq!(session.count(&SessionCall::Dispose).await, 2);

        assert!(!tracker.check(&session).await.is_healthy());
        assert_eq!(session.probe_count().await, 5);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(!tracker.check(&session).await.is_healthy());
        assert_eq!(session.probe_count().await, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn recovery_after_threshold_resets_counter() {
        let session = MockSession::with_failing_probes(5);
        let tracker = tracker();
        for _ in 0..3 {
            tracker.check(&session).await;
        }
        assert_eq!(tracker.consecutive_errors().await, 3);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(tracker.check(&session).await.is_healthy());
        assert_eq!(tracker.consecutive_errors().await, 0);
    }
}
