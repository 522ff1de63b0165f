// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilient execution of persistence writes.

use std::sync::Arc;

use tracing::{debug, error, warn};
use wishlist_config::model::ResilienceConfig;
use wishlist_core::{HealthStatus, Operation, PersistenceSession, WishlistError};

use crate::health::HealthTracker;
use crate::retry::RetryPolicy;

/// Runs [`Operation`]s against a session with a health gate, a transaction
/// scope, and retry on connection failure.
///
/// Cloning is cheap; clones share the session and the health tracker.
pub struct ResilientRunner<S: PersistenceSession> {
    session: Arc<S>,
    health: Arc<HealthTracker>,
    policy: RetryPolicy,
}

impl<S: PersistenceSession> Clone for ResilientRunner<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            health: Arc::clone(&self.health),
            policy: self.policy.clone(),
        }
    }
}

impl<S: PersistenceSession> ResilientRunner<S> {
    pub fn new(session: Arc<S>, health: Arc<HealthTracker>, policy: RetryPolicy) -> Self {
        Self {
            session,
            health,
            policy,
        }
    }

    pub fn from_config(session: Arc<S>, config: &ResilienceConfig) -> Self {
        Self::new(
            session,
            Arc::new(HealthTracker::from_config(config)),
            RetryPolicy::from_config(config),
        )
    }

    pub fn session(&self) -> &Arc<S> {
        &self.session
    }

    pub fn health(&self) -> &Arc<HealthTracker> {
        &self.health
    }

    /// Run `op`, retrying connection failures with exponential backoff.
    ///
    /// Any other error is returned after the first attempt. When every
    /// attempt fails to reach the backend, the last
    /// [`WishlistError::ConnectionFailure`] is returned.
    pub async fn run<O>(&self, op: &O) -> Result<O::Output, WishlistError>
    where
        O: Operation<S>,
    {
        let mut attempt = 0;
        loop {
            match self.attempt(op).await {
                Ok(output) => {
                    if attempt > 0 {
                        debug!(attempt, "operation succeeded after retry");
                    }
                    return Ok(output);
                }
                Err(e) if e.is_retryable() && self.policy.has_next(attempt) => {
                    let delay = self.policy.backoff(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "connection failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_retryable() {
                        error!(
                            attempts = attempt + 1,
                            error = %e,
                            "giving up after repeated connection failures"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }

    /// One health-gated, transactional attempt.
    async fn attempt<O>(&self, op: &O) -> Result<O::Output, WishlistError>
    where
        O: Operation<S>,
    {
        if let HealthStatus::Unhealthy(reason) = self.health.check(self.session.as_ref()).await {
            return Err(WishlistError::connection(format!(
                "database unavailable: {reason}"
            )));
        }

        let session = self.session.as_ref();
        session.begin().await?;
        let scope = RollbackOnDrop::arm(&self.session);
        let executed = op.execute(session).await;
        scope.disarm();

        let result = match executed {
            Ok(output) => session.commit().await.map(|()| output),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            if let Err(rollback_err) = session.rollback().await {
                warn!(error = %rollback_err, original = %e, "rollback failed");
            }
        }
        result
    }
}

/// Rolls the session back on a spawned task if the attempt is cancelled
/// while the operation runs.
struct RollbackOnDrop<S: PersistenceSession> {
    session: Option<Arc<S>>,
}

impl<S: PersistenceSession> RollbackOnDrop<S> {
    fn arm(session: &Arc<S>) -> Self {
        Self {
            session: Some(Arc::clone(session)),
        }
    }

    fn disarm(mut self) {
        self.session.take();
    }
}

impl<S: PersistenceSession> Drop for RollbackOnDrop<S> {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        warn!("operation cancelled inside a transaction, rolling back");
        handle.spawn(async move {
            if let Err(e) = session.rollback().await {
                warn!(error = %e, "rollback after cancellation failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wishlist_test_utils::{MockSession, SessionCall};

    struct Noop;

    #[async_trait::async_trait]
    impl Operation<MockSession> for Noop {
        type Output = &'static str;

        async fn execute(&self, _session: &MockSession) -> Result<Self::Output, WishlistError> {
            Ok("done")
        }
    }

    fn runner(session: MockSession) -> ResilientRunner<MockSession> {
        ResilientRunner::new(
            Arc::new(session),
            Arc::new(HealthTracker::new(Duration::from_secs(30), 3)),
            RetryPolicy::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn healthy_run_commits() {
        let runner = runner(MockSession::new());
        assert_eq!(runner.run(&Noop).await.unwrap(), "done");
        assert_eq!(
            runner.session().calls().await,
            vec![
                SessionCall::Execute("SELECT 1".into()),
                SessionCall::Begin,
                SessionCall::Commit,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_commit_rolls_back_and_retries() {
        let session = MockSession::new();
        session.fail_next_commits(1).await;
        let runner = runner(session);

        assert_eq!(runner.run(&Noop).await.unwrap(), "done");
        let session = runner.session();
        assert_eq!(session.count(&SessionCall::Begin).await, 2);
        assert_eq!(session.count(&SessionCall::Rollback).await, 1);
        assert_eq!(session.count(&SessionCall::Commit).await, 2);
    }

    struct Stalls;

    #[async_trait::async_trait]
    impl Operation<MockSession> for Stalls {
        type Output = ();

        async fn execute(&self, _session: &MockSession) -> Result<(), WishlistError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_run_rolls_back() {
        let runner = runner(MockSession::new());
        let timed_out = tokio::time::timeout(Duration::from_millis(100), runner.run(&Stalls)).await;
        assert!(timed_out.is_err());

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            runner.session().calls().await,
            vec![
                SessionCall::Execute("SELECT 1".into()),
                SessionCall::Begin,
                SessionCall::Rollback,
            ]
        );
        assert_eq!(runner.run(&Noop).await.unwrap(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_health_state() {
        let runner = runner(MockSession::new());
        let clone = runner.clone();
        runner.run(&Noop).await.unwrap();
        clone.run(&Noop).await.unwrap();
        assert_eq!(runner.session().probe_count().await, 1);
    }
}
