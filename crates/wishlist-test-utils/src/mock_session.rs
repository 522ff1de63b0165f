// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted persistence session for deterministic runner tests.
//!
//! `MockSession` implements `PersistenceSession` without a backend. Probe
//! and commit failures are queued up front; every call is recorded so tests
//! can assert on the exact sequence the runner produced.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use wishlist_core::{PersistenceSession, WishlistError};

/// One recorded call against a [`MockSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    Execute(String),
    Begin,
    Commit,
    Rollback,
    Dispose,
}

#[derive(Debug, Default)]
struct Script {
    failing_probes: usize,
    failing_commits: usize,
    calls: Vec<SessionCall>,
}

/// A persistence session whose failures are scripted in advance.
///
/// Probe failures (from `execute`) and commit failures are reported as
/// `ConnectionFailure`, the way a dropped backend would surface them.
#[derive(Debug, Clone, Default)]
pub struct MockSession {
    script: Arc<Mutex<Script>>,
}

impl MockSession {
    /// A session where every call succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose first `count` `execute` calls fail.
    pub fn with_failing_probes(count: usize) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                failing_probes: count,
                ..Script::default()
            })),
        }
    }

    /// Queue `count` more commit failures.
    pub async fn fail_next_commits(&self, count: usize) {
        self.script.lock().await.failing_commits += count;
    }

    /// Every call made so far, in order.
    pub async fn calls(&self) -> Vec<SessionCall> {
        self.script.lock().await.calls.clone()
    }

    /// How many recorded calls equal `call`.
    pub async fn count(&self, call: &SessionCall) -> usize {
        self.script
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| *c == call)
            .count()
    }

    /// Number of `execute` calls, whatever the statement.
    pub async fn probe_count(&self) -> usize {
        self.script
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| matches!(c, SessionCall::Execute(_)))
            .count()
    }
}

#[async_trait]
impl PersistenceSession for MockSession {
    async fn execute(&self, statement: &str) -> Result<(), WishlistError> {
        let mut script = self.script.lock().await;
        script.calls.push(SessionCall::Execute(statement.to_string()));
        if script.failing_probes > 0 {
            script.failing_probes -= 1;
            return Err(WishlistError::connection("scripted probe failure"));
        }
        Ok(())
    }

    async fn begin(&self) -> Result<(), WishlistError> {
        self.script.lock().await.calls.push(SessionCall::Begin);
        Ok(())
    }

    async fn commit(&self) -> Result<(), WishlistError> {
        let mut script = self.script.lock().await;
        script.calls.push(SessionCall::Commit);
        if script.failing_commits > 0 {
            script.failing_commits -= 1;
            return Err(WishlistError::connection("scripted commit failure"));
        }
        Ok(())
    }

    async fn rollback(&self) -> Result<(), WishlistError> {
        self.script.lock().await.calls.push(SessionCall::Rollback);
        Ok(())
    }

    async fn dispose(&self) -> Result<(), WishlistError> {
        self.script.lock().await.calls.push(SessionCall::Dispose);
        Ok(())
    }
}
