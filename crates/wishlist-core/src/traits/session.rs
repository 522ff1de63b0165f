// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence session contract consumed by the resilient runner.

use async_trait::async_trait;

use crate::error::WishlistError;

/// A handle to a persistence backend that can be probed, scoped into a
/// transaction, and torn down.
///
/// Implementations must map an unreachable backend to
/// [`WishlistError::ConnectionFailure`] and every other failure to a
/// non-retryable variant such as [`WishlistError::Storage`].
#[async_trait]
pub trait PersistenceSession: Send + Sync + 'static {
    /// Executes a statement for its side effects (used for health probes).
    async fn execute(&self, statement: &str) -> Result<(), WishlistError>;

    /// Opens a transaction scope.
    async fn begin(&self) -> Result<(), WishlistError>;

    /// Commits the open transaction.
    async fn commit(&self) -> Result<(), WishlistError>;

    /// Rolls back the open transaction.
    async fn rollback(&self) -> Result<(), WishlistError>;

    /// Discards pooled connections and reconnects.
    async fn dispose(&self) -> Result<(), WishlistError>;
}

/// One unit of persistence work, run by the resilient runner inside a
/// transaction scope.
///
/// The runner may call [`Operation::execute`] more than once when the
/// backend drops the connection, so implementations should be idempotent
/// or tolerate a repeated attempt after a rollback.
#[async_trait]
pub trait Operation<S: PersistenceSession + ?Sized>: Send + Sync {
    type Output: Send;

    async fn execute(&self, session: &S) -> Result<Self::Output, WishlistError>;
}
