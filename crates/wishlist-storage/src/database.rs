// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, migrations, and lifecycle.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. A transaction opened with [`PersistenceSession::begin`] holds the
//! write gate until it is committed or rolled back, so two runner
//! transactions never interleave on the shared connection. A transaction
//! that is dropped without either (its future was cancelled) is rolled back
//! on a background task before the gate is released.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};

use arc_swap::ArcSwap;
use async_trait::async_trait;
use rusqlite::ErrorCode;
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};
use tracing::{debug, info, warn};
use wishlist_config::model::StorageConfig;
use wishlist_core::{PersistenceSession, WishlistError};

use crate::migrations;

/// Connection settings kept for reconnects.
#[derive(Debug, Clone)]
struct OpenOptions {
    path: PathBuf,
    wal_mode: bool,
}

/// An open write transaction and the write gate it holds.
///
/// Dropping it without [`Transaction::release`] rolls back on a spawned task
/// and releases the gate only once the rollback has run.
struct Transaction {
    conn: Arc<tokio_rusqlite::Connection>,
    gate: Option<OwnedMutexGuard<()>>,
}

impl Transaction {
    /// Release the gate; the caller has already ended the transaction.
    fn release(mut self) {
        self.gate.take();
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        let Some(gate) = self.gate.take() else {
            return;
        };
        let conn = Arc::clone(&self.conn);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = conn.call(rollback_if_open).await.map_err(map_tr_err) {
                        warn!(error = %e, "rollback of abandoned transaction failed");
                    } else {
                        debug!("abandoned transaction rolled back");
                    }
                    drop(gate);
                });
            }
            Err(_) => drop(gate),
        }
    }
}

fn rollback_if_open(conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
    if !conn.is_autocommit() {
        conn.execute_batch("ROLLBACK")?;
    }
    Ok(())
}

/// SQLite-backed persistence session.
pub struct Database {
    conn: ArcSwap<tokio_rusqlite::Connection>,
    options: OpenOptions,
    write_gate: Arc<Mutex<()>>,
    open_tx: std::sync::Mutex<Option<Transaction>>,
}

impl Database {
    /// Open (creating if needed) the database at `config.database_path` and
    /// apply pending migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, WishlistError> {
        Self::open_path(&config.database_path, config.wal_mode).await
    }

    pub async fn open_path(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, WishlistError> {
        let options = OpenOptions {
            path: path.as_ref().to_path_buf(),
            wal_mode,
        };
        if let Some(parent) = options.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| WishlistError::ConnectionFailure {
                    message: format!("cannot create {}", parent.display()),
                    source: Some(Box::new(e)),
                })?;
            }
        }

        let conn = connect(&options).await?;
        let db = Self {
            conn: ArcSwap::from_pointee(conn),
            options,
            write_gate: Arc::new(Mutex::new(())),
            open_tx: std::sync::Mutex::new(None),
        };
        db.migrate().await?;
        info!(path = %db.options.path.display(), "database opened");
        Ok(db)
    }

    /// The current connection handle. Replaced by [`PersistenceSession::dispose`].
    pub fn connection(&self) -> Arc<tokio_rusqlite::Connection> {
        self.conn.load_full()
    }

    /// Hold the write gate for a read, so it never observes rows from a
    /// transaction that is still open on the shared connection.
    pub async fn read_lock(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }

    pub fn path(&self) -> &Path {
        &self.options.path
    }

    async fn migrate(&self) -> Result<(), WishlistError> {
        self.connection()
            .call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(message) => WishlistError::Storage {
                    source: format!("migration failed: {message}").into(),
                },
                other => WishlistError::connection(format!("migration aborted: {other}")),
            })
    }

    /// Close the connection, flushing WAL state.
    pub async fn close(self) -> Result<(), WishlistError> {
        let conn = self.connection();
        (*conn).clone().close().await.map_err(|e| WishlistError::Storage {
            source: e.to_string().into(),
        })?;
        info!("database closed");
        Ok(())
    }

    async fn run_sql(&self, sql: &'static str) -> Result<(), WishlistError> {
        self.connection()
            .call(move |conn| conn.execute_batch(sql))
            .await
            .map_err(map_tr_err)
    }

    fn take_transaction(&self) -> Option<Transaction> {
        self.open_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn park_transaction(&self, tx: Transaction) {
        *self.open_tx.lock().unwrap_or_else(PoisonError::into_inner) = Some(tx);
    }
}

async fn connect(options: &OpenOptions) -> Result<tokio_rusqlite::Connection, WishlistError> {
    let conn = tokio_rusqlite::Connection::open(&options.path)
        .await
        .map_err(|e| WishlistError::ConnectionFailure {
            message: format!("cannot open {}: {e}", options.path.display()),
            source: Some(Box::new(e)),
        })?;

    let wal_mode = options.wal_mode;
    conn.call(move |conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
        if wal_mode {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
        }
        Ok(())
    })
    .await
    .map_err(map_tr_err)?;

    debug!(path = %options.path.display(), wal_mode, "connection configured");
    Ok(conn)
}

#[async_trait]
impl PersistenceSession for Database {
    async fn execute(&self, statement: &str) -> Result<(), WishlistError> {
        let statement = statement.to_string();
        self.connection()
            .call(move |conn| conn.execute_batch(&statement))
            .await
            .map_err(map_tr_err)
    }

    async fn begin(&self) -> Result<(), WishlistError> {
        let gate = Arc::clone(&self.write_gate).lock_owned().await;
        let tx = Transaction {
            conn: self.connection(),
            gate: Some(gate),
        };
        if let Err(e) = self.run_sql("BEGIN IMMEDIATE").await {
            tx.release();
            return Err(e);
        }
        self.park_transaction(tx);
        Ok(())
    }

    async fn commit(&self) -> Result<(), WishlistError> {
        let Some(tx) = self.take_transaction() else {
            return Err(WishlistError::Internal(
                "commit without an open transaction".into(),
            ));
        };
        let result = self.run_sql("COMMIT").await;
        match &result {
            Ok(()) => tx.release(),
            // A failed COMMIT leaves the transaction open; rollback releases the gate.
            Err(_) => self.park_transaction(tx),
        }
        result
    }

    async fn rollback(&self) -> Result<(), WishlistError> {
        let Some(tx) = self.take_transaction() else {
            return Ok(());
        };
        let result = tx
            .conn
            .call(rollback_if_open)
            .await
            .map_err(map_tr_err);
        tx.release();
        result
    }

    async fn dispose(&self) -> Result<(), WishlistError> {
        let _gate = self.write_gate.lock().await;
        let fresh = connect(&self.options).await?;
        let stale = self.conn.swap(Arc::new(fresh));
        if let Err(e) = (*stale).clone().close().await {
            warn!(error = %e, "stale connection did not close cleanly");
        }
        info!(path = %self.options.path.display(), "database connection recycled");
        Ok(())
    }
}

/// SQLite result codes that mean the database itself is unreachable.
fn is_connection_code(code: ErrorCode) -> bool {
    matches!(
        code,
        ErrorCode::CannotOpen
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::SystemIoFailure
            | ErrorCode::NotADatabase
    )
}

/// Classify a rusqlite error as retryable connection trouble or a storage fault.
pub fn map_rusqlite_err(e: rusqlite::Error) -> WishlistError {
    let transient = matches!(
        &e,
        rusqlite::Error::SqliteFailure(err, _) if is_connection_code(err.code)
    );
    if transient {
        WishlistError::ConnectionFailure {
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    } else {
        WishlistError::Storage {
            source: Box::new(e),
        }
    }
}

/// Convert a tokio-rusqlite error into a [`WishlistError`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> WishlistError {
    match e {
        tokio_rusqlite::Error::Error(inner) => map_rusqlite_err(inner),
        tokio_rusqlite::Error::ConnectionClosed => {
            WishlistError::connection("database connection closed")
        }
        other => WishlistError::Storage {
            source: Box::new(other),
        },
    }
}
