// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL migration files are compiled into the binary at build time via
//! `embed_migrations!` and applied on every open. Refinery tracks what has
//! already run in its `refinery_schema_history` table.

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Errors are flattened to text so the result can cross the tokio-rusqlite
/// thread boundary.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), String> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| e.to_string())?;
    for migration in report.applied_migrations() {
        tracing::info!(version = migration.version(), name = migration.name(), "migration applied");
    }
    Ok(())
}
