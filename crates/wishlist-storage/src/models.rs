// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping for storage entities.
//!
//! The canonical types live in `wishlist-core::types`; this module adds the
//! column lists and row decoders the query modules share.

use rusqlite::Row;

pub use wishlist_core::types::{NewWish, Priority, User, WishRecord};

pub(crate) const WISH_COLUMNS: &str =
    "id, url, name, thumbnail_url, created_at, owner_id, priority, reserved_by";

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn wish_from_row(row: &Row<'_>) -> rusqlite::Result<WishRecord> {
    Ok(WishRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        display_name: row.get(2)?,
        thumbnail_url: row.get(3)?,
        created_at: row.get(4)?,
        owner_id: row.get(5)?,
        priority: Priority::from_i64(row.get(6)?),
        reserved_by: row.get(7)?,
    })
}

/// Insert timestamp in the same format the schema default produces.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}
