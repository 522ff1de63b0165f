// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User CRUD operations.

use rusqlite::{params, OptionalExtension};
use wishlist_core::{find_similar, WishlistError};

use crate::database::{map_tr_err, Database};
use crate::models::{user_from_row, User};

/// Insert a user and return it with its assigned id.
///
/// A duplicate name is a [`WishlistError::Conflict`].
pub async fn create_user(db: &Database, name: &str) -> Result<User, WishlistError> {
    User::validate_name(name)?;
    if get_user_by_name(db, name).await?.is_some() {
        return Err(WishlistError::Conflict(format!(
            "a user named '{name}' already exists"
        )));
    }

    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("INSERT INTO users (name) VALUES (?1)", params![name])?;
            Ok(User {
                id: conn.last_insert_rowid(),
                name,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Get a user by ID.
pub async fn get_user(db: &Database, id: i64) -> Result<Option<User>, WishlistError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, name FROM users WHERE id = ?1",
                params![id],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Get a user by exact (case-sensitive) name.
pub async fn get_user_by_name(db: &Database, name: &str) -> Result<Option<User>, WishlistError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, name FROM users WHERE name = ?1",
                params![name],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Get a user by name, or [`WishlistError::NotFound`].
pub async fn require_user_by_name(db: &Database, name: &str) -> Result<User, WishlistError> {
    get_user_by_name(db, name)
        .await?
        .ok_or_else(|| WishlistError::NotFound {
            entity: "user",
            id: name.to_string(),
        })
}

/// All users in registration order.
pub async fn list_users(db: &Database) -> Result<Vec<User>, WishlistError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY id")?;
            let rows = stmt.query_map([], user_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Registered users whose names are within `threshold` edits of `name`.
pub async fn find_similar_users(
    db: &Database,
    name: &str,
    threshold: usize,
) -> Result<Vec<User>, WishlistError> {
    let users = list_users(db).await?;
    Ok(find_similar(name, &users, threshold)
        .into_iter()
        .cloned()
        .collect())
}

/// Delete a user. Their wishes go with them; reservations they held are released.
pub async fn delete_user(db: &Database, id: i64) -> Result<(), WishlistError> {
    let deleted = db
        .connection()
        .call(move |conn| conn.execute("DELETE FROM users WHERE id = ?1", params![id]))
        .await
        .map_err(map_tr_err)?;
    if deleted == 0 {
        return Err(WishlistError::NotFound {
            entity: "user",
            id: id.to_string(),
        });
    }
    Ok(())
}
