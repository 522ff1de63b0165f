// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wish CRUD and reservation operations.

use rusqlite::{params, OptionalExtension};
use wishlist_core::WishlistError;

use crate::database::{map_tr_err, Database};
use crate::models::{now_timestamp, wish_from_row, NewWish, WishRecord, WISH_COLUMNS};

/// Insert a validated wish and return the stored record.
pub async fn insert_wish(db: &Database, wish: &NewWish) -> Result<WishRecord, WishlistError> {
    wish.validate()?;
    let wish = wish.clone();
    let created_at = now_timestamp();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO wishes (url, name, thumbnail_url, created_at, owner_id, priority)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    wish.url,
                    wish.display_name,
                    wish.thumbnail_url,
                    created_at,
                    wish.owner_id,
                    wish.priority.as_i64(),
                ],
            )?;
            Ok(WishRecord {
                id: conn.last_insert_rowid(),
                url: wish.url,
                display_name: wish.display_name,
                thumbnail_url: wish.thumbnail_url,
                created_at,
                owner_id: wish.owner_id,
                priority: wish.priority,
                reserved_by: None,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Get a wish by ID.
pub async fn get_wish(db: &Database, id: i64) -> Result<Option<WishRecord>, WishlistError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {WISH_COLUMNS} FROM wishes WHERE id = ?1"),
                params![id],
                wish_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Get a wish by ID, or [`WishlistError::NotFound`].
pub async fn require_wish(db: &Database, id: i64) -> Result<WishRecord, WishlistError> {
    get_wish(db, id).await?.ok_or_else(|| WishlistError::NotFound {
        entity: "wish",
        id: id.to_string(),
    })
}

/// List wishes, optionally for one owner, most wanted first.
pub async fn list_wishes(
    db: &Database,
    owner_id: Option<i64>,
) -> Result<Vec<WishRecord>, WishlistError> {
    db.connection()
        .call(move |conn| {
            let mut wishes = Vec::new();
            match owner_id {
                Some(owner_id) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {WISH_COLUMNS} FROM wishes WHERE owner_id = ?1
                         ORDER BY priority, id"
                    ))?;
                    for row in stmt.query_map(params![owner_id], wish_from_row)? {
                        wishes.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {WISH_COLUMNS} FROM wishes ORDER BY owner_id, priority, id"
                    ))?;
                    for row in stmt.query_map([], wish_from_row)? {
                        wishes.push(row?);
                    }
                }
            }
            Ok(wishes)
        })
        .await
        .map_err(map_tr_err)
}

/// Reserve a wish for `user_id`.
///
/// Owners cannot reserve their own wishes, and a wish has at most one
/// reserver.
pub async fn reserve_wish(
    db: &Database,
    wish_id: i64,
    user_id: i64,
) -> Result<WishRecord, WishlistError> {
    let wish = require_wish(db, wish_id).await?;
    if wish.owner_id == user_id {
        return Err(WishlistError::Validation(
            "you cannot reserve your own wish".to_string(),
        ));
    }
    if let Some(holder) = wish.reserved_by {
        let detail = if holder == user_id {
            "you have already reserved this wish"
        } else {
            "this wish is already reserved"
        };
        return Err(WishlistError::Conflict(detail.to_string()));
    }

    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE wishes SET reserved_by = ?1 WHERE id = ?2 AND reserved_by IS NULL",
                params![user_id, wish_id],
            )
        })
        .await
        .map_err(map_tr_err)?;
    if updated == 0 {
        return Err(WishlistError::Conflict(
            "this wish is already reserved".to_string(),
        ));
    }

    Ok(WishRecord {
        reserved_by: Some(user_id),
        ..wish
    })
}

/// Release a reservation held by `user_id`.
pub async fn release_wish(
    db: &Database,
    wish_id: i64,
    user_id: i64,
) -> Result<WishRecord, WishlistError> {
    let wish = require_wish(db, wish_id).await?;
    if wish.reserved_by != Some(user_id) {
        return Err(WishlistError::Conflict(
            "you do not hold a reservation on this wish".to_string(),
        ));
    }

    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE wishes SET reserved_by = NULL WHERE id = ?1",
                params![wish_id],
            )
        })
        .await
        .map_err(map_tr_err)?;

    Ok(WishRecord {
        reserved_by: None,
        ..wish
    })
}

/// Delete a wish. Only its owner may do so.
pub async fn delete_wish(db: &Database, wish_id: i64, owner_id: i64) -> Result<(), WishlistError> {
    let wish = require_wish(db, wish_id).await?;
    if wish.owner_id != owner_id {
        return Err(WishlistError::Validation(
            "only the owner can delete a wish".to_string(),
        ));
    }
    db.connection()
        .call(move |conn| conn.execute("DELETE FROM wishes WHERE id = ?1", params![wish_id]))
        .await
        .map_err(map_tr_err)?;
    Ok(())
}
