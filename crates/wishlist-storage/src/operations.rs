// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Write commands run through the resilient runner.
//!
//! Each command is plain data plus an [`Operation`] impl, so the runner can
//! replay it after a rollback without the caller rebuilding anything.

use async_trait::async_trait;
use wishlist_core::{NewWish, Operation, User, WishRecord, WishlistError};

use crate::database::Database;
use crate::queries::{users, wishes};

/// Register a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
}

#[async_trait]
impl Operation<Database> for CreateUser {
    type Output = User;

    async fn execute(&self, db: &Database) -> Result<User, WishlistError> {
        users::create_user(db, &self.name).await
    }
}

/// Store a wish whose derived fields have already been populated.
#[derive(Debug, Clone)]
pub struct AddWish {
    pub wish: NewWish,
}

#[async_trait]
impl Operation<Database> for AddWish {
    type Output = WishRecord;

    async fn execute(&self, db: &Database) -> Result<WishRecord, WishlistError> {
        wishes::insert_wish(db, &self.wish).await
    }
}

#[derive(Debug, Clone)]
pub struct ReserveWish {
    pub wish_id: i64,
    pub user_id: i64,
}

#[async_trait]
impl Operation<Database> for ReserveWish {
    type Output = WishRecord;

    async fn execute(&self, db: &Database) -> Result<WishRecord, WishlistError> {
        wishes::reserve_wish(db, self.wish_id, self.user_id).await
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseWish {
    pub wish_id: i64,
    pub user_id: i64,
}

#[async_trait]
impl Operation<Database> for ReleaseWish {
    type Output = WishRecord;

    async fn execute(&self, db: &Database) -> Result<WishRecord, WishlistError> {
        wishes::release_wish(db, self.wish_id, self.user_id).await
    }
}

#[derive(Debug, Clone)]
pub struct DeleteWish {
    pub wish_id: i64,
    pub owner_id: i64,
}

#[async_trait]
impl Operation<Database> for DeleteWish {
    type Output = ();

    async fn execute(&self, db: &Database) -> Result<(), WishlistError> {
        wishes::delete_wish(db, self.wish_id, self.owner_id).await
    }
}

/// Delete a user by name, cascading to their wishes.
#[derive(Debug, Clone)]
pub struct DeleteUser {
    pub name: String,
}

#[async_trait]
impl Operation<Database> for DeleteUser {
    type Output = User;

    async fn execute(&self, db: &Database) -> Result<User, WishlistError> {
        let user = users::require_user_by_name(db, &self.name).await?;
        users::delete_user(db, user.id).await?;
        Ok(user)
    }
}
