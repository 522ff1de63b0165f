// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handling: the glue between the extractor, the runner, and storage.
//!
//! Writes go through the [`ResilientRunner`]; reads query the database
//! directly under [`Database::read_lock`], so they only see committed rows.

use std::sync::Arc;

use tracing::info;
use wishlist_config::WishlistConfig;
use wishlist_core::{NewWish, PageFetcher, Priority, User, WishRecord, WishlistError};
use wishlist_metadata::{MetadataExtractor, ReqwestFetcher};
use wishlist_resilience::ResilientRunner;
use wishlist_storage::queries::{users, wishes};
use wishlist_storage::{
    AddWish, CreateUser, Database, DeleteUser, DeleteWish, ReleaseWish, ReserveWish,
};

/// Outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created(User),
    /// Similar names exist; the caller must confirm before registering.
    NeedsConfirmation(Vec<User>),
}

/// One user's wishes, for listing.
#[derive(Debug, Clone)]
pub struct UserWishes {
    pub user: User,
    pub wishes: Vec<WishRecord>,
}

pub struct WishService<F = ReqwestFetcher> {
    runner: ResilientRunner<Database>,
    extractor: MetadataExtractor<F>,
    similarity_threshold: usize,
}

impl WishService<ReqwestFetcher> {
    /// Open the configured database and build the production service.
    pub async fn open(config: &WishlistConfig) -> Result<Self, WishlistError> {
        let db = Database::open(&config.storage).await?;
        let runner = ResilientRunner::from_config(Arc::new(db), &config.resilience);
        let extractor = MetadataExtractor::new(&config.scraper)?;
        Ok(Self::new(
            runner,
            extractor,
            config.matching.similarity_threshold,
        ))
    }
}

impl<F: PageFetcher> WishService<F> {
    pub fn new(
        runner: ResilientRunner<Database>,
        extractor: MetadataExtractor<F>,
        similarity_threshold: usize,
    ) -> Self {
        Self {
            runner,
            extractor,
            similarity_threshold,
        }
    }

    pub fn database(&self) -> &Database {
        self.runner.session()
    }

    pub fn runner(&self) -> &ResilientRunner<Database> {
        &self.runner
    }

    async fn committed_user(&self, name: &str) -> Result<User, WishlistError> {
        let _read = self.database().read_lock().await;
        users::require_user_by_name(self.database(), name).await
    }

    /// Register `name`, unless it looks like an existing user and the caller
    /// has not confirmed.
    pub async fn register(&self, name: &str, confirm: bool) -> Result<Registration, WishlistError> {
        let name = name.trim();
        User::validate_name(name)?;
        if !confirm {
            let similar = {
                let _read = self.database().read_lock().await;
                users::find_similar_users(self.database(), name, self.similarity_threshold)
                    .await?
            };
            if similar.iter().any(|u| u.name == name) {
                return Err(WishlistError::Conflict(format!(
                    "a user named '{name}' already exists"
                )));
            }
            if !similar.is_empty() {
                return Ok(Registration::NeedsConfirmation(similar));
            }
        }

        let user = self
            .runner
            .run(&CreateUser {
                name: name.to_string(),
            })
            .await?;
        info!(user_id = user.id, name = %user.name, "user registered");
        Ok(Registration::Created(user))
    }

    /// Add a wish for `owner`, deriving the name and thumbnail from the URL.
    pub async fn add_wish(
        &self,
        owner: &str,
        url: Option<String>,
        name: Option<String>,
        priority: Priority,
    ) -> Result<WishRecord, WishlistError> {
        let owner = self.committed_user(owner).await?;
        let mut wish = NewWish::new(owner.id, url, name).with_priority(priority);
        wish.validate()?;

        self.extractor.populate(&mut wish).await;
        let stored = self.runner.run(&AddWish { wish }).await?;
        info!(
            wish_id = stored.id,
            owner_id = stored.owner_id,
            has_thumbnail = stored.thumbnail_url.is_some(),
            "wish added"
        );
        Ok(stored)
    }

    /// Every user with their wishes, in registration order.
    pub async fn list(&self) -> Result<Vec<UserWishes>, WishlistError> {
        let _read = self.database().read_lock().await;
        let all_users = users::list_users(self.database()).await?;
        let all_wishes = wishes::list_wishes(self.database(), None).await?;

        Ok(all_users
            .into_iter()
            .map(|user| {
                let wishes = all_wishes
                    .iter()
                    .filter(|w| w.owner_id == user.id)
                    .cloned()
                    .collect();
                UserWishes { user, wishes }
            })
            .collect())
    }

    pub async fn reserve(&self, wish_id: i64, as_user: &str) -> Result<WishRecord, WishlistError> {
        let user = self.committed_user(as_user).await?;
        self.runner
            .run(&ReserveWish {
                wish_id,
                user_id: user.id,
            })
            .await
    }

    pub async fn release(&self, wish_id: i64, as_user: &str) -> Result<WishRecord, WishlistError> {
        let user = self.committed_user(as_user).await?;
        self.runner
            .run(&ReleaseWish {
                wish_id,
                user_id: user.id,
            })
            .await
    }

    pub async fn delete_wish(&self, wish_id: i64, as_user: &str) -> Result<(), WishlistError> {
        let user = self.committed_user(as_user).await?;
        self.runner
            .run(&DeleteWish {
                wish_id,
                owner_id: user.id,
            })
            .await?;
        info!(wish_id, "wish deleted");
        Ok(())
    }

    pub async fn delete_user(&self, name: &str) -> Result<User, WishlistError> {
        let user = self
            .runner
            .run(&DeleteUser {
                name: name.to_string(),
            })
            .await?;
        info!(user_id = user.id, "user deleted");
        Ok(user)
    }
}
