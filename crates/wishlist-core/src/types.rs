// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the extractor, the runner, and storage.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::WishlistError;

/// Maximum length of a wish URL or thumbnail URL, in characters.
pub const MAX_URL_LEN: usize = 2000;

/// Maximum length of a wish display name, in characters.
pub const MAX_DISPLAY_NAME_LEN: usize = 200;

/// Maximum length of a user name, in characters.
pub const MAX_USER_NAME_LEN: usize = 80;

/// How much the owner wants a wish.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    MustHave = 1,
    #[default]
    WouldBeNice = 2,
    Maybe = 3,
}

impl Priority {
    /// Numeric value stored in the `priority` column.
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Decode a stored priority; unknown values fall back to the default.
    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => Self::MustHave,
            3 => Self::Maybe,
            _ => Self::WouldBeNice,
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

impl User {
    /// Check a prospective user name before insert.
    pub fn validate_name(name: &str) -> Result<(), WishlistError> {
        if name.trim().is_empty() {
            return Err(WishlistError::Validation(
                "user name must not be empty".to_string(),
            ));
        }
        let len = name.chars().count();
        if len > MAX_USER_NAME_LEN {
            return Err(WishlistError::Validation(format!(
                "user name is {len} characters, at most {MAX_USER_NAME_LEN} allowed"
            )));
        }
        Ok(())
    }
}

/// A stored wish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishRecord {
    pub id: i64,
    pub url: Option<String>,
    pub display_name: Option<String>,
    pub thumbnail_url: Option<String>,
    /// RFC 3339 UTC timestamp assigned at insert.
    pub created_at: String,
    pub owner_id: i64,
    pub priority: Priority,
    /// User who intends to fulfil this wish, if any. Never the owner.
    pub reserved_by: Option<i64>,
}

impl WishRecord {
    pub fn is_reserved(&self) -> bool {
        self.reserved_by.is_some()
    }
}

/// Insert candidate for a wish, built by a request handler and enriched by
/// the metadata extractor before it is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewWish {
    pub owner_id: i64,
    pub url: Option<String>,
    pub display_name: Option<String>,
    pub thumbnail_url: Option<String>,
    pub priority: Priority,
}

impl NewWish {
    pub fn new(owner_id: i64, url: Option<String>, display_name: Option<String>) -> Self {
        Self {
            owner_id,
            url: url.filter(|u| !u.trim().is_empty()),
            display_name: display_name.filter(|n| !n.trim().is_empty()),
            thumbnail_url: None,
            priority: Priority::default(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Enforce column limits. A wish needs at least a URL or a name.
    pub fn validate(&self) -> Result<(), WishlistError> {
        if self.url.is_none() && self.display_name.is_none() {
            return Err(WishlistError::Validation(
                "a wish needs a url or a name".to_string(),
            ));
        }
        check_len("url", self.url.as_deref(), MAX_URL_LEN)?;
        check_len("name", self.display_name.as_deref(), MAX_DISPLAY_NAME_LEN)?;
        check_len("thumbnail_url", self.thumbnail_url.as_deref(), MAX_URL_LEN)?;
        Ok(())
    }
}

fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), WishlistError> {
    if let Some(value) = value {
        let len = value.chars().count();
        if len > max {
            return Err(WishlistError::Validation(format!(
                "{field} is {len} characters, at most {max} allowed"
            )));
        }
    }
    Ok(())
}

/// Truncate to at most `max` characters without splitting a code point.
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

/// Health status reported by persistence health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}
