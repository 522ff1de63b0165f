// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./wishlist.toml` > `~/.config/wishlist/wishlist.toml` > `/etc/wishlist/wishlist.toml`
//! with environment variable overrides via `WISHLIST_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::WishlistConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/wishlist/wishlist.toml` (system-wide)
/// 3. `~/.config/wishlist/wishlist.toml` (user XDG config)
/// 4. `./wishlist.toml` (local directory)
/// 5. `WISHLIST_*` environment variables
pub fn load_config() -> Result<WishlistConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<WishlistConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WishlistConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WishlistConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WishlistConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(WishlistConfig::default()))
        .merge(Toml::file("/etc/wishlist/wishlist.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("wishlist/wishlist.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("wishlist.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `WISHLIST_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("WISHLIST_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("log_", "log.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("scraper_", "scraper.", 1)
            .replacen("resilience_", "resilience.", 1)
            .replacen("matching_", "matching.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn string_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[storage]
database_path = "/tmp/wishes.db"
"#,
        )
        .unwrap();
        assert_eq!(config.storage.database_path, "/tmp/wishes.db");
        assert!(config.storage.wal_mode);
    }

    #[test]
    #[serial]
    fn env_var_maps_to_nested_key() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("wishlist.toml", "[scraper]\ntimeout_secs = 9\n")?;
            jail.set_env("WISHLIST_STORAGE_DATABASE_PATH", "/var/lib/wishlist/test.db");
            jail.set_env("WISHLIST_RESILIENCE_MAX_ATTEMPTS", "7");

            let config = load_config_from_path(Path::new("wishlist.toml"))?;
            assert_eq!(config.scraper.timeout_secs, 9);
            assert_eq!(config.storage.database_path, "/var/lib/wishlist/test.db");
            assert_eq!(config.resilience.max_attempts, 7);
            Ok(())
        });
    }

    #[test]
    #[serial]
    fn local_file_is_picked_up_by_hierarchy() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("wishlist.toml", "[matching]\nsimilarity_threshold = 1\n")?;
            let config = load_config()?;
            assert_eq!(config.matching.similarity_threshold, 1);
            Ok(())
        });
    }
}
