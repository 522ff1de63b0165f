// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: non-empty paths,
//! positive timeouts and attempt counts, a known log level.

use crate::diagnostic::ConfigError;
use crate::model::WishlistConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of failing on the first.
pub fn validate_config(config: &WishlistConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "log.level `{}` is not one of {}",
            config.log.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.scraper.timeout_secs == 0 {
        fail("scraper.timeout_secs must be at least 1".to_string());
    }

    if config.scraper.user_agent.trim().is_empty() {
        fail("scraper.user_agent must not be empty".to_string());
    }

    if config.resilience.max_attempts == 0 {
        fail("resilience.max_attempts must be at least 1".to_string());
    }

    if config.resilience.failure_threshold == 0 {
        fail("resilience.failure_threshold must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &[ConfigError]) -> Vec<String> {
        errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&WishlistConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = WishlistConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("database_path")));
    }

    #[test]
    fn zero_attempts_and_timeout_are_both_reported() {
        let mut config = WishlistConfig::default();
        config.resilience.max_attempts = 0;
        config.scraper.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = WishlistConfig::default();
        config.log.level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors)[0].contains("log.level"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = WishlistConfig::default();
        config.log.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
