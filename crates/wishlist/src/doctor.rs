// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wishlist doctor` command implementation.
//!
//! Runs quick diagnostic checks against the configured database and the
//! scraper settings.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use colored::Colorize;
use wishlist_config::WishlistConfig;
use wishlist_core::HealthStatus;
use wishlist_metadata::MetadataExtractor;
use wishlist_resilience::HealthTracker;
use wishlist_storage::Database;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Run every check and print a report. Returns `true` when nothing failed.
pub async fn run_doctor(config: &WishlistConfig, plain: bool) -> bool {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = vec![
        check_database(config).await,
        check_scraper(config),
    ];

    println!();
    println!("  wishlist doctor");
    println!("  {}", "-".repeat(50));

    for result in &results {
        let symbol = match (&result.status, use_color) {
            (CheckStatus::Pass, true) => "✓".green().to_string(),
            (CheckStatus::Warn, true) => "!".yellow().to_string(),
            (CheckStatus::Fail, true) => "✗".red().to_string(),
            (CheckStatus::Pass, false) => "ok".to_string(),
            (CheckStatus::Warn, false) => "warn".to_string(),
            (CheckStatus::Fail, false) => "FAIL".to_string(),
        };
        println!(
            "  {symbol} {:<12} {} ({}ms)",
            result.name,
            result.message,
            result.duration.as_millis()
        );
    }
    println!();

    !results.iter().any(|r| r.status == CheckStatus::Fail)
}

pub async fn check_database(config: &WishlistConfig) -> CheckResult {
    let start = Instant::now();
    let path = &config.storage.database_path;

    // Opening would create the file; a missing database is only reported.
    let (status, message) = if !std::path::Path::new(path).exists() {
        (CheckStatus::Warn, format!("no database yet: {path}"))
    } else {
        match Database::open(&config.storage).await {
            Ok(db) => match HealthTracker::from_config(&config.resilience).check(&db).await {
                HealthStatus::Healthy => (CheckStatus::Pass, format!("connected: {path}")),
                HealthStatus::Unhealthy(reason) => {
                    (CheckStatus::Fail, format!("unhealthy: {reason}"))
                }
            },
            Err(e) => (CheckStatus::Fail, format!("open failed: {e}")),
        }
    };

    CheckResult {
        name: "Database".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

pub fn check_scraper(config: &WishlistConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match MetadataExtractor::new(&config.scraper) {
        Ok(_) => (
            CheckStatus::Pass,
            format!("timeout {}s", config.scraper.timeout_secs),
        ),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    };
    CheckResult {
        name: "Scraper".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}
