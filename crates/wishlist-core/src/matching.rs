// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fuzzy user-name matching.
//!
//! Surfaces existing users whose names are within a small edit distance of a
//! candidate name so a typo ("Alise") can be confirmed against an existing
//! account ("Alice") before a second identity is created.
//!
//! This is a linear scan over every user. It is fine for the handful of
//! people sharing a wishlist; a large user base needs an indexed
//! approximate-match structure with the same threshold, case folding, and
//! ordering.

use crate::types::User;

/// Default maximum Levenshtein distance for two names to count as similar.
pub const DEFAULT_SIMILARITY_THRESHOLD: usize = 2;

/// Return every user whose lower-cased name is within `threshold` edits of
/// the lower-cased `candidate`, in the order they appear in `users`.
pub fn find_similar<'a>(candidate: &str, users: &'a [User], threshold: usize) -> Vec<&'a User> {
    let candidate = candidate.to_lowercase();
    users
        .iter()
        .filter(|user| strsim::levenshtein(&candidate, &user.name.to_lowercase()) <= threshold)
        .collect()
}
