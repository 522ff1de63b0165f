// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared wishlist application layer: request handling and diagnostics.

pub mod doctor;
pub mod service;

pub use service::{Registration, UserWishes, WishService};
