// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the shared wishlist.
//!
//! Provides a [`Database`] that implements `PersistenceSession` over a single
//! tokio-rusqlite connection, embedded refinery migrations, typed queries for
//! users and wishes, and the write commands the resilient runner executes.

pub mod database;
pub mod migrations;
pub mod models;
pub mod operations;
pub mod queries;

pub use database::Database;
pub use models::*;
pub use operations::{AddWish, CreateUser, DeleteUser, DeleteWish, ReleaseWish, ReserveWish};
