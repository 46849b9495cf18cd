// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Satchel.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, typed queries for the three
//! key-value tables, regex key filtering, and [`KeyValueStorage`], the plain
//! store with a synchronous in-memory read path.

pub mod database;
pub mod kv;
pub mod migrations;
pub mod models;
pub mod pattern;
pub mod queries;

pub use database::Database;
pub use kv::KeyValueStorage;
pub use models::*;
pub use satchel_core::KeyValueStore;
