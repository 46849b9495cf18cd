// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the Satchel crates.
//!
//! Async methods use `#[async_trait]` so implementations can be used behind
//! `Arc<dyn Trait>`.

pub mod secret;
pub mod storage;

pub use secret::SecretTier;
pub use storage::{CacheManager, KeyValueStore, SecureStorage};
