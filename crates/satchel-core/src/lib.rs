// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Satchel storage layer.
//!
//! This crate provides the error type, the persisted value types, and the
//! trait seams shared by every Satchel crate: secret tiers for key
//! provisioning and the three key-value store interfaces.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SatchelError;
pub use types::{CacheEntry, CipherText, Protection};

// Re-export all store traits at crate root.
pub use traits::{CacheManager, KeyValueStore, SecretTier, SecureStorage};
