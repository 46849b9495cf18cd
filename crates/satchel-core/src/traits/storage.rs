// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store interfaces: plain key-value, secure key-value, and SDK cache.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::SatchelError;
use crate::types::Protection;

/// Durable string map with a synchronous in-memory read path.
///
/// Reads are served from memory and are only meaningful after
/// [`KeyValueStore::initialize`] has completed. Mutations write through to
/// durable storage first and update memory after the write resolves.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Loads every persisted entry into memory. Subsequent calls are no-ops.
    async fn initialize(&self) -> Result<(), SatchelError>;

    fn get_item(&self, key: &str) -> Option<String>;

    fn get_all_keys(&self) -> Vec<String>;

    fn multi_get(&self, keys: &[String]) -> Vec<(String, Option<String>)>;

    fn get_items_based_on_pattern(
        &self,
        pattern: &regex::Regex,
    ) -> BTreeMap<String, Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), SatchelError>;

    async fn remove_item(&self, key: &str) -> Result<(), SatchelError>;

    async fn clear(&self) -> Result<(), SatchelError>;

    async fn multi_set(&self, pairs: &[(String, String)]) -> Result<(), SatchelError>;

    async fn multi_remove(&self, keys: &[String]) -> Result<(), SatchelError>;

    async fn remove_items_based_on_pattern(
        &self,
        pattern: &regex::Regex,
    ) -> Result<(), SatchelError>;
}

/// Key-value store whose values are always encrypted at rest.
///
/// Persistence and key provisioning errors propagate to the caller.
#[async_trait]
pub trait SecureStorage: Send + Sync {
    async fn set_item(&self, key: &str, value: &str) -> Result<bool, SatchelError>;

    /// Returns the decrypted value, or an empty string when the key is absent.
    async fn get_item(&self, key: &str) -> Result<String, SatchelError>;

    async fn remove_item(&self, key: &str) -> Result<bool, SatchelError>;

    async fn remove_items(&self, keys: &[String]) -> Result<bool, SatchelError>;

    /// True only when the entry exists and decrypts to a non-empty value.
    async fn contains_item(&self, key: &str) -> Result<bool, SatchelError>;

    async fn get_all_keys(&self) -> Result<Vec<String>, SatchelError>;

    async fn clear(&self) -> Result<bool, SatchelError>;
}

/// Cache facade with per-entry opt-in encryption.
///
/// Every method logs and absorbs failures, returning `false`, `""`, or an
/// empty map. Implementations expose `try_*` variants for callers that need
/// to tell a miss from a failure.
#[async_trait]
pub trait CacheManager: Send + Sync {
    async fn set_item(&self, key: &str, value: &str, protection: Protection) -> bool;

    async fn get_item(&self, key: &str) -> String;

    async fn remove_item(&self, key: &str) -> bool;

    async fn remove_items(&self, keys: &[String]) -> bool;

    async fn contains_item(&self, key: &str) -> bool;

    async fn remove_items_based_on_pattern(&self, pattern: &str) -> bool;

    async fn clear(&self) -> bool;

    async fn get_all_items(&self) -> BTreeMap<String, String>;
}
