// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain key-value store backed by `key_values` with an in-memory mirror.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use regex::Regex;
use satchel_core::{KeyValueStore, SatchelError};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::database::Database;
use crate::pattern;
use crate::queries::{self, Table, key_values};

/// Durable string map whose reads never touch the database.
///
/// Call [`KeyValueStore::initialize`] once before reading; until then the
/// mirror is empty. Writes go to SQLite first and reach the mirror only after
/// the write commits, so a failed write leaves the mirror untouched.
pub struct KeyValueStorage {
    db: Database,
    cache: DashMap<String, Option<String>>,
    loaded: OnceCell<()>,
}

impl KeyValueStorage {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            cache: DashMap::new(),
            loaded: OnceCell::new(),
        }
    }

    /// Whether the mirror has been hydrated.
    pub fn is_initialized(&self) -> bool {
        self.loaded.initialized()
    }

    fn mirrored(&self) -> impl Iterator<Item = (String, Option<String>)> + '_ {
        self.cache
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
    }
}

#[async_trait]
impl KeyValueStore for KeyValueStorage {
    async fn initialize(&self) -> Result<(), SatchelError> {
        self.loaded
            .get_or_try_init(|| async {
                let entries = key_values::list(&self.db).await?;
                let count = entries.len();
                for entry in entries {
                    self.cache.insert(entry.key, entry.value);
                }
                debug!(count, "key-value mirror loaded");
                Ok::<(), SatchelError>(())
            })
            .await?;
        Ok(())
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.cache.get(key).and_then(|entry| entry.value().clone())
    }

    fn get_all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.cache.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    fn multi_get(&self, keys: &[String]) -> Vec<(String, Option<String>)> {
        keys.iter()
            .map(|key| (key.clone(), self.get_item(key)))
            .collect()
    }

    fn get_items_based_on_pattern(&self, pattern: &Regex) -> BTreeMap<String, Option<String>> {
        pattern::filter_by_pattern(self.mirrored(), pattern)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), SatchelError> {
        key_values::upsert(&self.db, key, Some(value)).await?;
        self.cache.insert(key.to_string(), Some(value.to_string()));
        debug!(key, "key-value set");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), SatchelError> {
        queries::delete(&self.db, Table::KeyValues, key).await?;
        self.cache.remove(key);
        debug!(key, "key-value removed");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SatchelError> {
        let removed = queries::clear(&self.db, Table::KeyValues).await?;
        self.cache.clear();
        debug!(removed, "key-value store cleared");
        Ok(())
    }

    async fn multi_set(&self, pairs: &[(String, String)]) -> Result<(), SatchelError> {
        key_values::upsert_many(&self.db, pairs).await?;
        for (key, value) in pairs {
            self.cache.insert(key.clone(), Some(value.clone()));
        }
        debug!(count = pairs.len(), "key-value multi set");
        Ok(())
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<(), SatchelError> {
        let removed = queries::delete_many(&self.db, Table::KeyValues, keys).await?;
        for key in keys {
            self.cache.remove(key);
        }
        debug!(removed, "key-value multi remove");
        Ok(())
    }

    async fn remove_items_based_on_pattern(&self, pattern: &Regex) -> Result<(), SatchelError> {
        let keys = pattern::keys_matching(self.cache.iter().map(|e| e.key().clone()), pattern);
        self.multi_remove(&keys).await
    }
}
