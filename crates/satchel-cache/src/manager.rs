// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SDK cache with per-entry opt-in encryption.
//!
//! The [`CacheManager`] methods never fail: errors are logged and turned into
//! `false`, `""` or an empty map. The inherent `try_*` methods return the
//! underlying [`SatchelError`] for callers that must tell a miss from a
//! failure.

use std::collections::BTreeMap;

use async_trait::async_trait;
use satchel_core::{CacheEntry, CacheManager, Protection, SatchelError};
use satchel_storage::models::CacheItemRow;
use satchel_storage::queries::{self, Table, cache_items};
use satchel_storage::{Database, pattern};
use satchel_vault::Cipher;
use tracing::{debug, error};

/// Cache facade over `sdk_cache_items`.
///
/// Each row carries its own `securely_stored` flag, so encrypted and plain
/// entries coexist in one table. Encrypted entries use the cache category,
/// which must differ from the secure store's.
#[derive(Clone)]
pub struct SdkCacheManager {
    db: Database,
    cipher: Cipher,
    category: String,
}

impl SdkCacheManager {
    pub fn new(db: Database, cipher: Cipher, category: impl Into<String>) -> Self {
        Self {
            db,
            cipher,
            category: category.into(),
        }
    }

    pub async fn try_set_item(
        &self,
        key: &str,
        value: &str,
        protection: Protection,
    ) -> Result<(), SatchelError> {
        let entry = match protection {
            Protection::Plain => CacheEntry::Plain(value.to_string()),
            Protection::Encrypted => {
                CacheEntry::Encrypted(self.cipher.encrypt(value, &self.category).await?)
            }
        };
        let (stored, securely_stored) = entry.into_row()?;
        cache_items::upsert(&self.db, key, &stored, securely_stored).await?;
        debug!(key, %protection, "cache item set");
        Ok(())
    }

    /// The decoded row for `key`, without decrypting it.
    pub async fn try_get_entry(&self, key: &str) -> Result<Option<CacheEntry>, SatchelError> {
        match cache_items::get(&self.db, key).await? {
            Some(row) => Ok(Some(CacheEntry::from_row(row.value, row.securely_stored)?)),
            None => Ok(None),
        }
    }

    /// The readable value for `key`, or `None` when absent.
    pub async fn try_get(&self, key: &str) -> Result<Option<String>, SatchelError> {
        match self.try_get_entry(key).await? {
            Some(entry) => Ok(Some(self.reveal(entry).await?)),
            None => Ok(None),
        }
    }

    pub async fn try_get_item(&self, key: &str) -> Result<String, SatchelError> {
        Ok(self.try_get(key).await?.unwrap_or_default())
    }

    /// Plain rows are present whenever they exist; encrypted rows only when
    /// they decrypt to a non-empty value.
    pub async fn try_contains_item(&self, key: &str) -> Result<bool, SatchelError> {
        match self.try_get_entry(key).await? {
            None => Ok(false),
            Some(CacheEntry::Plain(_)) => Ok(true),
            Some(CacheEntry::Encrypted(cipher_text)) => {
                let value = self.cipher.decrypt(&cipher_text, &self.category).await?;
                Ok(!value.is_empty())
            }
        }
    }

    pub async fn try_remove_item(&self, key: &str) -> Result<usize, SatchelError> {
        queries::delete(&self.db, Table::CacheItems, key).await
    }

    pub async fn try_remove_items(&self, keys: &[String]) -> Result<usize, SatchelError> {
        queries::delete_many(&self.db, Table::CacheItems, keys).await
    }

    /// Delete every row whose key matches `pattern`. Returns the number removed.
    pub async fn try_remove_items_based_on_pattern(
        &self,
        pattern: &str,
    ) -> Result<usize, SatchelError> {
        let regex = pattern::compile_pattern(pattern)?;
        let keys = queries::list_keys(&self.db, Table::CacheItems).await?;
        let targets = pattern::keys_matching(keys, &regex);
        let removed = queries::delete_many(&self.db, Table::CacheItems, &targets).await?;
        debug!(pattern, removed, "cache items removed by pattern");
        Ok(removed)
    }

    pub async fn try_clear(&self) -> Result<usize, SatchelError> {
        let removed = queries::clear(&self.db, Table::CacheItems).await?;
        debug!(removed, "cache cleared");
        Ok(removed)
    }

    /// Every entry with encrypted rows decrypted. Any failure fails the whole call.
    pub async fn try_get_all_items(&self) -> Result<BTreeMap<String, String>, SatchelError> {
        let rows = cache_items::list(&self.db).await?;
        let mut items = BTreeMap::new();
        for CacheItemRow {
            key,
            value,
            securely_stored,
        } in rows
        {
            let entry = CacheEntry::from_row(value, securely_stored)?;
            items.insert(key, self.reveal(entry).await?);
        }
        Ok(items)
    }

    async fn reveal(&self, entry: CacheEntry) -> Result<String, SatchelError> {
        match entry {
            CacheEntry::Plain(value) => Ok(value),
            CacheEntry::Encrypted(cipher_text) => {
                self.cipher.decrypt(&cipher_text, &self.category).await
            }
        }
    }
}

#[async_trait]
impl CacheManager for SdkCacheManager {
    async fn set_item(&self, key: &str, value: &str, protection: Protection) -> bool {
        match self.try_set_item(key, value, protection).await {
            Ok(()) => true,
            Err(e) => {
                error!(key, error = %e, "error setting cache item");
                false
            }
        }
    }

    async fn get_item(&self, key: &str) -> String {
        self.try_get_item(key).await.unwrap_or_else(|e| {
            error!(key, error = %e, "error getting cache item");
            String::new()
        })
    }

    async fn remove_item(&self, key: &str) -> bool {
        match self.try_remove_item(key).await {
            Ok(_) => true,
            Err(e) => {
                error!(key, error = %e, "error removing cache item");
                false
            }
        }
    }

    async fn remove_items(&self, keys: &[String]) -> bool {
        match self.try_remove_items(keys).await {
            Ok(_) => true,
            Err(e) => {
                error!(count = keys.len(), error = %e, "error removing cache items");
                false
            }
        }
    }

    async fn contains_item(&self, key: &str) -> bool {
        self.try_contains_item(key).await.unwrap_or_else(|e| {
            error!(key, error = %e, "error checking cache item");
            false
        })
    }

    async fn remove_items_based_on_pattern(&self, pattern: &str) -> bool {
        match self.try_remove_items_based_on_pattern(pattern).await {
            Ok(_) => true,
            Err(e) => {
                error!(pattern, error = %e, "error removing cache items by pattern");
                false
            }
        }
    }

    async fn clear(&self) -> bool {
        match self.try_clear().await {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "error clearing cache");
                false
            }
        }
    }

    async fn get_all_items(&self) -> BTreeMap<String, String> {
        self.try_get_all_items().await.unwrap_or_else(|e| {
            error!(error = %e, "error getting all cache items");
            BTreeMap::new()
        })
    }
}
