// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store whose values are always encrypted at rest.

use async_trait::async_trait;
use satchel_core::{SatchelError, SecureStorage};
use satchel_storage::Database;
use satchel_storage::queries::{self, Table, secure_key_values};
use satchel_vault::Cipher;
use tracing::debug;

/// Encrypted key-value store over `secure_key_values`.
///
/// All values are sealed under a single category. Errors from the database
/// and the cipher propagate to the caller.
#[derive(Clone)]
pub struct SecureKeyValueStorage {
    db: Database,
    cipher: Cipher,
    category: String,
}

impl SecureKeyValueStorage {
    pub fn new(db: Database, cipher: Cipher, category: impl Into<String>) -> Self {
        Self {
            db,
            cipher,
            category: category.into(),
        }
    }

    /// Decrypted value for `key`, or `None` when nothing is stored.
    ///
    /// Unlike [`SecureStorage::get_item`] this tells an absent key apart from
    /// a stored empty string.
    pub async fn get(&self, key: &str) -> Result<Option<String>, SatchelError> {
        match secure_key_values::get(&self.db, key).await? {
            Some(row) => Ok(Some(self.cipher.open(&row.value, &self.category).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SecureStorage for SecureKeyValueStorage {
    async fn set_item(&self, key: &str, value: &str) -> Result<bool, SatchelError> {
        let envelope = self.cipher.seal(value, &self.category).await?;
        secure_key_values::upsert(&self.db, key, &envelope).await?;
        debug!(key, "secure item set");
        Ok(true)
    }

    async fn get_item(&self, key: &str) -> Result<String, SatchelError> {
        Ok(self.get(key).await?.unwrap_or_default())
    }

    async fn remove_item(&self, key: &str) -> Result<bool, SatchelError> {
        queries::delete(&self.db, Table::SecureKeyValues, key).await?;
        Ok(true)
    }

    async fn remove_items(&self, keys: &[String]) -> Result<bool, SatchelError> {
        let removed = queries::delete_many(&self.db, Table::SecureKeyValues, keys).await?;
        debug!(removed, "secure items removed");
        Ok(true)
    }

    async fn contains_item(&self, key: &str) -> Result<bool, SatchelError> {
        let Some(row) = secure_key_values::get(&self.db, key).await? else {
            return Ok(false);
        };
        match self.cipher.open(&row.value, &self.category).await {
            Ok(value) => Ok(!value.is_empty()),
            Err(e) => {
                debug!(key, error = %e, "secure item present but unreadable");
                Ok(false)
            }
        }
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, SatchelError> {
        queries::list_keys(&self.db, Table::SecureKeyValues).await
    }

    async fn clear(&self) -> Result<bool, SatchelError> {
        let removed = queries::clear(&self.db, Table::SecureKeyValues).await?;
        debug!(removed, "secure store cleared");
        Ok(true)
    }
}
