// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness assembling the complete Satchel stack.

use std::sync::Arc;

use satchel_cache::{SdkCacheManager, SecureKeyValueStorage};
use satchel_config::SatchelConfig;
use satchel_core::{KeyValueStore, SatchelError, SecretTier};
use satchel_storage::{Database, KeyValueStorage};
use satchel_vault::{Cipher, FallbackTier, MemoryTier, SecretProvider};
use tempfile::TempDir;
use tracing::debug;

/// Builder for test environments.
pub struct TestHarnessBuilder {
    keychain_available: bool,
    initialize_plain: bool,
    config: SatchelConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = SatchelConfig::default();
        config.app.id = "com.satchel.test".to_string();
        Self {
            keychain_available: true,
            initialize_plain: true,
            config,
        }
    }

    /// Start with the in-memory keychain unreachable.
    pub fn with_keychain_unavailable(mut self) -> Self {
        self.keychain_available = false;
        self
    }

    /// Leave the plain store unhydrated after build.
    pub fn without_initialize(mut self) -> Self {
        self.initialize_plain = false;
        self
    }

    pub fn with_categories(mut self, secure: &str, cache: &str) -> Self {
        self.config.vault.secure_category = secure.to_string();
        self.config.vault.cache_category = cache.to_string();
        self
    }

    pub async fn build(self) -> Result<TestHarness, SatchelError> {
        let temp_dir = TempDir::new().map_err(|e| SatchelError::Storage { source: e.into() })?;
        let mut config = self.config;
        config.storage.database_path = temp_dir.path().join("test.db").to_string_lossy().to_string();

        let keychain = Arc::new(if self.keychain_available {
            MemoryTier::new()
        } else {
            MemoryTier::unavailable()
        });
        TestHarness::assemble(config, keychain, temp_dir, self.initialize_plain).await
    }
}

/// A complete store stack over a temporary database.
///
/// The chain is the in-memory keychain followed by the plain store as
/// fallback, matching the production order with the platform keychain
/// swapped out.
pub struct TestHarness {
    pub config: SatchelConfig,
    pub db: Database,
    /// Stand-in for the platform keychain.
    pub keychain: Arc<MemoryTier>,
    pub plain: Arc<KeyValueStorage>,
    pub provider: Arc<SecretProvider>,
    pub cipher: Cipher,
    pub secure: SecureKeyValueStorage,
    pub cache: SdkCacheManager,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    async fn assemble(
        config: SatchelConfig,
        keychain: Arc<MemoryTier>,
        temp_dir: TempDir,
        initialize_plain: bool,
    ) -> Result<Self, SatchelError> {
        let db = Database::open_with_config(&config.storage).await?;
        let plain = Arc::new(KeyValueStorage::new(db.clone()));
        if initialize_plain {
            plain.initialize().await?;
        }

        let tiers: Vec<Arc<dyn SecretTier>> = vec![
            keychain.clone() as Arc<dyn SecretTier>,
            Arc::new(FallbackTier::new(plain.clone() as Arc<dyn KeyValueStore>)),
        ];
        let provider = Arc::new(SecretProvider::new(
            tiers,
            config.vault.kdf_salt.clone(),
            config.vault.kdf_iterations,
        )?);
        let cipher = Cipher::new(provider.clone());
        let secure = SecureKeyValueStorage::new(
            db.clone(),
            cipher.clone(),
            config.vault.secure_category.clone(),
        );
        let cache =
            SdkCacheManager::new(db.clone(), cipher.clone(), config.vault.cache_category.clone());
        debug!(path = %config.storage.database_path, "test harness assembled");

        Ok(Self {
            config,
            db,
            keychain,
            plain,
            provider,
            cipher,
            secure,
            cache,
            _temp_dir: temp_dir,
        })
    }

    /// Close the database and rebuild every store over the same file and keychain.
    ///
    /// Simulates an application restart: memoized keys and the plain-store
    /// mirror are discarded.
    pub async fn restart(self) -> Result<Self, SatchelError> {
        let TestHarness {
            config,
            db,
            keychain,
            plain,
            provider,
            cipher,
            secure,
            cache,
            _temp_dir: temp_dir,
        } = self;
        drop((plain, provider, cipher, secure, cache));
        db.close().await?;
        Self::assemble(config, keychain, temp_dir, true).await
    }
}

#[cfg(test)]
mod tests {
    use satchel_core::{CacheManager, Protection, SecureStorage};

    use super::*;

    #[tokio::test]
    async fn harness_builds_a_working_stack() {
        let h = TestHarness::builder().build().await.unwrap();
        assert!(h.plain.is_initialized());
        assert!(h.secure.set_item("k", "v").await.unwrap());
        assert!(h.cache.set_item("k", "v", Protection::Encrypted).await);
        assert!(h.keychain.contains("GENERAL"));
        assert!(h.keychain.contains("gsSDKCache"));
    }

    #[tokio::test]
    async fn restart_keeps_data_and_drops_memo() {
        let h = TestHarness::builder().build().await.unwrap();
        h.secure.set_item("pin", "0000").await.unwrap();

        let h = h.restart().await.unwrap();
        assert_eq!(h.secure.get_item("pin").await.unwrap(), "0000");
    }
}
