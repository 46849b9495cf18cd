// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret tiers: platform keychain, plain-store fallback, and in-process memory.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use satchel_core::{KeyValueStore, SatchelError, SecretTier};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

/// Platform credential store via the `keyring` crate.
///
/// Each category is stored under the service `"<app_id>.<category>"`, with the
/// account set to the same string. Calls run on the blocking pool because the
/// platform APIs are synchronous.
#[derive(Debug, Clone)]
pub struct KeyringTier {
    app_id: String,
}

impl KeyringTier {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
        }
    }

    /// Service identifier for `category`.
    pub fn service(&self, category: &str) -> String {
        format!("{}.{category}", self.app_id)
    }
}

fn keyring_err(e: impl std::fmt::Display) -> SatchelError {
    SatchelError::SecretStore {
        tier: "keyring".to_string(),
        message: e.to_string(),
    }
}

#[async_trait]
impl SecretTier for KeyringTier {
    fn name(&self) -> &str {
        "keyring"
    }

    async fn load(&self, category: &str) -> Result<Option<SecretString>, SatchelError> {
        let service = self.service(category);
        tokio::task::spawn_blocking(move || {
            let entry = keyring::Entry::new(&service, &service).map_err(keyring_err)?;
            match entry.get_password() {
                Ok(secret) => Ok(Some(SecretString::from(secret))),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(keyring_err(e)),
            }
        })
        .await
        .map_err(keyring_err)?
    }

    async fn store(&self, category: &str, secret: &SecretString) -> Result<(), SatchelError> {
        let service = self.service(category);
        let secret = Zeroizing::new(secret.expose_secret().to_string());
        tokio::task::spawn_blocking(move || {
            let entry = keyring::Entry::new(&service, &service).map_err(keyring_err)?;
            entry.set_password(&secret).map_err(keyring_err)
        })
        .await
        .map_err(keyring_err)?
    }
}

/// Plain key-value store used when the keychain is unreachable.
///
/// The secret is stored unencrypted under the category name itself. The store
/// is initialized on first use so a fresh process can find keys written by
/// an earlier run.
pub struct FallbackTier {
    store: Arc<dyn KeyValueStore>,
}

impl FallbackTier {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SecretTier for FallbackTier {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn load(&self, category: &str) -> Result<Option<SecretString>, SatchelError> {
        self.store.initialize().await?;
        Ok(self.store.get_item(category).map(SecretString::from))
    }

    async fn store(&self, category: &str, secret: &SecretString) -> Result<(), SatchelError> {
        self.store.initialize().await?;
        self.store.set_item(category, secret.expose_secret()).await
    }
}

/// In-process tier for tests and hosts without a keychain.
///
/// Marking it unavailable makes every call fail the way an unreachable
/// keychain does.
#[derive(Default)]
pub struct MemoryTier {
    secrets: DashMap<String, Zeroizing<String>>,
    unavailable: AtomicBool,
}

impl MemoryTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tier that starts out unreachable.
    pub fn unavailable() -> Self {
        let tier = Self::default();
        tier.set_available(false);
        tier
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn contains(&self, category: &str) -> bool {
        self.secrets.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    fn check(&self) -> Result<(), SatchelError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SatchelError::SecretStore {
                tier: "memory".to_string(),
                message: "tier marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SecretTier for MemoryTier {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, category: &str) -> Result<Option<SecretString>, SatchelError> {
        self.check()?;
        Ok(self
            .secrets
            .get(category)
            .map(|s| SecretString::from(s.as_str().to_owned())))
    }

    async fn store(&self, category: &str, secret: &SecretString) -> Result<(), SatchelError> {
        self.check()?;
        self.secrets.insert(
            category.to_string(),
            Zeroizing::new(secret.expose_secret().to_string()),
        );
        Ok(())
    }
}
