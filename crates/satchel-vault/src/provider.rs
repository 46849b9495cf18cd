// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-category cipher key resolution over an ordered chain of secret tiers.

use std::sync::Arc;

use dashmap::DashMap;
use satchel_config::SatchelConfig;
use satchel_config::model::MIN_KDF_ITERATIONS;
use satchel_core::{KeyValueStore, SatchelError, SecretTier};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::kdf;
use crate::tier::{FallbackTier, KeyringTier};

/// Resolves the cipher key for a category, creating it on first use.
///
/// Tiers are walked in order. A tier that fails is skipped; the first tier
/// that answers ends the walk, either with its secret or with "nothing
/// stored", in which case a new key is generated and written to every tier
/// consulted so far. Resolved keys are memoized for the provider's lifetime.
pub struct SecretProvider {
    tiers: Vec<Arc<dyn SecretTier>>,
    salt: String,
    iterations: u32,
    memo: DashMap<String, Zeroizing<String>>,
    // Serializes generation so concurrent first calls agree on one key.
    resolving: Mutex<()>,
}

impl SecretProvider {
    pub fn new(
        tiers: Vec<Arc<dyn SecretTier>>,
        salt: impl Into<String>,
        iterations: u32,
    ) -> Result<Self, SatchelError> {
        if iterations < MIN_KDF_ITERATIONS {
            return Err(SatchelError::Config(format!(
                "kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {iterations}"
            )));
        }
        Ok(Self {
            tiers,
            salt: salt.into(),
            iterations,
            memo: DashMap::new(),
            resolving: Mutex::new(()),
        })
    }

    /// Build the standard chain: keychain (when enabled), then `fallback`.
    pub fn from_config(
        config: &SatchelConfig,
        fallback: Arc<dyn KeyValueStore>,
    ) -> Result<Self, SatchelError> {
        let mut tiers: Vec<Arc<dyn SecretTier>> = Vec::new();
        if config.vault.use_keyring {
            tiers.push(Arc::new(KeyringTier::new(config.app.id.clone())));
        }
        tiers.push(Arc::new(FallbackTier::new(fallback)));
        Self::new(tiers, config.vault.kdf_salt.clone(), config.vault.kdf_iterations)
    }

    /// Names of the configured tiers, in lookup order.
    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    /// The cipher key for `category`.
    ///
    /// Every failure is reported as [`SatchelError::KeyProvisioning`].
    pub async fn get_key(&self, category: &str) -> Result<SecretString, SatchelError> {
        if let Some(key) = self.memoized(category) {
            return Ok(key);
        }

        let _guard = self.resolving.lock().await;
        if let Some(key) = self.memoized(category) {
            return Ok(key);
        }

        let key = self.resolve(category).await.map_err(|e| match e {
            SatchelError::KeyProvisioning { .. } => e,
            other => SatchelError::KeyProvisioning {
                category: category.to_string(),
                message: other.to_string(),
            },
        })?;
        self.memo.insert(
            category.to_string(),
            Zeroizing::new(key.expose_secret().to_string()),
        );
        Ok(key)
    }

    fn memoized(&self, category: &str) -> Option<SecretString> {
        self.memo
            .get(category)
            .map(|key| SecretString::from(key.as_str().to_owned()))
    }

    async fn resolve(&self, category: &str) -> Result<SecretString, SatchelError> {
        if self.tiers.is_empty() {
            return Err(SatchelError::KeyProvisioning {
                category: category.to_string(),
                message: "no secret tiers configured".to_string(),
            });
        }

        let mut consulted: Vec<&Arc<dyn SecretTier>> = Vec::new();
        for tier in &self.tiers {
            consulted.push(tier);
            match tier.load(category).await {
                Ok(Some(secret)) if !secret.expose_secret().is_empty() => {
                    debug!(tier = tier.name(), category, "cipher key resolved");
                    return Ok(secret);
                }
                Ok(_) => break,
                Err(e) => {
                    warn!(tier = tier.name(), category, error = %e, "secret tier unavailable, trying next");
                }
            }
        }

        let secret = kdf::generate_cipher_key(&self.salt, self.iterations)?;
        let mut stored = 0usize;
        for tier in consulted {
            match tier.store(category, &secret).await {
                Ok(()) => stored += 1,
                Err(e) => {
                    warn!(tier = tier.name(), category, error = %e, "failed to store generated cipher key");
                }
            }
        }
        if stored == 0 {
            return Err(SatchelError::KeyProvisioning {
                category: category.to_string(),
                message: "no secret tier accepted the generated key".to_string(),
            });
        }
        debug!(category, stored, "cipher key generated");
        Ok(secret)
    }
}
