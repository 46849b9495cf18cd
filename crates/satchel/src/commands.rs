// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `satchel kv|secure|cache` command implementations.

use std::io::Write;
use std::sync::Arc;

use clap::Subcommand;
use satchel_cache::{SdkCacheManager, SecureKeyValueStorage};
use satchel_config::SatchelConfig;
use satchel_core::{KeyValueStore, Protection, SatchelError, SecureStorage};
use satchel_storage::{Database, KeyValueStorage, pattern};
use satchel_vault::{Cipher, SecretProvider};
use tracing::debug;

#[derive(Subcommand, Debug)]
pub enum KvCommand {
    /// Print the value stored under a key.
    Get { key: String },
    /// Store a value.
    Set { key: String, value: String },
    /// Remove one or more keys.
    Remove {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// List keys, optionally only those matching a regex.
    List {
        #[arg(long)]
        pattern: Option<String>,
    },
    /// Remove every key matching a regex.
    RemovePattern { pattern: String },
    /// Remove every entry.
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum SecureCommand {
    /// Decrypt and print the value stored under a key.
    Get { key: String },
    /// Encrypt and store a value.
    Set { key: String, value: String },
    /// Remove one or more keys.
    Remove {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Report whether a key holds a readable, non-empty value.
    Contains { key: String },
    /// List stored keys.
    List,
    /// Remove every entry.
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Print the value stored under a key, decrypting if needed.
    Get { key: String },
    /// Store a value.
    Set {
        key: String,
        value: String,
        /// Encrypt the value at rest.
        #[arg(long)]
        encrypted: bool,
    },
    /// Remove one or more keys.
    Remove {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Report whether a key is present.
    Contains { key: String },
    /// List keys with their protection level.
    List {
        /// Print decrypted values as well.
        #[arg(long)]
        reveal: bool,
    },
    /// Remove every key matching a regex.
    RemovePattern { pattern: String },
    /// Remove every entry.
    Clear,
}

/// A subcommand that runs against an opened [`App`].
#[derive(Debug)]
pub enum StoreCommand {
    Kv(KvCommand),
    Secure(SecureCommand),
    Cache(CacheCommand),
}

/// The full store stack opened from configuration.
pub struct App {
    db: Database,
    plain: Arc<KeyValueStorage>,
    secure: SecureKeyValueStorage,
    cache: SdkCacheManager,
}

fn io_err(e: std::io::Error) -> SatchelError {
    SatchelError::Internal(format!("failed to write output: {e}"))
}

impl App {
    pub async fn open(config: SatchelConfig) -> Result<Self, SatchelError> {
        let db = Database::open_with_config(&config.storage).await?;
        let plain = Arc::new(KeyValueStorage::new(db.clone()));
        plain.initialize().await?;

        let provider = SecretProvider::from_config(&config, plain.clone())?;
        debug!(tiers = ?provider.tier_names(), "secret provider ready");
        let cipher = Cipher::new(Arc::new(provider));

        Ok(Self {
            secure: SecureKeyValueStorage::new(
                db.clone(),
                cipher.clone(),
                config.vault.secure_category,
            ),
            cache: SdkCacheManager::new(db.clone(), cipher, config.vault.cache_category),
            plain,
            db,
        })
    }

    pub async fn close(self) -> Result<(), SatchelError> {
        let App {
            db,
            plain,
            secure,
            cache,
        } = self;
        drop((plain, secure, cache));
        db.close().await
    }

    pub async fn run(&self, command: StoreCommand, out: &mut impl Write) -> Result<(), SatchelError> {
        match command {
            StoreCommand::Kv(action) => self.run_kv(action, out).await,
            StoreCommand::Secure(action) => self.run_secure(action, out).await,
            StoreCommand::Cache(action) => self.run_cache(action, out).await,
        }
    }

    pub async fn run_kv(&self, command: KvCommand, out: &mut impl Write) -> Result<(), SatchelError> {
        match command {
            KvCommand::Get { key } => match self.plain.get_item(&key) {
                Some(value) => writeln!(out, "{value}").map_err(io_err)?,
                None => return Err(not_found(&key)),
            },
            KvCommand::Set { key, value } => self.plain.set_item(&key, &value).await?,
            KvCommand::Remove { keys } => self.plain.multi_remove(&keys).await?,
            KvCommand::List { pattern } => {
                let keys = match pattern {
                    Some(p) => {
                        let regex = pattern::compile_pattern(&p)?;
                        pattern::keys_matching(self.plain.get_all_keys(), &regex)
                    }
                    None => self.plain.get_all_keys(),
                };
                for key in keys {
                    writeln!(out, "{key}").map_err(io_err)?;
                }
            }
            KvCommand::RemovePattern { pattern } => {
                let regex = pattern::compile_pattern(&pattern)?;
                self.plain.remove_items_based_on_pattern(&regex).await?;
            }
            KvCommand::Clear => self.plain.clear().await?,
        }
        Ok(())
    }

    pub async fn run_secure(
        &self,
        command: SecureCommand,
        out: &mut impl Write,
    ) -> Result<(), SatchelError> {
        match command {
            SecureCommand::Get { key } => match self.secure.get(&key).await? {
                Some(value) => writeln!(out, "{value}").map_err(io_err)?,
                None => return Err(not_found(&key)),
            },
            SecureCommand::Set { key, value } => {
                self.secure.set_item(&key, &value).await?;
            }
            SecureCommand::Remove { keys } => {
                self.secure.remove_items(&keys).await?;
            }
            SecureCommand::Contains { key } => {
                let present = self.secure.contains_item(&key).await?;
                writeln!(out, "{present}").map_err(io_err)?;
            }
            SecureCommand::List => {
                for key in self.secure.get_all_keys().await? {
                    writeln!(out, "{key}").map_err(io_err)?;
                }
            }
            SecureCommand::Clear => {
                self.secure.clear().await?;
            }
        }
        Ok(())
    }

    /// Cache commands go through the `try_*` methods so failures reach the exit code.
    pub async fn run_cache(
        &self,
        command: CacheCommand,
        out: &mut impl Write,
    ) -> Result<(), SatchelError> {
        match command {
            CacheCommand::Get { key } => match self.cache.try_get(&key).await? {
                Some(value) => writeln!(out, "{value}").map_err(io_err)?,
                None => return Err(not_found(&key)),
            },
            CacheCommand::Set {
                key,
                value,
                encrypted,
            } => {
                let protection = if encrypted {
                    Protection::Encrypted
                } else {
                    Protection::Plain
                };
                self.cache.try_set_item(&key, &value, protection).await?;
            }
            CacheCommand::Remove { keys } => {
                self.cache.try_remove_items(&keys).await?;
            }
            CacheCommand::Contains { key } => {
                let present = self.cache.try_contains_item(&key).await?;
                writeln!(out, "{present}").map_err(io_err)?;
            }
            CacheCommand::List { reveal } => {
                if reveal {
                    let items = self.cache.try_get_all_items().await?;
                    for (key, value) in items {
                        writeln!(out, "{key}\t{value}").map_err(io_err)?;
                    }
                } else {
                    for key in self.cache_keys().await? {
                        let protection = match self.cache.try_get_entry(&key).await? {
                            Some(entry) => entry.protection(),
                            None => continue,
                        };
                        writeln!(out, "{key}\t{protection}").map_err(io_err)?;
                    }
                }
            }
            CacheCommand::RemovePattern { pattern } => {
                let removed = self.cache.try_remove_items_based_on_pattern(&pattern).await?;
                writeln!(out, "removed {removed}").map_err(io_err)?;
            }
            CacheCommand::Clear => {
                self.cache.try_clear().await?;
            }
        }
        Ok(())
    }

    async fn cache_keys(&self) -> Result<Vec<String>, SatchelError> {
        use satchel_storage::queries::{Table, list_keys};
        list_keys(&self.db, Table::CacheItems).await
    }
}

fn not_found(key: &str) -> SatchelError {
    SatchelError::Internal(format!("no value stored under `{key}`"))
}
