// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Satchel storage layer.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Satchel configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SatchelConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Key provisioning and encryption settings.
    #[serde(default)]
    pub vault: VaultConfig,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Reverse-DNS application identifier. Keychain service names are
    /// `<id>.<category>`.
    #[serde(default = "default_app_id")]
    pub id: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            id: default_app_id(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_id() -> String {
    "com.satchel.app".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("satchel").join("satchel.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("satchel.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Cipher key provisioning configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Consult the platform keychain before the local fallback store.
    #[serde(default = "default_use_keyring")]
    pub use_keyring: bool,

    /// Fixed PBKDF2 salt used when generating new category keys.
    #[serde(default = "default_kdf_salt")]
    pub kdf_salt: String,

    /// PBKDF2-HMAC-SHA256 iteration count (minimum 5000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Category used by the secure key-value store.
    #[serde(default = "default_secure_category")]
    pub secure_category: String,

    /// Category used by the SDK cache manager for encrypted entries.
    #[serde(default = "default_cache_category")]
    pub cache_category: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            use_keyring: default_use_keyring(),
            kdf_salt: default_kdf_salt(),
            kdf_iterations: default_kdf_iterations(),
            secure_category: default_secure_category(),
            cache_category: default_cache_category(),
        }
    }
}

fn default_use_keyring() -> bool {
    true
}

fn default_kdf_salt() -> String {
    "SATCHEL".to_string()
}

/// Lower bound enforced by validation.
pub const MIN_KDF_ITERATIONS: u32 = 5000;

fn default_kdf_iterations() -> u32 {
    MIN_KDF_ITERATIONS
}

fn default_secure_category() -> String {
    "GENERAL".to_string()
}

fn default_cache_category() -> String {
    "gsSDKCache".to_string()
}
