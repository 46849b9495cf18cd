// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./satchel.toml` > `~/.config/satchel/satchel.toml` > `/etc/satchel/satchel.toml`
//! with environment variable overrides via `SATCHEL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SatchelConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/satchel/satchel.toml` (system-wide)
/// 3. `~/.config/satchel/satchel.toml` (user XDG config)
/// 4. `./satchel.toml` (local directory)
/// 5. `SATCHEL_*` environment variables
pub fn load_config() -> Result<SatchelConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SatchelConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SatchelConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SatchelConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SatchelConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SatchelConfig::default()))
        .merge(Toml::file("/etc/satchel/satchel.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("satchel/satchel.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("satchel.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `SATCHEL_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` so keys containing
/// underscores survive: `SATCHEL_VAULT_KDF_SALT` maps to `vault.kdf_salt`.
fn env_provider() -> Env {
    Env::prefixed("SATCHEL_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Map an env key (prefix already stripped, original case) to a config path.
///
/// Section names contain no underscore, so the first one separates the
/// section from the field.
fn env_key_to_path(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    match key.split_once('_') {
        Some((section, field)) => format!("{section}.{field}"),
        None => key,
    }
}
