// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::{MIN_KDF_ITERATIONS, SatchelConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &SatchelConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let required = [
        ("app.id", &config.app.id),
        ("storage.database_path", &config.storage.database_path),
        ("vault.kdf_salt", &config.vault.kdf_salt),
        ("vault.secure_category", &config.vault.secure_category),
        ("vault.cache_category", &config.vault.cache_category),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{name} must not be empty"),
            });
        }
    }

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    // Shared categories would let the two stores read each other's key material.
    if !config.vault.secure_category.trim().is_empty()
        && config.vault.secure_category == config.vault.cache_category
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.secure_category and vault.cache_category must differ, both are `{}`",
                config.vault.secure_category
            ),
        });
    }

    if !matches!(
        config.app.log_level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level must be one of trace, debug, info, warn, error; got `{}`",
                config.app.log_level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&SatchelConfig::default()).is_ok());
    }

    #[test]
    fn low_iteration_count_is_rejected() {
        let mut config = SatchelConfig::default();
        config.vault.kdf_iterations = 1000;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("kdf_iterations"));
    }

    #[test]
    fn shared_categories_are_rejected() {
        let mut config = SatchelConfig::default();
        config.vault.cache_category = config.vault.secure_category.clone();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("must differ")));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = SatchelConfig::default();
        config.app.id = String::new();
        config.vault.kdf_salt = "  ".to_string();
        config.app.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
