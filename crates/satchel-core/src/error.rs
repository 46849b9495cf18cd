// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Satchel storage layer.

use thiserror::Error;

/// The primary error type used across all Satchel stores and traits.
#[derive(Debug, Error)]
pub enum SatchelError {
    /// Configuration errors (invalid TOML, failed validation).
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable storage errors (connection, query, transaction, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A secret tier (keychain, fallback store) could not be reached or refused a write.
    #[error("secret store `{tier}` unavailable: {message}")]
    SecretStore { tier: String, message: String },

    /// No encryption key could be resolved or created for a category.
    #[error("failed to get encryption key for category `{category}`: {message}")]
    KeyProvisioning { category: String, message: String },

    /// Cipher setup, encoding, or decoding failure.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// A persisted ciphertext envelope could not be parsed or produced.
    #[error("codec error: {0}")]
    Codec(String),

    /// A key pattern is not a valid regular expression.
    #[error("invalid key pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
