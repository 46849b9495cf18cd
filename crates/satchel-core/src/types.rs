// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value types shared by the stores and the cipher.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::SatchelError;

/// Output of one encryption call: base64 ciphertext plus the hex IV used for it.
///
/// Persisted as the JSON object `{"value": "...", "iv": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherText {
    /// Base64-encoded ciphertext.
    pub value: String,
    /// Hex-encoded 16-byte initialization vector.
    pub iv: String,
}

impl CipherText {
    /// Serialize into the JSON envelope stored in the database.
    pub fn to_json(&self) -> Result<String, SatchelError> {
        serde_json::to_string(self)
            .map_err(|e| SatchelError::Codec(format!("failed to serialize ciphertext: {e}")))
    }

    /// Parse the JSON envelope stored in the database.
    pub fn from_json(raw: &str) -> Result<Self, SatchelError> {
        serde_json::from_str(raw)
            .map_err(|e| SatchelError::Codec(format!("malformed ciphertext envelope: {e}")))
    }
}

/// Whether a cache entry is written as plaintext or encrypted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum Protection {
    #[default]
    Plain,
    Encrypted,
}

impl Protection {
    /// Maps the persisted `securely_stored` column to a protection level.
    pub fn from_flag(securely_stored: bool) -> Self {
        if securely_stored {
            Protection::Encrypted
        } else {
            Protection::Plain
        }
    }

    /// Value of the persisted `securely_stored` column.
    pub fn is_encrypted(self) -> bool {
        matches!(self, Protection::Encrypted)
    }
}

/// A decoded SDK cache row.
///
/// The persisted `securely_stored` flag decides which variant a row decodes
/// into, so readers cannot treat ciphertext as plaintext by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    Plain(String),
    Encrypted(CipherText),
}

impl CacheEntry {
    /// Decode a row from its stored `value` and `securely_stored` columns.
    pub fn from_row(value: String, securely_stored: bool) -> Result<Self, SatchelError> {
        match Protection::from_flag(securely_stored) {
            Protection::Plain => Ok(CacheEntry::Plain(value)),
            Protection::Encrypted => Ok(CacheEntry::Encrypted(CipherText::from_json(&value)?)),
        }
    }

    /// Encode back into `(value, securely_stored)` columns.
    pub fn into_row(self) -> Result<(String, bool), SatchelError> {
        match self {
            CacheEntry::Plain(value) => Ok((value, false)),
            CacheEntry::Encrypted(cipher_text) => Ok((cipher_text.to_json()?, true)),
        }
    }

    pub fn protection(&self) -> Protection {
        match self {
            CacheEntry::Plain(_) => Protection::Plain,
            CacheEntry::Encrypted(_) => Protection::Encrypted,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn cipher_text_json_shape_matches_stored_format() {
        let ct = CipherText {
            value: "q83v".to_string(),
            iv: "00ff".to_string(),
        };
        let json = ct.to_json().unwrap();
        assert_eq!(json, r#"{"value":"q83v","iv":"00ff"}"#);
        assert_eq!(CipherText::from_json(&json).unwrap(), ct);
    }

    #[test]
    fn malformed_envelope_is_codec_error() {
        let err = CipherText::from_json("not json").unwrap_err();
        assert!(matches!(err, SatchelError::Codec(_)));
    }

    #[test]
    fn plain_row_never_parses_as_ciphertext() {
        let entry = CacheEntry::from_row(r#"{"value":"a","iv":"b"}"#.to_string(), false).unwrap();
        assert_eq!(entry.protection(), Protection::Plain);
    }

    #[test]
    fn encrypted_row_requires_valid_envelope() {
        let result = CacheEntry::from_row("raw text".to_string(), true);
        assert!(result.is_err());
    }

    #[test]
    fn encrypted_row_keeps_flag_on_encode() {
        let entry = CacheEntry::Encrypted(CipherText {
            value: "v".into(),
            iv: "i".into(),
        });
        let (_, flag) = entry.into_row().unwrap();
        assert!(flag);
    }

    #[test]
    fn protection_parses_from_cli_strings() {
        assert_eq!(Protection::from_str("encrypted").unwrap(), Protection::Encrypted);
        assert_eq!(Protection::from_str("plain").unwrap(), Protection::Plain);
        assert_eq!(Protection::default(), Protection::Plain);
        assert_eq!(Protection::Encrypted.to_string(), "encrypted");
    }
}
