// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for the key-value tables.

/// A row of `key_values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueEntry {
    pub key: String,
    pub value: Option<String>,
}

/// A row of `secure_key_values`. `value` is a serialized ciphertext envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureKeyValueEntry {
    pub key: String,
    pub value: String,
}

/// A row of `sdk_cache_items`.
///
/// Decode with [`satchel_core::CacheEntry::from_row`] rather than reading
/// `value` directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheItemRow {
    pub key: String,
    pub value: String,
    pub securely_stored: bool,
}
