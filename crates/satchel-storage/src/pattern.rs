// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regex-based key selection shared by the plain store and the cache manager.
//!
//! Matching is an unanchored search: `a` matches `"banana"`. Anchor the
//! expression (`^a`) to match by prefix.

use std::collections::BTreeMap;

use regex::Regex;
use satchel_core::SatchelError;

/// Compile a user-supplied pattern.
pub fn compile_pattern(pattern: &str) -> Result<Regex, SatchelError> {
    Regex::new(pattern).map_err(|e| SatchelError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Keep the entries whose key matches `pattern`.
pub fn filter_by_pattern<K, V, I>(entries: I, pattern: &Regex) -> BTreeMap<String, V>
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, V)>,
{
    entries
        .into_iter()
        .filter(|(key, _)| pattern.is_match(key.as_ref()))
        .map(|(key, value)| (key.as_ref().to_string(), value))
        .collect()
}

/// The keys matching `pattern`, sorted and deduplicated.
pub fn keys_matching<K, I>(keys: I, pattern: &Regex) -> Vec<String>
where
    K: AsRef<str>,
    I: IntoIterator<Item = K>,
{
    let mut matched: Vec<String> = keys
        .into_iter()
        .filter(|key| pattern.is_match(key.as_ref()))
        .map(|key| key.as_ref().to_string())
        .collect();
    matched.sort();
    matched.dedup();
    matched
}
