// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests over the complete store stack.
//!
//! Each test creates an isolated TestHarness with a temp SQLite file and an
//! in-memory keychain. Tests are independent and order-insensitive.

use satchel_core::{CacheManager, KeyValueStore, Protection, SecureStorage};
use satchel_storage::queries::{Table, list_keys};
use satchel_test_utils::TestHarness;
use secrecy::ExposeSecret;

// ---- Cipher ----

#[tokio::test]
async fn encrypt_decrypt_round_trip_and_fresh_ivs() {
    let h = TestHarness::builder().build().await.unwrap();

    let a = h.cipher.encrypt("same text", "GENERAL").await.unwrap();
    let b = h.cipher.encrypt("same text", "GENERAL").await.unwrap();
    assert_ne!(a.iv, b.iv);
    assert_ne!(a.value, b.value);
    assert_eq!(h.cipher.decrypt(&a, "GENERAL").await.unwrap(), "same text");
    assert_eq!(h.cipher.decrypt(&b, "GENERAL").await.unwrap(), "same text");
}

#[tokio::test]
async fn key_is_stable_across_restart() {
    let h = TestHarness::builder().build().await.unwrap();
    let envelope = h.cipher.seal("kept", "GENERAL").await.unwrap();

    let h = h.restart().await.unwrap();
    assert_eq!(h.cipher.open(&envelope, "GENERAL").await.unwrap(), "kept");
}

// ---- Plain store ----

#[tokio::test]
async fn plain_store_upsert_keeps_one_row() {
    let h = TestHarness::builder().build().await.unwrap();
    h.plain.set_item("k", "v1").await.unwrap();
    h.plain.set_item("k", "v2").await.unwrap();

    assert_eq!(h.plain.get_item("k").as_deref(), Some("v2"));
    assert_eq!(list_keys(&h.db, Table::KeyValues).await.unwrap(), ["k"]);
}

#[tokio::test]
async fn plain_store_reads_need_initialize() {
    let h = TestHarness::builder().build().await.unwrap();
    h.plain.set_item("saved", "yes").await.unwrap();

    let h = h.restart().await.unwrap();
    assert_eq!(h.plain.get_item("saved").as_deref(), Some("yes"));

    let cold = TestHarness::builder().without_initialize().build().await.unwrap();
    assert!(!cold.plain.is_initialized());
    assert!(cold.plain.get_all_keys().is_empty());
}

// ---- Secure store ----

#[tokio::test]
async fn secure_store_absence_and_clear() {
    let h = TestHarness::builder().build().await.unwrap();
    assert_eq!(h.secure.get_item("never").await.unwrap(), "");
    assert!(!h.secure.contains_item("never").await.unwrap());

    for i in 0..5 {
        h.secure.set_item(&format!("k{i}"), "v").await.unwrap();
    }
    assert!(h.secure.clear().await.unwrap());
    assert!(h.secure.get_all_keys().await.unwrap().is_empty());
    assert_eq!(h.secure.get_item("k0").await.unwrap(), "");
}

// ---- SDK cache ----

#[tokio::test]
async fn cache_duality_and_pattern_removal() {
    let h = TestHarness::builder().build().await.unwrap();
    h.cache.set_item("a1", "one", Protection::Encrypted).await;
    h.cache.set_item("a2", "two", Protection::Plain).await;
    h.cache.set_item("b1", "three", Protection::Encrypted).await;

    let all = h.cache.get_all_items().await;
    assert_eq!(all["a1"], "one");
    assert_eq!(all["a2"], "two");
    assert_eq!(all["b1"], "three");

    assert!(h.cache.remove_items_based_on_pattern("^a").await);
    let left: Vec<_> = h.cache.get_all_items().await.into_keys().collect();
    assert_eq!(left, ["b1"]);

    assert!(h.cache.clear().await);
    assert_eq!(h.cache.get_item("b1").await, "");
    assert!(!h.cache.contains_item("b1").await);
}

// ---- Key provisioning ----

#[tokio::test]
async fn keychain_outage_uses_the_plain_store() {
    let h = TestHarness::builder()
        .with_keychain_unavailable()
        .build()
        .await
        .unwrap();
    h.secure.set_item("pin", "2468").await.unwrap();

    assert!(h.keychain.is_empty());
    assert!(h.plain.get_item("GENERAL").is_some());

    // A fresh provider over the same files resolves the key from the fallback.
    let h = h.restart().await.unwrap();
    assert_eq!(h.secure.get_item("pin").await.unwrap(), "2468");
}

#[tokio::test]
async fn provider_key_is_stable() {
    let h = TestHarness::builder().build().await.unwrap();
    let first = h.provider.get_key("GENERAL").await.unwrap();
    let second = h.provider.get_key("GENERAL").await.unwrap();
    assert_eq!(first.expose_secret(), second.expose_secret());

    let h = h.restart().await.unwrap();
    let after_restart = h.provider.get_key("GENERAL").await.unwrap();
    assert_eq!(first.expose_secret(), after_restart.expose_secret());
    let envelope = h.cipher.seal("x", "GENERAL").await.unwrap();
    assert_eq!(h.cipher.open(&envelope, "GENERAL").await.unwrap(), "x");
}

#[tokio::test]
async fn categories_are_isolated() {
    let h = TestHarness::builder()
        .with_categories("SECURE", "CACHE")
        .build()
        .await
        .unwrap();
    h.secure.set_item("k", "general secret").await.unwrap();
    h.cache.set_item("k", "cache secret", Protection::Encrypted).await;
    assert!(h.keychain.contains("SECURE"));
    assert!(h.keychain.contains("CACHE"));

    let sealed = h.cipher.seal("general secret", "SECURE").await.unwrap();
    if let Ok(text) = h.cipher.open(&sealed, "CACHE").await {
        assert_ne!(text, "general secret");
    }
}
