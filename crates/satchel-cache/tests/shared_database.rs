// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The secure store and cache manager sharing one database and provider.

use std::sync::Arc;

use satchel_cache::{SdkCacheManager, SecureKeyValueStorage};
use satchel_config::SatchelConfig;
use satchel_core::{CacheManager, KeyValueStore, Protection, SecureStorage};
use satchel_storage::queries::{Table, cache_items, list_keys, secure_key_values};
use satchel_storage::{Database, KeyValueStorage};
use satchel_vault::{Cipher, SecretProvider};

struct Stack {
    db: Database,
    plain: Arc<KeyValueStorage>,
    secure: SecureKeyValueStorage,
    cache: SdkCacheManager,
}

async fn stack(path: &str) -> Stack {
    let mut config = SatchelConfig::default();
    config.vault.use_keyring = false;

    let db = Database::open(path).await.unwrap();
    let plain = Arc::new(KeyValueStorage::new(db.clone()));
    let provider = SecretProvider::from_config(&config, plain.clone()).unwrap();
    let cipher = Cipher::new(Arc::new(provider));
    Stack {
        secure: SecureKeyValueStorage::new(
            db.clone(),
            cipher.clone(),
            config.vault.secure_category.clone(),
        ),
        cache: SdkCacheManager::new(db.clone(), cipher, config.vault.cache_category.clone()),
        plain,
        db,
    }
}

#[tokio::test]
async fn stores_keep_separate_tables() {
    let dir = tempfile::tempdir().unwrap();
    let s = stack(dir.path().join("shared.db").to_str().unwrap()).await;

    s.secure.set_item("token", "abc").await.unwrap();
    s.cache.set_item("token", "xyz", Protection::Encrypted).await;

    assert_eq!(s.secure.get_item("token").await.unwrap(), "abc");
    assert_eq!(s.cache.get_item("token").await, "xyz");

    s.cache.clear().await;
    assert_eq!(s.secure.get_all_keys().await.unwrap(), ["token"]);

    // Both categories were provisioned into the plain store.
    assert!(s.plain.get_item("GENERAL").is_some());
    assert!(s.plain.get_item("gsSDKCache").is_some());
    assert_ne!(s.plain.get_item("GENERAL"), s.plain.get_item("gsSDKCache"));
    s.db.close().await.unwrap();
}

#[tokio::test]
async fn secure_ciphertext_does_not_open_under_the_cache_category() {
    let dir = tempfile::tempdir().unwrap();
    let s = stack(dir.path().join("isolation.db").to_str().unwrap()).await;

    s.secure.set_item("moved", "only for GENERAL").await.unwrap();
    let row = secure_key_values::get(&s.db, "moved").await.unwrap().unwrap();
    cache_items::upsert(&s.db, "moved", &row.value, true)
        .await
        .unwrap();

    assert_ne!(s.cache.get_item("moved").await, "only for GENERAL");
    s.db.close().await.unwrap();
}

#[tokio::test]
async fn everything_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restart.db");
    let path = path.to_str().unwrap();

    {
        let s = stack(path).await;
        s.plain.initialize().await.unwrap();
        s.plain.set_item("theme", "dark").await.unwrap();
        s.secure.set_item("pin", "1234").await.unwrap();
        s.cache.set_item("plans", "[1,2]", Protection::Plain).await;
        s.cache.set_item("profile", "ada", Protection::Encrypted).await;
        let Stack { db, plain, secure, cache } = s;
        drop((plain, secure, cache));
        db.close().await.unwrap();
    }

    let s = stack(path).await;
    s.plain.initialize().await.unwrap();
    assert_eq!(s.plain.get_item("theme").as_deref(), Some("dark"));
    assert_eq!(s.secure.get_item("pin").await.unwrap(), "1234");
    let items = s.cache.get_all_items().await;
    assert_eq!(items["plans"], "[1,2]");
    assert_eq!(items["profile"], "ada");
    assert_eq!(list_keys(&s.db, Table::CacheItems).await.unwrap(), ["plans", "profile"]);
    s.db.close().await.unwrap();
}
