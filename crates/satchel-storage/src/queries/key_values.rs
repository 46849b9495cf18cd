// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain key-value rows.

use rusqlite::params;
use satchel_core::SatchelError;

use crate::database::{Database, map_tr_err};
use crate::models::KeyValueEntry;

const UPSERT: &str = "INSERT INTO key_values (key, value) VALUES (?1, ?2)
                      ON CONFLICT(key) DO UPDATE SET value = excluded.value";

/// Insert or replace a single entry.
pub async fn upsert(db: &Database, key: &str, value: Option<&str>) -> Result<(), SatchelError> {
    let key = key.to_string();
    let value = value.map(str::to_string);
    db.connection()
        .call(move |conn| -> rusqlite::Result<()> {
            conn.execute(UPSERT, params![key, value])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Insert or replace several entries atomically.
pub async fn upsert_many(db: &Database, pairs: &[(String, String)]) -> Result<(), SatchelError> {
    if pairs.is_empty() {
        return Ok(());
    }
    let pairs = pairs.to_vec();
    db.connection()
        .call(move |conn| -> rusqlite::Result<()> {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(UPSERT)?;
                for (key, value) in &pairs {
                    stmt.execute(params![key, value])?;
                }
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// Get one entry by key.
pub async fn get(db: &Database, key: &str) -> Result<Option<KeyValueEntry>, SatchelError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<Option<KeyValueEntry>> {
            let result = conn.query_row(
                "SELECT key, value FROM key_values WHERE key = ?1",
                params![key],
                |row| {
                    Ok(KeyValueEntry {
                        key: row.get(0)?,
                        value: row.get(1)?,
                    })
                },
            );
            match result {
                Ok(entry) => Ok(Some(entry)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Every entry, ordered by key. Used to hydrate the in-memory mirror.
pub async fn list(db: &Database) -> Result<Vec<KeyValueEntry>, SatchelError> {
    db.connection()
        .call(|conn| -> rusqlite::Result<Vec<KeyValueEntry>> {
            let mut stmt = conn.prepare("SELECT key, value FROM key_values ORDER BY key")?;
            let rows = stmt.query_map([], |row| {
                Ok(KeyValueEntry {
                    key: row.get(0)?,
                    value: row.get(1)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;

    #[tokio::test]
    async fn upsert_replaces_existing_value() {
        let (db, _dir) = setup_db().await;
        upsert(&db, "theme", Some("light")).await.unwrap();
        upsert(&db, "theme", Some("dark")).await.unwrap();

        let entries = list(&db).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value.as_deref(), Some("dark"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn null_value_is_preserved() {
        let (db, _dir) = setup_db().await;
        upsert(&db, "empty", None).await.unwrap();
        let entry = get(&db, "empty").await.unwrap().unwrap();
        assert_eq!(entry.value, None);
        assert!(get(&db, "missing").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_many_writes_all_pairs() {
        let (db, _dir) = setup_db().await;
        upsert(&db, "b", Some("old")).await.unwrap();
        let pairs = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ];
        upsert_many(&db, &pairs).await.unwrap();

        let entries = list(&db).await.unwrap();
        let flat: Vec<_> = entries
            .iter()
            .map(|e| (e.key.as_str(), e.value.as_deref()))
            .collect();
        assert_eq!(flat, [("a", Some("1")), ("b", Some("2"))]);
        db.close().await.unwrap();
    }
}
