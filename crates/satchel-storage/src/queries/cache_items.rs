// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SDK cache rows with their `securely_stored` flag.

use rusqlite::params;
use satchel_core::SatchelError;

use crate::database::{Database, map_tr_err};
use crate::models::CacheItemRow;

/// Insert or replace a row. The flag is rewritten together with the value.
pub async fn upsert(
    db: &Database,
    key: &str,
    value: &str,
    securely_stored: bool,
) -> Result<(), SatchelError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<()> {
            conn.execute(
                "INSERT INTO sdk_cache_items (key, value, securely_stored) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     securely_stored = excluded.securely_stored",
                params![key, value, securely_stored],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<CacheItemRow> {
    Ok(CacheItemRow {
        key: row.get(0)?,
        value: row.get(1)?,
        securely_stored: row.get(2)?,
    })
}

/// Get one row by key.
pub async fn get(db: &Database, key: &str) -> Result<Option<CacheItemRow>, SatchelError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<Option<CacheItemRow>> {
            let result = conn.query_row(
                "SELECT key, value, securely_stored FROM sdk_cache_items WHERE key = ?1",
                params![key],
                row_to_item,
            );
            match result {
                Ok(item) => Ok(Some(item)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Every row, ordered by key.
pub async fn list(db: &Database) -> Result<Vec<CacheItemRow>, SatchelError> {
    db.connection()
        .call(|conn| -> rusqlite::Result<Vec<CacheItemRow>> {
            let mut stmt = conn.prepare(
                "SELECT key, value, securely_stored FROM sdk_cache_items ORDER BY key",
            )?;
            let rows = stmt.query_map([], row_to_item)?;
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
    async fn flag_follows_the_latest_write() {
        let (db, _dir) = setup_db().await;
        upsert(&db, "k", "envelope", true).await.unwrap();
        upsert(&db, "k", "plain", false).await.unwrap();

        let row = get(&db, "k").await.unwrap().unwrap();
        assert_eq!(row.value, "plain");
        assert!(!row.securely_stored);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_returns_rows_in_key_order() {
        let (db, _dir) = setup_db().await;
        upsert(&db, "b", "2", true).await.unwrap();
        upsert(&db, "a", "1", false).await.unwrap();

        let rows = list(&db).await.unwrap();
        let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert!(rows[1].securely_stored);
        db.close().await.unwrap();
    }
}
