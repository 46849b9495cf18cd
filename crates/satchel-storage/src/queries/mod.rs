// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules for each table.
//!
//! The three tables share the `(key UNIQUE, value)` shape, so key listing
//! and deletion live here and are parameterized by [`Table`]. Upserts and
//! row reads differ per table and live in the submodules.

pub mod cache_items;
pub mod key_values;
pub mod secure_key_values;

use rusqlite::params;
use satchel_core::SatchelError;

use crate::database::{Database, map_tr_err};

/// One of the key-value tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    KeyValues,
    SecureKeyValues,
    CacheItems,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::KeyValues => "key_values",
            Table::SecureKeyValues => "secure_key_values",
            Table::CacheItems => "sdk_cache_items",
        }
    }
}

/// All keys in `table`, sorted ascending.
pub async fn list_keys(db: &Database, table: Table) -> Result<Vec<String>, SatchelError> {
    let sql = format!("SELECT key FROM {} ORDER BY key", table.name());
    db.connection()
        .call(move |conn| -> rusqlite::Result<Vec<String>> {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Whether a row with `key` exists in `table`.
pub async fn exists(db: &Database, table: Table, key: &str) -> Result<bool, SatchelError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE key = ?1)", table.name());
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<bool> {
            conn.query_row(&sql, params![key], |row| row.get(0))
        })
        .await
        .map_err(map_tr_err)
}

/// Delete one row. Returns the number of rows removed (0 or 1).
pub async fn delete(db: &Database, table: Table, key: &str) -> Result<usize, SatchelError> {
    let sql = format!("DELETE FROM {} WHERE key = ?1", table.name());
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<usize> { conn.execute(&sql, params![key]) })
        .await
        .map_err(map_tr_err)
}

/// Delete several rows in a single transaction. Missing keys are ignored.
pub async fn delete_many(
    db: &Database,
    table: Table,
    keys: &[String],
) -> Result<usize, SatchelError> {
    if keys.is_empty() {
        return Ok(0);
    }
    let sql = format!("DELETE FROM {} WHERE key = ?1", table.name());
    let keys = keys.to_vec();
    db.connection()
        .call(move |conn| -> rusqlite::Result<usize> {
            let tx = conn.transaction()?;
            let mut removed = 0;
            {
                let mut stmt = tx.prepare(&sql)?;
                for key in &keys {
                    removed += stmt.execute(params![key])?;
                }
            }
            tx.commit()?;
            Ok(removed)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every row of `table`.
pub async fn clear(db: &Database, table: Table) -> Result<usize, SatchelError> {
    let sql = format!("DELETE FROM {}", table.name());
    db.connection()
        .call(move |conn| -> rusqlite::Result<usize> { conn.execute(&sql, []) })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use crate::database::Database;

    pub async fn setup_db() -> (Database, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();
        (db, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::setup_db;
    use super::*;

    #[tokio::test]
    async fn shared_helpers_operate_on_the_named_table_only() {
        let (db, _dir) = setup_db().await;
        key_values::upsert(&db, "a", Some("1")).await.unwrap();
        secure_key_values::upsert(&db, "a", "{}").await.unwrap();

        assert!(exists(&db, Table::KeyValues, "a").await.unwrap());
        assert_eq!(delete(&db, Table::KeyValues, "a").await.unwrap(), 1);
        assert!(!exists(&db, Table::KeyValues, "a").await.unwrap());
        assert!(exists(&db, Table::SecureKeyValues, "a").await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_many_ignores_missing_keys() {
        let (db, _dir) = setup_db().await;
        key_values::upsert(&db, "x", Some("1")).await.unwrap();
        key_values::upsert(&db, "y", Some("2")).await.unwrap();

        let keys = vec!["x".to_string(), "ghost".to_string()];
        assert_eq!(delete_many(&db, Table::KeyValues, &keys).await.unwrap(), 1);
        assert_eq!(list_keys(&db, Table::KeyValues).await.unwrap(), ["y"]);
        assert_eq!(delete_many(&db, Table::KeyValues, &[]).await.unwrap(), 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_keys_is_sorted_and_clear_empties() {
        let (db, _dir) = setup_db().await;
        for key in ["m", "c", "x"] {
            cache_items::upsert(&db, key, "v", false).await.unwrap();
        }
        assert_eq!(list_keys(&db, Table::CacheItems).await.unwrap(), ["c", "m", "x"]);
        assert_eq!(clear(&db, Table::CacheItems).await.unwrap(), 3);
        assert!(list_keys(&db, Table::CacheItems).await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
