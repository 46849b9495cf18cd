// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted key-value rows. Values are opaque envelopes at this layer.

use rusqlite::params;
use satchel_core::SatchelError;

use crate::database::{Database, map_tr_err};
use crate::models::SecureKeyValueEntry;

/// Insert or replace the envelope stored under `key`.
pub async fn upsert(db: &Database, key: &str, envelope: &str) -> Result<(), SatchelError> {
    let key = key.to_string();
    let envelope = envelope.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<()> {
            conn.execute(
                "INSERT INTO secure_key_values (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, envelope],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get the row stored under `key`.
pub async fn get(db: &Database, key: &str) -> Result<Option<SecureKeyValueEntry>, SatchelError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<Option<SecureKeyValueEntry>> {
            let result = conn.query_row(
                "SELECT key, value FROM secure_key_values WHERE key = ?1",
                params![key],
                |row| {
                    Ok(SecureKeyValueEntry {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;

    #[tokio::test]
    async fn upsert_then_get() {
        let (db, _dir) = setup_db().await;
        upsert(&db, "token", r#"{"value":"AA==","iv":"00"}"#).await.unwrap();
        upsert(&db, "token", r#"{"value":"AQ==","iv":"01"}"#).await.unwrap();

        let row = get(&db, "token").await.unwrap().unwrap();
        assert_eq!(row.value, r#"{"value":"AQ==","iv":"01"}"#);
        assert!(get(&db, "other").await.unwrap().is_none());
        db.close().await.unwrap();
    }
}
