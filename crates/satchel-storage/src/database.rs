// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. A [`Database`] is the single writer for its file; clone the handle
//! instead of opening a second connection.

use std::path::Path;

use satchel_config::model::StorageConfig;
use satchel_core::SatchelError;
use tracing::debug;

use crate::migrations;

/// Shared handle to the Satchel SQLite database.
///
/// Cloning is cheap: every clone talks to the same background connection.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
    path: String,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, SatchelError> {
        Self::open_with(path, true).await
    }

    /// Open the database described by the `[storage]` config section.
    pub async fn open_with_config(config: &StorageConfig) -> Result<Self, SatchelError> {
        Self::open_with(&config.database_path, config.wal_mode).await
    }

    async fn open_with(path: &str, wal_mode: bool) -> Result<Self, SatchelError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SatchelError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| SatchelError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                // journal_mode reports the resulting mode as a row.
                conn.query_row("PRAGMA journal_mode = WAL;", [], |row| {
                    row.get::<_, String>(0)
                })?;
            }
            conn.execute_batch(
                "PRAGMA busy_timeout = 5000;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| -> Result<(), SatchelError> { migrations::run_migrations(conn) })
        .await
        .map_err(|e| SatchelError::Storage {
            source: e.to_string().into(),
        })?;

        debug!(path, wal_mode, "database opened");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// The underlying async connection. Query modules go through this.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Latest applied migration version, or 0 for an unmigrated file.
    pub async fn schema_version(&self) -> Result<i64, SatchelError> {
        self.conn
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT COALESCE(MAX(version), 0) FROM refinery_schema_history",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .map_err(map_tr_err)
    }

    /// Run `PRAGMA integrity_check` and return its report lines.
    ///
    /// A healthy database reports the single line `ok`.
    pub async fn integrity_check(&self) -> Result<Vec<String>, SatchelError> {
        self.conn
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare("PRAGMA integrity_check")?;
                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), SatchelError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(|e| SatchelError::Storage {
            source: e.to_string().into(),
        })?;
        debug!(path = %self.path, "database closed");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into [`SatchelError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SatchelError {
    SatchelError::Storage {
        source: Box::new(e),
    }
}
