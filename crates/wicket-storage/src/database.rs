// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.
//! `synchronous=FULL` keeps every commit durable before the call returns --
//! the next interaction may arrive after a process restart.

use tokio_rusqlite::Connection;
use tracing::debug;
use wicket_core::WicketError;

/// Handle to the single SQLite connection used by the store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run
    /// all pending migrations.
    pub async fn open(path: &str) -> Result<Self, WicketError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=FULL;
                 PRAGMA busy_timeout=5000;
                 PRAGMA foreign_keys=ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| crate::migrations::run_migrations(conn))
            .await
            .map_err(|e| WicketError::Storage {
                source: Box::new(e),
            })?;

        debug!(path, "database opened, migrations applied");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and release the connection.
    pub async fn close(&self) -> Result<(), WicketError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> WicketError {
    WicketError::Storage {
        source: Box::new(e),
    }
}
