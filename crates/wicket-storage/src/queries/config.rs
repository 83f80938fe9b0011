// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value configuration operations.

use rusqlite::params;
use wicket_core::WicketError;

use crate::database::Database;

/// Read a configuration value by key.
pub async fn get_config(db: &Database, key: &str) -> Result<Option<String>, WicketError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get(0),
            );
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Upsert a configuration value.
pub async fn set_config(db: &Database, key: &str, value: &str) -> Result<(), WicketError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO config (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn missing_key_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_config(&db, "transcript_channel").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let (db, _dir) = setup_db().await;
        set_config(&db, "transcript_channel", "12345").await.unwrap();
        assert_eq!(
            get_config(&db, "transcript_channel").await.unwrap().as_deref(),
            Some("12345")
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_overwrites_existing_value() {
        let (db, _dir) = setup_db().await;
        set_config(&db, "transcript_channel", "111").await.unwrap();
        set_config(&db, "transcript_channel", "222").await.unwrap();
        assert_eq!(
            get_config(&db, "transcript_channel").await.unwrap().as_deref(),
            Some("222")
        );
        db.close().await.unwrap();
    }
}
