// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the TicketStore trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use wicket_config::model::StorageConfig;
use wicket_core::types::{NewTicket, TicketRecord, TicketStatus};
use wicket_core::{TicketStore, WicketError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed ticket store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`SqliteTicketStore::initialize`].
pub struct SqliteTicketStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteTicketStore {
    /// Create a new store with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and run migrations.
    pub async fn initialize(&self) -> Result<(), WicketError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| WicketError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite ticket store initialized");
        Ok(())
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), WicketError> {
        self.db()?.close().await
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, WicketError> {
        self.db.get().ok_or_else(|| WicketError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl TicketStore for SqliteTicketStore {
    async fn create_ticket(&self, ticket: NewTicket) -> Result<TicketRecord, WicketError> {
        queries::tickets::create_ticket(self.db()?, ticket).await
    }

    async fn get_by_thread(
        &self,
        thread_id: &str,
    ) -> Result<Option<TicketRecord>, WicketError> {
        queries::tickets::get_by_thread(self.db()?, thread_id).await
    }

    async fn set_status(
        &self,
        thread_id: &str,
        status: TicketStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> Result<(), WicketError> {
        queries::tickets::set_status(self.db()?, thread_id, status, closed_at).await
    }

    async fn set_claimed_by(&self, thread_id: &str, user_id: &str) -> Result<(), WicketError> {
        queries::tickets::set_claimed_by(self.db()?, thread_id, user_id).await
    }

    async fn get_config(&self, key: &str) -> Result<Option<String>, WicketError> {
        queries::config::get_config(self.db()?, key).await
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), WicketError> {
        queries::config::set_config(self.db()?, key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wicket_core::types::TicketCategory;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
        }
    }

    fn make_ticket(thread_id: &str) -> NewTicket {
        NewTicket {
            thread_id: thread_id.to_string(),
            channel_id: "200".to_string(),
            creator_user_id: "300".to_string(),
            category: TicketCategory::Purchase,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let store = SqliteTicketStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let store = SqliteTicketStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let store = SqliteTicketStore::new(make_config(db_path.to_str().unwrap()));

        assert!(store.get_by_thread("100").await.is_err());
    }

    #[tokio::test]
    async fn full_ticket_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let store = SqliteTicketStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        let created = store.create_ticket(make_ticket("100")).await.unwrap();
        assert_eq!(created.status, TicketStatus::Open);

        store.set_claimed_by("100", "staff-7").await.unwrap();
        store
            .set_status("100", TicketStatus::Closed, Some(Utc::now()))
            .await
            .unwrap();

        let t = store.get_by_thread("100").await.unwrap().unwrap();
        assert_eq!(t.status, TicketStatus::Closed);
        assert_eq!(t.claimed_by.as_deref(), Some("staff-7"));
        assert!(t.closed_at.is_some());

        store.set_config("transcript_channel", "555").await.unwrap();
        assert_eq!(
            store.get_config("transcript_channel").await.unwrap().as_deref(),
            Some("555")
        );

        store.close().await.unwrap();
    }
}
