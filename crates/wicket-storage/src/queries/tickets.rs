// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket CRUD operations.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::params;
use wicket_core::types::{NewTicket, TicketCategory, TicketRecord, TicketStatus};
use wicket_core::WicketError;

use crate::database::Database;

const TICKET_COLUMNS: &str = "id, thread_id, channel_id, creator_user_id, category,
                              created_at, closed_at, status, claimed_by";

fn parse_ts(idx: usize, s: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_ticket(row: &rusqlite::Row<'_>) -> Result<TicketRecord, rusqlite::Error> {
    let category: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let closed_at: Option<String> = row.get(6)?;
    let status: String = row.get(7)?;
    Ok(TicketRecord {
        id: row.get(0)?,
        thread_id: row.get(1)?,
        channel_id: row.get(2)?,
        creator_user_id: row.get(3)?,
        category: TicketCategory::from_str(&category).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?,
        created_at: parse_ts(5, &created_at)?,
        closed_at: closed_at.as_deref().map(|s| parse_ts(6, s)).transpose()?,
        status: TicketStatus::from_str(&status).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?,
        claimed_by: row.get(8)?,
    })
}

/// Create a ticket record, idempotently.
///
/// `INSERT OR IGNORE` keyed on the unique `thread_id`, then a read-back of
/// the surviving row, in one transaction. Duplicate "thread created"
/// deliveries therefore yield exactly one record.
pub async fn create_ticket(db: &Database, ticket: NewTicket) -> Result<TicketRecord, WicketError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR IGNORE INTO tickets
                     (thread_id, channel_id, creator_user_id, category, created_at, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    ticket.thread_id,
                    ticket.channel_id,
                    ticket.creator_user_id,
                    ticket.category.to_string(),
                    ticket.created_at.to_rfc3339(),
                    TicketStatus::Open.to_string(),
                ],
            )?;
            let record = tx.query_row(
                &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE thread_id = ?1"),
                params![ticket.thread_id],
                row_to_ticket,
            )?;
            tx.commit()?;
            Ok(record)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a ticket by thread id.
pub async fn get_by_thread(
    db: &Database,
    thread_id: &str,
) -> Result<Option<TicketRecord>, WicketError> {
    let thread_id = thread_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE thread_id = ?1"),
                params![thread_id],
                row_to_ticket,
            );
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update a ticket's status. An already-set `closed_at` is preserved;
/// unknown thread ids are a silent no-op.
pub async fn set_status(
    db: &Database,
    thread_id: &str,
    status: TicketStatus,
    closed_at: Option<DateTime<Utc>>,
) -> Result<(), WicketError> {
    let thread_id = thread_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE tickets SET status = ?1, closed_at = COALESCE(closed_at, ?2)
                 WHERE thread_id = ?3",
                params![
                    status.to_string(),
                    closed_at.map(|t| t.to_rfc3339()),
                    thread_id
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record the claiming staff member. Re-claim overwrites; unknown thread
/// ids are a silent no-op.
pub async fn set_claimed_by(
    db: &Database,
    thread_id: &str,
    user_id: &str,
) -> Result<(), WicketError> {
    let thread_id = thread_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE tickets SET claimed_by = ?1 WHERE thread_id = ?2",
                params![user_id, thread_id],
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

    fn make_ticket(thread_id: &str) -> NewTicket {
        NewTicket {
            thread_id: thread_id.to_string(),
            channel_id: "200".to_string(),
            creator_user_id: "300".to_string(),
            category: TicketCategory::Other,
            created_at: "2026-02-01T12:00:00Z".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn create_and_get_roundtrips() {
        let (db, _dir) = setup_db().await;
        let created = create_ticket(&db, make_ticket("100")).await.unwrap();
        assert_eq!(created.status, TicketStatus::Open);
        assert!(created.closed_at.is_none());
        assert!(created.claimed_by.is_none());

        let fetched = get_by_thread(&db, "100").await.unwrap().unwrap();
        assert_eq!(fetched, created);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn create_is_idempotent_per_thread() {
        let (db, _dir) = setup_db().await;
        let first = create_ticket(&db, make_ticket("100")).await.unwrap();

        // Second delivery of the same thread-created event: different
        // creator field to prove the original row survives untouched.
        let mut dup = make_ticket("100");
        dup.creator_user_id = "999".to_string();
        let second = create_ticket(&db, dup).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.creator_user_id, "300");

        let count: i64 = db
            .connection()
            .call(|conn| Ok::<_, rusqlite::Error>(conn.query_row("SELECT count(*) FROM tickets", [], |r| r.get(0))?))
            .await
            .unwrap();
        assert_eq!(count, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_unknown_thread_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_by_thread(&db, "nope").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_status_stamps_closed_at_once() {
        let (db, _dir) = setup_db().await;
        create_ticket(&db, make_ticket("100")).await.unwrap();

        let first_close: DateTime<Utc> = "2026-02-02T08:00:00Z".parse().unwrap();
        set_status(&db, "100", TicketStatus::Closed, Some(first_close))
            .await
            .unwrap();
        let t = get_by_thread(&db, "100").await.unwrap().unwrap();
        assert_eq!(t.status, TicketStatus::Closed);
        assert_eq!(t.closed_at, Some(first_close));

        // A later delete keeps the original closed_at.
        let later: DateTime<Utc> = "2026-02-03T08:00:00Z".parse().unwrap();
        set_status(&db, "100", TicketStatus::Deleted, Some(later))
            .await
            .unwrap();
        let t = get_by_thread(&db, "100").await.unwrap().unwrap();
        assert_eq!(t.status, TicketStatus::Deleted);
        assert_eq!(t.closed_at, Some(first_close));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_status_on_unknown_thread_is_a_noop() {
        let (db, _dir) = setup_db().await;
        set_status(&db, "ghost", TicketStatus::Closed, Some(Utc::now()))
            .await
            .unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reclaim_overwrites_claimed_by() {
        let (db, _dir) = setup_db().await;
        create_ticket(&db, make_ticket("100")).await.unwrap();

        set_claimed_by(&db, "100", "staff-1").await.unwrap();
        let t = get_by_thread(&db, "100").await.unwrap().unwrap();
        assert_eq!(t.claimed_by.as_deref(), Some("staff-1"));

        set_claimed_by(&db, "100", "staff-2").await.unwrap();
        let t = get_by_thread(&db, "100").await.unwrap().unwrap();
        assert_eq!(t.claimed_by.as_deref(), Some("staff-2"));
        db.close().await.unwrap();
    }
}
