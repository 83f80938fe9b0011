// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket store trait for persistence backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::WicketError;
use crate::types::{NewTicket, TicketRecord, TicketStatus};

/// Durable storage for ticket records and process-wide configuration keys.
///
/// Every mutation is persisted before the call returns; the process may
/// restart between any two interactions, so callers never cache records
/// across an interaction boundary.
#[async_trait]
pub trait TicketStore: Send + Sync + 'static {
    /// Create a ticket record. Idempotent under at-least-once delivery:
    /// if a record with the same `thread_id` already exists, it is returned
    /// unchanged and no write occurs.
    async fn create_ticket(&self, ticket: NewTicket) -> Result<TicketRecord, WicketError>;

    /// Look up a ticket by its thread id, the only supported hot-path key.
    async fn get_by_thread(&self, thread_id: &str)
        -> Result<Option<TicketRecord>, WicketError>;

    /// Set the ticket status, optionally stamping `closed_at`. A no-op for
    /// unknown thread ids; callers resolve existence first. An existing
    /// `closed_at` is never overwritten.
    async fn set_status(
        &self,
        thread_id: &str,
        status: TicketStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> Result<(), WicketError>;

    /// Record the claiming staff member. Re-claim overwrites. A no-op for
    /// unknown thread ids.
    async fn set_claimed_by(&self, thread_id: &str, user_id: &str)
        -> Result<(), WicketError>;

    /// Read a configuration value.
    async fn get_config(&self, key: &str) -> Result<Option<String>, WicketError>;

    /// Upsert a configuration value.
    async fn set_config(&self, key: &str, value: &str) -> Result<(), WicketError>;
}
