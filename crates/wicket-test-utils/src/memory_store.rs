// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `TicketStore` for engine and router tests.
//!
//! Mirrors the SQLite adapter's contract (idempotent create, silent no-op
//! updates for unknown threads, `closed_at` stamped once) without touching
//! the filesystem.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use wicket_core::types::{NewTicket, TicketRecord, TicketStatus};
use wicket_core::{TicketStore, WicketError};

#[derive(Default)]
struct State {
    tickets: HashMap<String, TicketRecord>,
    config: HashMap<String, String>,
    next_id: i64,
}

/// HashMap-backed ticket store with the same observable behavior as
/// `SqliteTicketStore`.
pub struct MemoryTicketStore {
    state: Arc<Mutex<State>>,
}

impl MemoryTicketStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Number of stored ticket records.
    pub async fn ticket_count(&self) -> usize {
        self.state.lock().await.tickets.len()
    }
}

impl Default for MemoryTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn create_ticket(&self, ticket: NewTicket) -> Result<TicketRecord, WicketError> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.tickets.get(&ticket.thread_id) {
            return Ok(existing.clone());
        }
        state.next_id += 1;
        let record = TicketRecord {
            id: state.next_id,
            thread_id: ticket.thread_id.clone(),
            channel_id: ticket.channel_id,
            creator_user_id: ticket.creator_user_id,
            category: ticket.category,
            created_at: ticket.created_at,
            closed_at: None,
            status: TicketStatus::Open,
            claimed_by: None,
        };
        state.tickets.insert(ticket.thread_id, record.clone());
        Ok(record)
    }

    async fn get_by_thread(
        &self,
        thread_id: &str,
    ) -> Result<Option<TicketRecord>, WicketError> {
        Ok(self.state.lock().await.tickets.get(thread_id).cloned())
    }

    async fn set_status(
        &self,
        thread_id: &str,
        status: TicketStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> Result<(), WicketError> {
        let mut state = self.state.lock().await;
        if let Some(record) = state.tickets.get_mut(thread_id) {
            record.status = status;
            if record.closed_at.is_none() {
                record.closed_at = closed_at;
            }
        }
        Ok(())
    }

    async fn set_claimed_by(&self, thread_id: &str, user_id: &str) -> Result<(), WicketError> {
        let mut state = self.state.lock().await;
        if let Some(record) = state.tickets.get_mut(thread_id) {
            record.claimed_by = Some(user_id.to_string());
        }
        Ok(())
    }

    async fn get_config(&self, key: &str) -> Result<Option<String>, WicketError> {
        Ok(self.state.lock().await.config.get(key).cloned())
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), WicketError> {
        self.state
            .lock()
            .await
            .config
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
