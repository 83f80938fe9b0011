// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Wicket workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a ticket.
///
/// Status only moves forward: `open -> closed -> deleted`, with
/// `open -> deleted` permitted for administrative deletes. Claim and lock
/// are orthogonal attributes, not statuses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Closed,
    Deleted,
}

/// The reason a user opened a ticket, chosen from the select menu.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketCategory {
    Purchase,
    Staff,
    Other,
}

impl TicketCategory {
    /// Human-readable label shown in menus and welcome messages.
    pub fn label(self) -> &'static str {
        match self {
            TicketCategory::Purchase => "Purchase Items",
            TicketCategory::Staff => "Staff Help",
            TicketCategory::Other => "Other",
        }
    }

    /// Short description shown under the select-menu option.
    pub fn blurb(self) -> &'static str {
        match self {
            TicketCategory::Purchase => "Buy any item in our market!",
            TicketCategory::Staff => "Reach staff about your questions and concerns!",
            TicketCategory::Other => "All other questions or requests",
        }
    }
}

/// A durable ticket record. Owned exclusively by the ticket store; other
/// components reload it per interaction rather than caching across
/// interaction boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Store-assigned sequential identifier.
    pub id: i64,
    /// Platform thread identifier; unique, the hot-path lookup key.
    pub thread_id: String,
    /// Parent channel the thread was created under.
    pub channel_id: String,
    /// User who opened the ticket.
    pub creator_user_id: String,
    pub category: TicketCategory,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub status: TicketStatus,
    pub claimed_by: Option<String>,
}

/// Fields supplied when creating a ticket record.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub thread_id: String,
    pub channel_id: String,
    pub creator_user_id: String,
    pub category: TicketCategory,
    pub created_at: DateTime<Utc>,
}

/// The identity and capabilities of whoever triggered an interaction.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub display_name: String,
    /// Platform-level administrative capability (e.g. the Administrator
    /// permission), independent of the configured staff role.
    pub is_admin: bool,
    pub role_ids: Vec<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            is_admin: false,
            role_ids: Vec::new(),
        }
    }
}

/// A provisioned thread as reported by the platform.
#[derive(Debug, Clone)]
pub struct ThreadInfo {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Attachment metadata carried by a history message.
#[derive(Debug, Clone)]
pub struct AttachmentInfo {
    pub filename: String,
    pub url: String,
    pub size: u64,
}

/// One message from a thread's history, as retrieved by the platform
/// adapter. Retrieval order is not guaranteed; the transcript generator
/// sorts by timestamp.
#[derive(Debug, Clone)]
pub struct HistoryMessage {
    pub id: String,
    pub author_name: String,
    pub author_id: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub attachments: Vec<AttachmentInfo>,
    pub has_embeds: bool,
}

/// Outcome of a best-effort bulk membership pass. Per-item failures are
/// counted rather than silently discarded so tests can assert partial
/// success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkAddSummary {
    pub added: usize,
    pub failed: usize,
}

/// A rendered transcript ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptDocument {
    pub filename: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_wire_form() {
        for status in [TicketStatus::Open, TicketStatus::Closed, TicketStatus::Deleted] {
            let s = status.to_string();
            assert_eq!(TicketStatus::from_str(&s).unwrap(), status);
        }
        assert_eq!(TicketStatus::Open.to_string(), "open");
    }

    #[test]
    fn category_round_trips_through_wire_form() {
        for cat in [
            TicketCategory::Purchase,
            TicketCategory::Staff,
            TicketCategory::Other,
        ] {
            let s = cat.to_string();
            assert_eq!(TicketCategory::from_str(&s).unwrap(), cat);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(TicketCategory::from_str("refunds").is_err());
    }

    #[test]
    fn ticket_record_serializes_status_lowercase() {
        let record = TicketRecord {
            id: 1,
            thread_id: "111".into(),
            channel_id: "222".into(),
            creator_user_id: "333".into(),
            category: TicketCategory::Other,
            created_at: Utc::now(),
            closed_at: None,
            status: TicketStatus::Open,
            claimed_by: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"status\":\"open\""));
        assert!(json.contains("\"category\":\"other\""));
    }
}
