// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixture helpers shared across tests.

use chrono::{DateTime, TimeZone, Utc};
use wicket_core::types::{Actor, HistoryMessage};

/// The staff role id used by fixtures and most tests.
pub const STAFF_ROLE: &str = "900";

/// An actor holding the fixture staff role.
pub fn staff_actor(id: &str) -> Actor {
    Actor {
        id: id.to_string(),
        display_name: format!("staff-{id}"),
        is_admin: false,
        role_ids: vec![STAFF_ROLE.to_string()],
    }
}

/// A plain actor with no roles and no admin capability.
pub fn user_actor(id: &str) -> Actor {
    Actor::new(id, format!("user-{id}"))
}

/// A text-only history message at the given unix timestamp.
pub fn history_message(id: &str, author_id: &str, unix_secs: i64, content: &str) -> HistoryMessage {
    let timestamp: DateTime<Utc> = Utc.timestamp_opt(unix_secs, 0).unwrap();
    HistoryMessage {
        id: id.to_string(),
        author_name: format!("user-{author_id}"),
        author_id: author_id.to_string(),
        timestamp,
        content: content.to_string(),
        attachments: Vec::new(),
        has_embeds: false,
    }
}
