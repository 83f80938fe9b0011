// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization predicates gating every mutating ticket action.
//!
//! Authorization is a total function of (actor, ticket) with no hidden
//! state -- buttons, slash commands, and modals all funnel through the
//! same predicates.

use wicket_core::types::{Actor, TicketRecord};

/// Pure authorization checks, constructed once from the configured staff
/// role.
#[derive(Debug, Clone)]
pub struct Guard {
    staff_role_id: Option<String>,
}

impl Guard {
    pub fn new(staff_role_id: Option<String>) -> Self {
        Self { staff_role_id }
    }

    /// True if the actor has an administrative capability OR holds the
    /// configured staff role.
    pub fn is_staff(&self, actor: &Actor) -> bool {
        if actor.is_admin {
            return true;
        }
        match &self.staff_role_id {
            Some(role) => actor.role_ids.iter().any(|r| r == role),
            None => false,
        }
    }

    /// Staff or the ticket creator may close.
    pub fn can_close(&self, actor: &Actor, ticket: &TicketRecord) -> bool {
        self.is_staff(actor) || actor.id == ticket.creator_user_id
    }

    /// Staff or the ticket creator may request a transcript.
    pub fn can_request_transcript(&self, actor: &Actor, ticket: &TicketRecord) -> bool {
        self.is_staff(actor) || actor.id == ticket.creator_user_id
    }

    pub fn can_claim(&self, actor: &Actor) -> bool {
        self.is_staff(actor)
    }

    pub fn can_lock(&self, actor: &Actor) -> bool {
        self.is_staff(actor)
    }

    pub fn can_add(&self, actor: &Actor) -> bool {
        self.is_staff(actor)
    }

    pub fn can_remove(&self, actor: &Actor) -> bool {
        self.is_staff(actor)
    }

    pub fn can_delete(&self, actor: &Actor) -> bool {
        self.is_staff(actor)
    }

    pub fn can_open_admin_panel(&self, actor: &Actor) -> bool {
        self.is_staff(actor)
    }
}
