// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The closed table of control tags.
//!
//! A tag names a handler class, never an instance: no ticket id, no user
//! id, no state is ever encoded in a control's persistent identifier.
//! Which ticket a click belongs to is re-derived at dispatch time from the
//! thread the interaction fired in, so re-registering this finite set once
//! per process start keeps every control rendered before a restart working
//! after it.

use strum::{Display, EnumIter, EnumString};

/// Handler classes for every interactive control and command.
///
/// The wire form (serenity `custom_id` / command name) is the snake_case
/// rendering, e.g. `ControlTag::TicketClose` <-> `"ticket_close"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ControlTag {
    /// Category select menu posted by `ticket_setup`.
    TicketSelect,
    TicketClose,
    TicketClaim,
    TicketTranscript,
    TicketLock,
    TicketAdd,
    TicketRemove,
    AdminPanel,
    /// Opens the delete confirm/cancel pair.
    AdminDeleteThread,
    AdminConfirmDelete,
    AdminCancelDelete,
    /// Opens the transcript-channel modal.
    AdminSetTranscriptChannel,
    /// Submit of the transcript-channel modal.
    AdminTranscriptChannelModal,
}

impl ControlTag {
    /// Tags whose handlers do slow platform work (thread edits, bulk adds,
    /// history pagination). The adapter defers the acknowledgment before
    /// dispatching these and follows up afterward, so no interaction ever
    /// goes unanswered.
    pub fn wants_deferred_ack(self) -> bool {
        matches!(
            self,
            ControlTag::TicketSelect
                | ControlTag::TicketClose
                | ControlTag::TicketTranscript
                | ControlTag::AdminConfirmDelete
        )
    }

    /// Tags answered by opening a modal. These must NOT be deferred; a
    /// modal is only valid as the first response.
    pub fn opens_modal(self) -> bool {
        matches!(self, ControlTag::AdminSetTranscriptChannel)
    }
}
