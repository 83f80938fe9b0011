// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction context and reply types.
//!
//! The context carries only what the platform event ambiently provides;
//! per-ticket state is always reloaded from the store inside the handler.

use wicket_core::types::Actor;

/// Everything a handler learns from the inbound interaction event itself.
#[derive(Debug, Clone)]
pub struct InteractionContext {
    pub actor: Actor,
    /// Channel the interaction fired in.
    pub channel_id: String,
    /// Set when that channel is a thread.
    pub thread_id: Option<String>,
    pub payload: Payload,
}

impl InteractionContext {
    /// A context with no payload, fired in a plain channel.
    pub fn in_channel(actor: Actor, channel_id: impl Into<String>) -> Self {
        Self {
            actor,
            channel_id: channel_id.into(),
            thread_id: None,
            payload: Payload::None,
        }
    }

    /// A context with no payload, fired inside a thread.
    pub fn in_thread(actor: Actor, thread_id: impl Into<String>) -> Self {
        let thread_id = thread_id.into();
        Self {
            actor,
            channel_id: thread_id.clone(),
            thread_id: Some(thread_id),
            payload: Payload::None,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }
}

/// Data attached to the interaction beyond its tag.
#[derive(Debug, Clone)]
pub enum Payload {
    None,
    /// Chosen value of a select menu.
    Select { value: String },
    /// Free text from a modal input or command option.
    Text { value: String },
    /// A member reference from a command option.
    Member { user_id: String },
}

/// What the adapter should show the actor. Exactly one reply per
/// interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A plain ephemeral embed.
    Ephemeral { title: String, body: String },
    /// Ephemeral embed with the admin control rows attached.
    AdminPanel { title: String, body: String },
    /// Ephemeral embed with the confirm/cancel pair attached; the adapter
    /// retires the pair after its bounded lifetime.
    ConfirmDelete { title: String, body: String },
    /// Open the transcript-channel modal.
    TranscriptChannelModal,
}

impl Reply {
    pub fn ephemeral(title: impl Into<String>, body: impl Into<String>) -> Self {
        Reply::Ephemeral {
            title: title.into(),
            body: body.into(),
        }
    }
}
