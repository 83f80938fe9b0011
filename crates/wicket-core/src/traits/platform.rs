// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform trait abstracting the chat platform's thread, member, and
//! message operations.
//!
//! Engine crates depend only on this trait; the serenity surface lives in
//! `wicket-discord`. All identifiers are the platform's string form.

use async_trait::async_trait;

use crate::error::WicketError;
use crate::types::{HistoryMessage, ThreadInfo, TranscriptDocument};

/// Operations Wicket consumes from the chat platform.
#[async_trait]
pub trait Platform: Send + Sync + 'static {
    /// Create a private thread under the given parent channel.
    async fn create_private_thread(
        &self,
        parent_channel_id: &str,
        name: &str,
    ) -> Result<ThreadInfo, WicketError>;

    /// Fetch name/parent metadata for an existing thread.
    async fn thread_info(&self, thread_id: &str) -> Result<ThreadInfo, WicketError>;

    async fn add_thread_member(&self, thread_id: &str, user_id: &str)
        -> Result<(), WicketError>;

    async fn remove_thread_member(
        &self,
        thread_id: &str,
        user_id: &str,
    ) -> Result<(), WicketError>;

    async fn archive_thread(&self, thread_id: &str) -> Result<(), WicketError>;

    async fn set_thread_locked(&self, thread_id: &str, locked: bool)
        -> Result<(), WicketError>;

    async fn is_thread_locked(&self, thread_id: &str) -> Result<bool, WicketError>;

    async fn delete_thread(&self, thread_id: &str) -> Result<(), WicketError>;

    /// Member ids holding the given role, in platform-provided order.
    async fn role_members(&self, role_id: &str) -> Result<Vec<String>, WicketError>;

    /// Retrieve the complete message history of a thread. Implementations
    /// paginate until exhaustion; no truncation. Order is unspecified.
    async fn fetch_history(&self, thread_id: &str)
        -> Result<Vec<HistoryMessage>, WicketError>;

    /// Post a plain announcement into a channel or thread.
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), WicketError>;

    /// Post the ticket welcome message with the persistent thread-control
    /// row into a freshly provisioned thread.
    async fn post_ticket_controls(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<(), WicketError>;

    /// Post a transcript document into a channel, with an introductory note.
    async fn post_document(
        &self,
        channel_id: &str,
        note: &str,
        doc: &TranscriptDocument,
    ) -> Result<(), WicketError>;

    /// Deliver a transcript document to a user by direct message.
    async fn dm_document(
        &self,
        user_id: &str,
        note: &str,
        doc: &TranscriptDocument,
    ) -> Result<(), WicketError>;

    /// Resolve a channel by exact name. Returns the channel id if found.
    async fn channel_by_name(&self, name: &str) -> Result<Option<String>, WicketError>;

    /// Whether the channel exists and can receive text messages.
    async fn is_text_channel(&self, channel_id: &str) -> Result<bool, WicketError>;
}
