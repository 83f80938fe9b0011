// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ticket state machine and the operations that drive transitions.
//!
//! Status moves forward only: `open -> closed -> deleted`, with
//! `open -> deleted` for administrative deletes. Claim and lock are
//! orthogonal attributes. Platform steps that are preconditions for a
//! transition (archive, delete) run before the store write, so the store
//! never records a transition that did not happen on the platform side.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use wicket_core::types::{Actor, TicketRecord, TicketStatus, TranscriptDocument};
use wicket_core::{Platform, TicketStore, WicketError};

use crate::guard::Guard;
use crate::transcript::{self, DeliveryOutcome};

/// Result of closing a ticket.
#[derive(Debug, Clone)]
pub struct CloseOutcome {
    pub record: TicketRecord,
    /// Where the close-time transcript went, if delivery succeeded.
    /// Delivery is best-effort on close; `None` means it failed and was
    /// logged.
    pub transcript: Option<DeliveryOutcome>,
}

/// Drives ticket state transitions against the platform and the store.
pub struct LifecycleEngine {
    platform: Arc<dyn Platform>,
    store: Arc<dyn TicketStore>,
    guard: Guard,
    default_transcript_channel: Option<String>,
}

impl LifecycleEngine {
    pub fn new(
        platform: Arc<dyn Platform>,
        store: Arc<dyn TicketStore>,
        guard: Guard,
        default_transcript_channel: Option<String>,
    ) -> Self {
        Self {
            platform,
            store,
            guard,
            default_transcript_channel,
        }
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    async fn require_ticket(&self, thread_id: &str) -> Result<TicketRecord, WicketError> {
        self.store
            .get_by_thread(thread_id)
            .await?
            .ok_or_else(|| WicketError::not_found(format!("no ticket for thread {thread_id}")))
    }

    /// Claim the ticket for the acting staff member. Re-claim overwrites.
    pub async fn claim(&self, actor: &Actor, thread_id: &str) -> Result<TicketRecord, WicketError> {
        let ticket = self.require_ticket(thread_id).await?;
        if !self.guard.can_claim(actor) {
            return Err(WicketError::denied("only staff can claim tickets"));
        }
        if ticket.status != TicketStatus::Open {
            return Err(WicketError::denied("this ticket is no longer open"));
        }

        self.store.set_claimed_by(thread_id, &actor.id).await?;

        if let Err(e) = self
            .platform
            .post_message(thread_id, &format!("✅ Ticket claimed by <@{}>", actor.id))
            .await
        {
            debug!(error = %e, thread = thread_id, "claim announcement failed");
        }

        self.require_ticket(thread_id).await
    }

    /// Close the ticket: archive the thread, then record `closed` with a
    /// `closed_at` stamp, then export the transcript to the configured
    /// destination (best-effort).
    ///
    /// Closing a ticket whose status is not `open` is rejected; the archive
    /// step is never repeated.
    pub async fn close(&self, actor: &Actor, thread_id: &str) -> Result<CloseOutcome, WicketError> {
        let ticket = self.require_ticket(thread_id).await?;
        if !self.guard.can_close(actor, &ticket) {
            return Err(WicketError::denied(
                "only the ticket creator or staff can close this ticket",
            ));
        }
        if ticket.status != TicketStatus::Open {
            return Err(WicketError::denied("this ticket is already closed"));
        }

        // Generate from the live thread before archival; archival must still
        // gate the store write.
        let document = self.build_document(thread_id).await.ok();

        self.platform.archive_thread(thread_id).await?;
        self.store
            .set_status(thread_id, TicketStatus::Closed, Some(Utc::now()))
            .await?;

        let transcript = match document {
            Some((note, doc)) => match transcript::deliver(
                self.platform.as_ref(),
                self.store.as_ref(),
                self.default_transcript_channel.as_deref(),
                &actor.id,
                &note,
                &doc,
            )
            .await
            {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    warn!(error = %e, thread = thread_id, "transcript delivery after close failed");
                    None
                }
            },
            None => None,
        };

        if let Err(e) = self
            .platform
            .post_message(thread_id, "Ticket closed and archived.")
            .await
        {
            debug!(error = %e, thread = thread_id, "close announcement failed");
        }

        let record = self.require_ticket(thread_id).await?;
        Ok(CloseOutcome { record, transcript })
    }

    /// Toggle the platform lock on the ticket thread. Returns the new state.
    pub async fn toggle_lock(&self, actor: &Actor, thread_id: &str) -> Result<bool, WicketError> {
        self.require_ticket(thread_id).await?;
        if !self.guard.can_lock(actor) {
            return Err(WicketError::denied("only staff can lock or unlock tickets"));
        }

        let locked = !self.platform.is_thread_locked(thread_id).await?;
        self.platform.set_thread_locked(thread_id, locked).await?;

        let verb = if locked { "locked" } else { "unlocked" };
        if let Err(e) = self
            .platform
            .post_message(thread_id, &format!("🔒 Ticket {verb} by <@{}>", actor.id))
            .await
        {
            debug!(error = %e, thread = thread_id, "lock announcement failed");
        }
        Ok(locked)
    }

    /// Add a member to the ticket thread. Thread-scoped; the router
    /// guarantees the interaction fired inside a thread.
    pub async fn add_participant(
        &self,
        actor: &Actor,
        thread_id: &str,
        user_id: &str,
    ) -> Result<(), WicketError> {
        if !self.guard.can_add(actor) {
            return Err(WicketError::denied("only staff can add members"));
        }
        self.platform.add_thread_member(thread_id, user_id).await
    }

    /// Remove a member from the ticket thread.
    pub async fn remove_participant(
        &self,
        actor: &Actor,
        thread_id: &str,
        user_id: &str,
    ) -> Result<(), WicketError> {
        if !self.guard.can_remove(actor) {
            return Err(WicketError::denied("only staff can remove members"));
        }
        self.platform.remove_thread_member(thread_id, user_id).await
    }

    /// Open the delete flow: verifies the ticket exists and the actor may
    /// delete. The actual mutation happens in [`confirm_delete`].
    pub async fn request_delete(&self, actor: &Actor, thread_id: &str) -> Result<(), WicketError> {
        self.require_ticket(thread_id).await?;
        if !self.guard.can_delete(actor) {
            return Err(WicketError::denied("only staff can delete tickets"));
        }
        Ok(())
    }

    /// Execute a confirmed delete. Authorization is re-evaluated here, not
    /// trusted from the initial request -- the staff role may have been
    /// revoked between the two steps.
    pub async fn confirm_delete(
        &self,
        actor: &Actor,
        thread_id: &str,
    ) -> Result<TicketRecord, WicketError> {
        let ticket = self.require_ticket(thread_id).await?;
        if !self.guard.can_delete(actor) {
            return Err(WicketError::denied("only staff can delete tickets"));
        }
        if ticket.status == TicketStatus::Deleted {
            return Err(WicketError::denied("this ticket is already deleted"));
        }

        self.platform.delete_thread(thread_id).await?;
        self.store
            .set_status(thread_id, TicketStatus::Deleted, Some(Utc::now()))
            .await?;

        self.require_ticket(thread_id).await
    }

    /// Generate and deliver a transcript on demand. Unlike the close-time
    /// export, delivery failure here surfaces to the requester.
    pub async fn transcript(
        &self,
        actor: &Actor,
        thread_id: &str,
    ) -> Result<DeliveryOutcome, WicketError> {
        let ticket = self.require_ticket(thread_id).await?;
        if !self.guard.can_request_transcript(actor, &ticket) {
            return Err(WicketError::denied(
                "only the ticket creator or staff can request transcripts",
            ));
        }

        let (note, doc) = self.build_document(thread_id).await?;
        transcript::deliver(
            self.platform.as_ref(),
            self.store.as_ref(),
            self.default_transcript_channel.as_deref(),
            &actor.id,
            &note,
            &doc,
        )
        .await
    }

    async fn build_document(
        &self,
        thread_id: &str,
    ) -> Result<(String, TranscriptDocument), WicketError> {
        let info = self.platform.thread_info(thread_id).await?;
        let messages = self.platform.fetch_history(thread_id).await?;
        let note = format!("📜 Transcript for ticket {} (id: {})", info.name, info.id);
        Ok((note, transcript::generate(&info, &messages, true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wicket_core::types::{NewTicket, TicketCategory};
    use wicket_test_utils::fixtures::STAFF_ROLE;
    use wicket_test_utils::{staff_actor, user_actor, Failures, MemoryTicketStore, MockPlatform};

    struct Fixture {
        platform: Arc<MockPlatform>,
        store: Arc<MemoryTicketStore>,
        engine: LifecycleEngine,
    }

    async fn fixture() -> Fixture {
        let platform = Arc::new(MockPlatform::new());
        let store = Arc::new(MemoryTicketStore::new());
        let guard = Guard::new(Some(STAFF_ROLE.to_string()));
        let engine = LifecycleEngine::new(platform.clone(), store.clone(), guard, None);

        platform.add_thread("100", "other-jane-1234", "200").await;
        store
            .create_ticket(NewTicket {
                thread_id: "100".into(),
                channel_id: "200".into(),
                creator_user_id: "300".into(),
                category: TicketCategory::Other,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        Fixture {
            platform,
            store,
            engine,
        }
    }

    #[tokio::test]
    async fn staff_can_claim_and_reclaim() {
        let f = fixture().await;

        let record = f.engine.claim(&staff_actor("1"), "100").await.unwrap();
        assert_eq!(record.claimed_by.as_deref(), Some("1"));

        let record = f.engine.claim(&staff_actor("2"), "100").await.unwrap();
        assert_eq!(record.claimed_by.as_deref(), Some("2"));

        let thread = f.platform.thread("100").await.unwrap();
        assert_eq!(thread.messages.len(), 2);
        assert!(thread.messages[0].contains("<@1>"));
    }

    #[tokio::test]
    async fn non_staff_cannot_claim_even_the_owner() {
        let f = fixture().await;
        let err = f.engine.claim(&user_actor("300"), "100").await.unwrap_err();
        assert!(matches!(err, WicketError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn claim_on_unknown_thread_is_not_found() {
        let f = fixture().await;
        let err = f.engine.claim(&staff_actor("1"), "999").await.unwrap_err();
        assert!(matches!(err, WicketError::NotFound { .. }));
    }

    #[tokio::test]
    async fn claim_on_closed_ticket_is_rejected() {
        let f = fixture().await;
        f.engine.close(&staff_actor("1"), "100").await.unwrap();
        let err = f.engine.claim(&staff_actor("1"), "100").await.unwrap_err();
        assert!(matches!(err, WicketError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn owner_close_archives_and_stamps() {
        let f = fixture().await;
        let outcome = f.engine.close(&user_actor("300"), "100").await.unwrap();

        assert_eq!(outcome.record.status, TicketStatus::Closed);
        assert!(outcome.record.closed_at.is_some());
        assert!(f.platform.thread("100").await.unwrap().archived);
        // No transcript channel configured: falls back to DMing the closer.
        assert_eq!(outcome.transcript, Some(DeliveryOutcome::DirectMessage));
        assert_eq!(f.platform.dm_documents().await[0].0, "300");
    }

    #[tokio::test]
    async fn close_posts_transcript_to_configured_channel() {
        let f = fixture().await;
        f.platform.add_channel("555", "transcripts", true).await;
        f.store
            .set_config(transcript::TRANSCRIPT_CHANNEL_KEY, "555")
            .await
            .unwrap();

        let outcome = f.engine.close(&staff_actor("1"), "100").await.unwrap();
        assert_eq!(
            outcome.transcript,
            Some(DeliveryOutcome::Posted { channel_id: "555".into() })
        );
        let posted = f.platform.posted_documents().await;
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].1.filename, "transcript-other-jane-1234-100.txt");
    }

    #[tokio::test]
    async fn stranger_cannot_close() {
        let f = fixture().await;
        let err = f.engine.close(&user_actor("400"), "100").await.unwrap_err();
        assert!(matches!(err, WicketError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn second_close_is_rejected_not_rearchived() {
        let f = fixture().await;
        f.engine.close(&staff_actor("1"), "100").await.unwrap();
        let err = f.engine.close(&staff_actor("1"), "100").await.unwrap_err();
        assert!(matches!(err, WicketError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn archive_failure_aborts_before_store_write() {
        let f = fixture().await;
        f.platform
            .set_failures(Failures {
                archive: true,
                ..Failures::default()
            })
            .await;

        let err = f.engine.close(&staff_actor("1"), "100").await.unwrap_err();
        assert!(matches!(err, WicketError::Platform { .. }));

        let ticket = f.store.get_by_thread("100").await.unwrap().unwrap();
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.closed_at.is_none());
    }

    #[tokio::test]
    async fn lock_toggles_and_announces() {
        let f = fixture().await;

        assert!(f.engine.toggle_lock(&staff_actor("1"), "100").await.unwrap());
        assert!(f.platform.thread("100").await.unwrap().locked);

        assert!(!f.engine.toggle_lock(&staff_actor("1"), "100").await.unwrap());
        assert!(!f.platform.thread("100").await.unwrap().locked);

        let thread = f.platform.thread("100").await.unwrap();
        assert!(thread.messages[0].contains("locked"));
        assert!(thread.messages[1].contains("unlocked"));
    }

    #[tokio::test]
    async fn lock_edit_failure_is_reported() {
        let f = fixture().await;
        f.platform
            .set_failures(Failures {
                lock_edit: true,
                ..Failures::default()
            })
            .await;
        let err = f
            .engine
            .toggle_lock(&staff_actor("1"), "100")
            .await
            .unwrap_err();
        assert!(matches!(err, WicketError::Platform { .. }));
    }

    #[tokio::test]
    async fn participants_are_staff_managed() {
        let f = fixture().await;

        f.engine
            .add_participant(&staff_actor("1"), "100", "777")
            .await
            .unwrap();
        assert!(f
            .platform
            .thread("100")
            .await
            .unwrap()
            .members
            .contains(&"777".to_string()));

        f.engine
            .remove_participant(&staff_actor("1"), "100", "777")
            .await
            .unwrap();
        assert!(!f
            .platform
            .thread("100")
            .await
            .unwrap()
            .members
            .contains(&"777".to_string()));

        let err = f
            .engine
            .add_participant(&user_actor("300"), "100", "777")
            .await
            .unwrap_err();
        assert!(matches!(err, WicketError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn confirmed_delete_removes_thread_and_marks_record() {
        let f = fixture().await;

        f.engine
            .request_delete(&staff_actor("1"), "100")
            .await
            .unwrap();
        let record = f
            .engine
            .confirm_delete(&staff_actor("1"), "100")
            .await
            .unwrap();

        assert_eq!(record.status, TicketStatus::Deleted);
        assert!(record.closed_at.is_some());
        assert!(f.platform.thread("100").await.unwrap().deleted);
    }

    #[tokio::test]
    async fn confirm_reevaluates_authorization() {
        let f = fixture().await;
        // Request as staff, confirm as someone whose role was revoked.
        f.engine
            .request_delete(&staff_actor("1"), "100")
            .await
            .unwrap();
        let err = f
            .engine
            .confirm_delete(&user_actor("1"), "100")
            .await
            .unwrap_err();
        assert!(matches!(err, WicketError::PermissionDenied { .. }));

        let ticket = f.store.get_by_thread("100").await.unwrap().unwrap();
        assert_eq!(ticket.status, TicketStatus::Open);
    }

    #[tokio::test]
    async fn delete_failure_leaves_record_untouched() {
        let f = fixture().await;
        f.platform
            .set_failures(Failures {
                delete: true,
                ..Failures::default()
            })
            .await;
        let err = f
            .engine
            .confirm_delete(&staff_actor("1"), "100")
            .await
            .unwrap_err();
        assert!(matches!(err, WicketError::Platform { .. }));

        let ticket = f.store.get_by_thread("100").await.unwrap().unwrap();
        assert_eq!(ticket.status, TicketStatus::Open);
    }

    #[tokio::test]
    async fn closed_ticket_can_still_be_deleted() {
        let f = fixture().await;
        f.engine.close(&staff_actor("1"), "100").await.unwrap();
        let record = f
            .engine
            .confirm_delete(&staff_actor("1"), "100")
            .await
            .unwrap();
        assert_eq!(record.status, TicketStatus::Deleted);
    }

    #[tokio::test]
    async fn on_demand_transcript_respects_authorization() {
        let f = fixture().await;

        let outcome = f.engine.transcript(&user_actor("300"), "100").await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::DirectMessage);

        let err = f
            .engine
            .transcript(&user_actor("400"), "100")
            .await
            .unwrap_err();
        assert!(matches!(err, WicketError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn on_demand_transcript_surfaces_delivery_failure() {
        let f = fixture().await;
        f.platform
            .set_failures(Failures {
                dm_document: true,
                ..Failures::default()
            })
            .await;
        let err = f
            .engine
            .transcript(&user_actor("300"), "100")
            .await
            .unwrap_err();
        assert!(matches!(err, WicketError::DeliveryFailure { .. }));
    }
}
