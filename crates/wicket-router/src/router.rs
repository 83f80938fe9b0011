// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tag-table dispatch for interactions.
//!
//! The router owns the one fixed mapping from control tag to behavior,
//! registered once at process start. Dispatch re-derives all per-ticket
//! context from the store via the thread the interaction fired in, applies
//! the authorization guard, invokes the engine, and always produces
//! exactly one reply -- errors included.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use strum::IntoEnumIterator;
use tracing::{debug, error, warn};

use wicket_core::types::TicketCategory;
use wicket_core::{Platform, TicketStore, WicketError};
use wicket_tickets::transcript::TRANSCRIPT_CHANNEL_KEY;
use wicket_tickets::{DeliveryOutcome, LifecycleEngine, ProvisionEngine};

use crate::channelref::resolve_text_channel;
use crate::context::{InteractionContext, Payload, Reply};
use crate::tags::ControlTag;

/// Stateless interaction router.
pub struct Router {
    platform: Arc<dyn Platform>,
    store: Arc<dyn TicketStore>,
    lifecycle: LifecycleEngine,
    provision: ProvisionEngine,
    staff_role_id: Option<String>,
    registered: HashSet<ControlTag>,
}

impl Router {
    pub fn new(
        platform: Arc<dyn Platform>,
        store: Arc<dyn TicketStore>,
        lifecycle: LifecycleEngine,
        provision: ProvisionEngine,
        staff_role_id: Option<String>,
    ) -> Self {
        Self {
            platform,
            store,
            lifecycle,
            provision,
            staff_role_id,
            registered: HashSet::new(),
        }
    }

    /// Register the full control-tag table. Called once at process start;
    /// this is all the state a control needs to keep working across
    /// restarts.
    pub fn register_templates(&mut self) {
        self.registered = ControlTag::iter().collect();
    }

    /// Parse a wire tag against the registered table.
    pub fn parse_tag(&self, raw: &str) -> Result<ControlTag, WicketError> {
        ControlTag::from_str(raw)
            .ok()
            .filter(|tag| self.registered.contains(tag))
            .ok_or_else(|| WicketError::UnroutableInteraction {
                tag: raw.to_string(),
            })
    }

    /// Dispatch an interaction. Never fails outward: every error becomes
    /// the denial or failure reply the actor sees.
    pub async fn dispatch(&self, raw_tag: &str, cx: InteractionContext) -> Reply {
        match self.try_dispatch(raw_tag, &cx).await {
            Ok(reply) => reply,
            Err(err) => reply_for_error(raw_tag, err),
        }
    }

    async fn try_dispatch(
        &self,
        raw_tag: &str,
        cx: &InteractionContext,
    ) -> Result<Reply, WicketError> {
        let tag = self.parse_tag(raw_tag)?;
        debug!(tag = %tag, actor = %cx.actor.id, channel = %cx.channel_id, "dispatching interaction");
        match tag {
            ControlTag::TicketSelect => self.handle_select(cx).await,
            ControlTag::TicketClose => self.handle_close(cx).await,
            ControlTag::TicketClaim => self.handle_claim(cx).await,
            ControlTag::TicketTranscript => self.handle_transcript(cx).await,
            ControlTag::TicketLock => self.handle_lock(cx).await,
            ControlTag::TicketAdd => self.handle_membership(cx, true).await,
            ControlTag::TicketRemove => self.handle_membership(cx, false).await,
            ControlTag::AdminPanel => self.handle_admin_panel(cx),
            ControlTag::AdminDeleteThread => self.handle_delete_request(cx).await,
            ControlTag::AdminConfirmDelete => self.handle_confirm_delete(cx).await,
            ControlTag::AdminCancelDelete => Ok(Reply::ephemeral(
                "Cancelled",
                "The ticket was not deleted.",
            )),
            ControlTag::AdminSetTranscriptChannel => self.handle_open_channel_modal(cx),
            ControlTag::AdminTranscriptChannelModal => self.handle_channel_modal(cx).await,
        }
    }

    /// The thread this interaction fired in, for thread-scoped operations.
    fn require_thread<'a>(&self, cx: &'a InteractionContext) -> Result<&'a str, WicketError> {
        cx.thread_id
            .as_deref()
            .ok_or_else(|| WicketError::not_found("this only works inside a ticket thread"))
    }

    async fn handle_select(&self, cx: &InteractionContext) -> Result<Reply, WicketError> {
        let Payload::Select { value } = &cx.payload else {
            return Err(WicketError::Internal("select interaction without a value".into()));
        };
        let category = TicketCategory::from_str(value)
            .map_err(|_| WicketError::Internal(format!("unknown ticket category `{value}`")))?;

        let outcome = self
            .provision
            .provision(category, &cx.actor, &cx.channel_id)
            .await?;

        let mut welcome = format!(
            "Hello <@{}>, thanks for your ticket ({}). A staff member will be with you shortly.",
            cx.actor.id,
            category.label()
        );
        if outcome.fallback_mention_needed {
            if let Some(role) = &self.staff_role_id {
                welcome.push_str(&format!(
                    "\n\nTagging <@&{role}> so the rest of the team sees this."
                ));
            }
        }
        if let Err(e) = self
            .platform
            .post_ticket_controls(&outcome.thread.id, &welcome)
            .await
        {
            warn!(error = %e, thread = %outcome.thread.id, "welcome message failed");
        }

        Ok(Reply::ephemeral(
            "Ticket created",
            format!("Your ticket has been created: <#{}>", outcome.thread.id),
        ))
    }

    async fn handle_close(&self, cx: &InteractionContext) -> Result<Reply, WicketError> {
        let thread_id = self.require_thread(cx)?;
        let outcome = self.lifecycle.close(&cx.actor, thread_id).await?;
        let body = match outcome.transcript {
            Some(DeliveryOutcome::Posted { channel_id }) => {
                format!("Ticket closed. Transcript posted in <#{channel_id}>.")
            }
            Some(DeliveryOutcome::DirectMessage) => {
                "Ticket closed. Transcript sent to you by direct message.".to_string()
            }
            None => "Ticket closed.".to_string(),
        };
        Ok(Reply::ephemeral("Closed", body))
    }

    async fn handle_claim(&self, cx: &InteractionContext) -> Result<Reply, WicketError> {
        let thread_id = self.require_thread(cx)?;
        self.lifecycle.claim(&cx.actor, thread_id).await?;
        Ok(Reply::ephemeral(
            "Ticket claimed",
            format!("<@{}> has taken this ticket.", cx.actor.id),
        ))
    }

    async fn handle_transcript(&self, cx: &InteractionContext) -> Result<Reply, WicketError> {
        let thread_id = self.require_thread(cx)?;
        let outcome = self.lifecycle.transcript(&cx.actor, thread_id).await?;
        let body = match outcome {
            DeliveryOutcome::Posted { channel_id } => {
                format!("Transcript posted in <#{channel_id}>.")
            }
            DeliveryOutcome::DirectMessage => {
                "Transcript sent to you by direct message.".to_string()
            }
        };
        Ok(Reply::ephemeral("Transcript", body))
    }

    async fn handle_lock(&self, cx: &InteractionContext) -> Result<Reply, WicketError> {
        let thread_id = self.require_thread(cx)?;
        let locked = self.lifecycle.toggle_lock(&cx.actor, thread_id).await?;
        let body = if locked {
            "Ticket locked."
        } else {
            "Ticket unlocked."
        };
        Ok(Reply::ephemeral("Done", body))
    }

    async fn handle_membership(
        &self,
        cx: &InteractionContext,
        add: bool,
    ) -> Result<Reply, WicketError> {
        let thread_id = self.require_thread(cx)?;
        let Payload::Member { user_id } = &cx.payload else {
            return Err(WicketError::Internal("membership command without a member".into()));
        };
        if add {
            self.lifecycle
                .add_participant(&cx.actor, thread_id, user_id)
                .await?;
            Ok(Reply::ephemeral(
                "Added",
                format!("<@{user_id}> was added to the ticket."),
            ))
        } else {
            self.lifecycle
                .remove_participant(&cx.actor, thread_id, user_id)
                .await?;
            Ok(Reply::ephemeral(
                "Removed",
                format!("<@{user_id}> was removed from the ticket."),
            ))
        }
    }

    fn handle_admin_panel(&self, cx: &InteractionContext) -> Result<Reply, WicketError> {
        if !self.lifecycle.guard().can_open_admin_panel(&cx.actor) {
            return Err(WicketError::denied("only staff can open the admin panel"));
        }
        Ok(Reply::AdminPanel {
            title: "Admin panel".to_string(),
            body: "Manage this ticket or the transcript destination.".to_string(),
        })
    }

    async fn handle_delete_request(&self, cx: &InteractionContext) -> Result<Reply, WicketError> {
        let thread_id = self.require_thread(cx)?;
        self.lifecycle.request_delete(&cx.actor, thread_id).await?;
        Ok(Reply::ConfirmDelete {
            title: "Delete this ticket?".to_string(),
            body: "This permanently deletes the thread. The confirmation below expires after a minute."
                .to_string(),
        })
    }

    async fn handle_confirm_delete(&self, cx: &InteractionContext) -> Result<Reply, WicketError> {
        let thread_id = self.require_thread(cx)?;
        self.lifecycle.confirm_delete(&cx.actor, thread_id).await?;
        Ok(Reply::ephemeral("Deleted", "Ticket thread deleted."))
    }

    fn handle_open_channel_modal(&self, cx: &InteractionContext) -> Result<Reply, WicketError> {
        if !self.lifecycle.guard().can_open_admin_panel(&cx.actor) {
            return Err(WicketError::denied(
                "only staff can change the transcript channel",
            ));
        }
        Ok(Reply::TranscriptChannelModal)
    }

    async fn handle_channel_modal(&self, cx: &InteractionContext) -> Result<Reply, WicketError> {
        if !self.lifecycle.guard().can_open_admin_panel(&cx.actor) {
            return Err(WicketError::denied(
                "only staff can change the transcript channel",
            ));
        }
        let Payload::Text { value } = &cx.payload else {
            return Err(WicketError::Internal("modal submit without input text".into()));
        };

        let channel_id = resolve_text_channel(self.platform.as_ref(), value).await?;
        self.store
            .set_config(TRANSCRIPT_CHANNEL_KEY, &channel_id)
            .await?;
        Ok(Reply::ephemeral(
            "Transcript channel set",
            format!("Transcripts will be posted in <#{channel_id}>."),
        ))
    }
}

/// Convert a handler error into the one reply the actor sees.
fn reply_for_error(tag: &str, err: WicketError) -> Reply {
    match &err {
        WicketError::PermissionDenied { action } => {
            debug!(tag, %err, "interaction denied");
            Reply::ephemeral("Permission denied", action.clone())
        }
        WicketError::NotFound { what } => {
            debug!(tag, %err, "interaction target missing");
            Reply::ephemeral("Not available", what.clone())
        }
        WicketError::Provision { message } => {
            warn!(tag, %err, "ticket provisioning failed");
            Reply::ephemeral("Could not create ticket", message.clone())
        }
        WicketError::InvalidChannelReference { input } => Reply::ephemeral(
            "Invalid channel",
            format!("`{input}` is not a text channel I can post to."),
        ),
        WicketError::DeliveryFailure { message } => {
            warn!(tag, %err, "transcript delivery failed");
            Reply::ephemeral("Transcript not delivered", message.clone())
        }
        WicketError::UnroutableInteraction { .. } => {
            error!(tag, %err, "unroutable interaction");
            Reply::ephemeral("Something went wrong", "This control is not recognized.")
        }
        _ => {
            error!(tag, %err, "interaction handler failed");
            Reply::ephemeral(
                "Something went wrong",
                "An unexpected error occurred. Please try again.",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wicket_test_utils::fixtures::STAFF_ROLE;
    use wicket_test_utils::{staff_actor, user_actor, MemoryTicketStore, MockPlatform};
    use wicket_tickets::Guard;

    fn build_router(platform: Arc<MockPlatform>, store: Arc<MemoryTicketStore>) -> Router {
        let guard = Guard::new(Some(STAFF_ROLE.to_string()));
        let lifecycle = LifecycleEngine::new(platform.clone(), store.clone(), guard, None);
        let provision = ProvisionEngine::new(
            platform.clone(),
            store.clone(),
            Some(STAFF_ROLE.to_string()),
            20,
            Duration::ZERO,
        );
        let mut router = Router::new(
            platform,
            store,
            lifecycle,
            provision,
            Some(STAFF_ROLE.to_string()),
        );
        router.register_templates();
        router
    }

    async fn open_ticket(router: &Router, platform: &MockPlatform) -> String {
        let cx = InteractionContext::in_channel(user_actor("300"), "200")
            .with_payload(Payload::Select {
                value: "other".into(),
            });
        let reply = router.dispatch("ticket_select", cx).await;
        let Reply::Ephemeral { title, body } = reply else {
            panic!("expected ephemeral reply");
        };
        assert_eq!(title, "Ticket created");
        // Extract the thread mention <#id> from the confirmation.
        let id = body
            .rsplit("<#")
            .next()
            .and_then(|rest| rest.strip_suffix('>'))
            .expect("thread mention in reply")
            .to_string();
        assert!(platform.thread(&id).await.is_some());
        id
    }

    #[tokio::test]
    async fn unknown_tag_is_acknowledged_with_generic_failure() {
        let platform = Arc::new(MockPlatform::new());
        let store = Arc::new(MemoryTicketStore::new());
        let router = build_router(platform, store);

        let cx = InteractionContext::in_channel(user_actor("300"), "200");
        let reply = router.dispatch("ticket_reopen", cx).await;
        assert_eq!(
            reply,
            Reply::ephemeral("Something went wrong", "This control is not recognized.")
        );
    }

    #[tokio::test]
    async fn unregistered_tag_is_unroutable() {
        let platform = Arc::new(MockPlatform::new());
        let store = Arc::new(MemoryTicketStore::new());
        let guard = Guard::new(Some(STAFF_ROLE.to_string()));
        let lifecycle = LifecycleEngine::new(platform.clone(), store.clone(), guard, None);
        let provision = ProvisionEngine::new(
            platform.clone(),
            store.clone(),
            None,
            20,
            Duration::ZERO,
        );
        // register_templates() never called.
        let router = Router::new(platform, store, lifecycle, provision, None);
        assert!(router.parse_tag("ticket_close").is_err());
    }

    #[tokio::test]
    async fn select_provisions_and_posts_welcome_with_controls() {
        let platform = Arc::new(MockPlatform::new());
        platform
            .set_role_members(STAFF_ROLE, vec!["1".into(), "2".into()])
            .await;
        let store = Arc::new(MemoryTicketStore::new());
        let router = build_router(platform.clone(), store.clone());

        let thread_id = open_ticket(&router, &platform).await;

        let thread = platform.thread(&thread_id).await.unwrap();
        assert_eq!(thread.control_messages.len(), 1);
        assert!(thread.control_messages[0].contains("<@300>"));
        // 2 staff members, well under the limit: no role mention.
        assert!(!thread.control_messages[0].contains("<@&"));

        let record = store.get_by_thread(&thread_id).await.unwrap().unwrap();
        assert_eq!(record.creator_user_id, "300");
    }

    #[tokio::test]
    async fn overflowing_staff_role_tags_the_role_in_the_welcome() {
        let platform = Arc::new(MockPlatform::new());
        let members = (0..25).map(|i| format!("s{i}")).collect();
        platform.set_role_members(STAFF_ROLE, members).await;
        let store = Arc::new(MemoryTicketStore::new());
        let router = build_router(platform.clone(), store);

        let thread_id = open_ticket(&router, &platform).await;
        let thread = platform.thread(&thread_id).await.unwrap();
        assert!(thread.control_messages[0].contains(&format!("<@&{STAFF_ROLE}>")));
    }

    #[tokio::test]
    async fn thread_scoped_controls_reject_plain_channels() {
        let platform = Arc::new(MockPlatform::new());
        let store = Arc::new(MemoryTicketStore::new());
        let router = build_router(platform, store);

        let cx = InteractionContext::in_channel(staff_actor("1"), "200");
        let reply = router.dispatch("ticket_close", cx).await;
        let Reply::Ephemeral { title, .. } = reply else {
            panic!("expected ephemeral reply");
        };
        assert_eq!(title, "Not available");
    }

    #[tokio::test]
    async fn close_denial_reaches_the_actor_as_a_reply() {
        let platform = Arc::new(MockPlatform::new());
        let store = Arc::new(MemoryTicketStore::new());
        let router = build_router(platform.clone(), store);
        let thread_id = open_ticket(&router, &platform).await;

        let cx = InteractionContext::in_thread(user_actor("400"), thread_id);
        let reply = router.dispatch("ticket_close", cx).await;
        let Reply::Ephemeral { title, .. } = reply else {
            panic!("expected ephemeral reply");
        };
        assert_eq!(title, "Permission denied");
    }

    #[tokio::test]
    async fn controls_survive_a_process_restart() {
        let platform = Arc::new(MockPlatform::new());
        let store = Arc::new(MemoryTicketStore::new());

        // First process: open a ticket through the select control.
        let thread_id = {
            let router = build_router(platform.clone(), store.clone());
            open_ticket(&router, &platform).await
        };

        // "Restart": a brand-new router with no in-memory carryover beyond
        // the durable store. The old welcome message's close button carries
        // only the class tag; the thread context re-identifies the ticket.
        let router = build_router(platform.clone(), store.clone());
        let cx = InteractionContext::in_thread(staff_actor("1"), thread_id.clone());
        let reply = router.dispatch("ticket_close", cx).await;
        let Reply::Ephemeral { title, .. } = reply else {
            panic!("expected ephemeral reply");
        };
        assert_eq!(title, "Closed");
        assert!(platform.thread(&thread_id).await.unwrap().archived);
    }

    #[tokio::test]
    async fn admin_panel_is_staff_gated() {
        let platform = Arc::new(MockPlatform::new());
        let store = Arc::new(MemoryTicketStore::new());
        let router = build_router(platform, store);

        let reply = router
            .dispatch(
                "admin_panel",
                InteractionContext::in_channel(staff_actor("1"), "200"),
            )
            .await;
        assert!(matches!(reply, Reply::AdminPanel { .. }));

        let reply = router
            .dispatch(
                "admin_panel",
                InteractionContext::in_channel(user_actor("300"), "200"),
            )
            .await;
        let Reply::Ephemeral { title, .. } = reply else {
            panic!("expected ephemeral reply");
        };
        assert_eq!(title, "Permission denied");
    }

    #[tokio::test]
    async fn delete_flow_requires_confirm_to_mutate() {
        let platform = Arc::new(MockPlatform::new());
        let store = Arc::new(MemoryTicketStore::new());
        let router = build_router(platform.clone(), store.clone());
        let thread_id = open_ticket(&router, &platform).await;

        let reply = router
            .dispatch(
                "admin_delete_thread",
                InteractionContext::in_thread(staff_actor("1"), thread_id.clone()),
            )
            .await;
        assert!(matches!(reply, Reply::ConfirmDelete { .. }));
        // Nothing deleted yet.
        assert!(!platform.thread(&thread_id).await.unwrap().deleted);

        let reply = router
            .dispatch(
                "admin_cancel_delete",
                InteractionContext::in_thread(staff_actor("1"), thread_id.clone()),
            )
            .await;
        assert_eq!(reply, Reply::ephemeral("Cancelled", "The ticket was not deleted."));
        assert!(!platform.thread(&thread_id).await.unwrap().deleted);

        let reply = router
            .dispatch(
                "admin_confirm_delete",
                InteractionContext::in_thread(staff_actor("1"), thread_id.clone()),
            )
            .await;
        assert_eq!(reply, Reply::ephemeral("Deleted", "Ticket thread deleted."));
        assert!(platform.thread(&thread_id).await.unwrap().deleted);
    }

    #[tokio::test]
    async fn transcript_channel_modal_round_trip() {
        let platform = Arc::new(MockPlatform::new());
        platform.add_channel("555", "transcripts", true).await;
        let store = Arc::new(MemoryTicketStore::new());
        let router = build_router(platform, store.clone());

        let reply = router
            .dispatch(
                "admin_set_transcript_channel",
                InteractionContext::in_channel(staff_actor("1"), "200"),
            )
            .await;
        assert_eq!(reply, Reply::TranscriptChannelModal);

        let cx = InteractionContext::in_channel(staff_actor("1"), "200").with_payload(
            Payload::Text {
                value: "#transcripts".into(),
            },
        );
        let reply = router.dispatch("admin_transcript_channel_modal", cx).await;
        let Reply::Ephemeral { title, .. } = reply else {
            panic!("expected ephemeral reply");
        };
        assert_eq!(title, "Transcript channel set");
        assert_eq!(
            store.get_config(TRANSCRIPT_CHANNEL_KEY).await.unwrap().as_deref(),
            Some("555")
        );
    }

    #[tokio::test]
    async fn bad_channel_reference_in_modal_is_rejected() {
        let platform = Arc::new(MockPlatform::new());
        let store = Arc::new(MemoryTicketStore::new());
        let router = build_router(platform, store.clone());

        let cx = InteractionContext::in_channel(staff_actor("1"), "200").with_payload(
            Payload::Text {
                value: "<#garbage".into(),
            },
        );
        let reply = router.dispatch("admin_transcript_channel_modal", cx).await;
        let Reply::Ephemeral { title, .. } = reply else {
            panic!("expected ephemeral reply");
        };
        assert_eq!(title, "Invalid channel");
        assert!(store.get_config(TRANSCRIPT_CHANNEL_KEY).await.unwrap().is_none());
    }
}
