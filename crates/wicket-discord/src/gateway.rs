// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway event handler: command registration at `ready`, interaction
//! acknowledgment, and dispatch into the router.
//!
//! Acknowledgment discipline: every interaction gets exactly one response.
//! Slow tags are deferred first and answered with a followup; modal tags
//! are answered with the modal as the first response.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{
    ActionRowComponent, ChannelId, ChannelType, Command, CommandInteraction, ComponentInteraction,
    ComponentInteractionDataKind, Context, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, CreateMessage,
    EditInteractionResponse, EventHandler, GuildId, Interaction, Member, ModalInteraction,
    PartialChannel, Ready, User,
};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use wicket_config::WicketConfig;
use wicket_core::types::Actor;
use wicket_core::{Platform, TicketStore};
use wicket_router::{InteractionContext, Payload, Reply, Router};
use wicket_tickets::{Guard, LifecycleEngine, ProvisionEngine};

use crate::commands;
use crate::components;
use crate::platform::SerenityPlatform;

/// How long the delete confirm/cancel pair stays live before it is retired.
const CONFIRM_LIFETIME: Duration = Duration::from_secs(60);

/// Serenity event handler carrying the bot's wiring.
///
/// The router is built at `ready` (it needs the gateway's HTTP handle) and
/// lives for the process; reconnects reuse it.
pub struct Handler {
    config: WicketConfig,
    guild_id: GuildId,
    store: Arc<dyn TicketStore>,
    router: OnceCell<Arc<Router>>,
}

impl Handler {
    pub fn new(config: WicketConfig, guild_id: GuildId, store: Arc<dyn TicketStore>) -> Self {
        Self {
            config,
            guild_id,
            store,
            router: OnceCell::new(),
        }
    }

    fn build_router(&self, ctx: &Context) -> Router {
        let platform: Arc<dyn Platform> =
            Arc::new(SerenityPlatform::new(ctx.http.clone(), self.guild_id));
        let staff_role = self.config.bot.staff_role_id.map(|id| id.to_string());
        let guard = Guard::new(staff_role.clone());
        let lifecycle = LifecycleEngine::new(
            platform.clone(),
            self.store.clone(),
            guard,
            self.config
                .tickets
                .transcript_channel_id
                .map(|id| id.to_string()),
        );
        let provision = ProvisionEngine::new(
            platform.clone(),
            self.store.clone(),
            staff_role.clone(),
            self.config.tickets.staff_add_limit,
            Duration::from_millis(self.config.tickets.add_pace_ms),
        );
        let mut router = Router::new(platform, self.store.clone(), lifecycle, provision, staff_role);
        router.register_templates();
        router
    }

    async fn on_command(&self, ctx: &Context, router: &Router, cmd: CommandInteraction) {
        if cmd.guild_id != Some(self.guild_id) {
            respond_embed(
                ctx,
                &cmd,
                "Wrong guild",
                "This command only works in the configured guild.",
            )
            .await;
            return;
        }

        let name = cmd.data.name.clone();
        if name == "ticket_setup" {
            self.on_ticket_setup(ctx, cmd).await;
            return;
        }

        let actor = actor_from(cmd.member.as_deref(), &cmd.user);
        let (channel_id, thread_id) = thread_context(cmd.channel.as_ref(), cmd.channel_id);
        let cx = InteractionContext {
            actor,
            channel_id,
            thread_id,
            payload: commands::payload_for(&cmd),
        };

        let defer = router
            .parse_tag(&name)
            .map(|t| t.wants_deferred_ack())
            .unwrap_or(false);
        if defer {
            if let Err(e) = cmd
                .create_response(&ctx.http, deferred_ack())
                .await
            {
                warn!(error = %e, command = %name, "could not defer interaction");
                return;
            }
            let reply = router.dispatch(&name, cx).await;
            if let Err(e) = cmd.create_followup(&ctx.http, followup_for(&reply)).await {
                warn!(error = %e, command = %name, "could not send followup");
            }
        } else {
            let reply = router.dispatch(&name, cx).await;
            if let Err(e) = cmd
                .create_response(&ctx.http, response_for(&reply))
                .await
            {
                warn!(error = %e, command = %name, "could not respond to interaction");
            }
        }
    }

    async fn on_component(&self, ctx: &Context, router: &Router, comp: ComponentInteraction) {
        let tag = comp.data.custom_id.clone();
        let payload = match &comp.data.kind {
            ComponentInteractionDataKind::StringSelect { values } => values
                .first()
                .map(|v| Payload::Select { value: v.clone() })
                .unwrap_or(Payload::None),
            _ => Payload::None,
        };
        let actor = actor_from(comp.member.as_ref(), &comp.user);
        let (channel_id, thread_id) = thread_context(comp.channel.as_ref(), comp.channel_id);
        let cx = InteractionContext {
            actor,
            channel_id,
            thread_id,
            payload,
        };

        let defer = router
            .parse_tag(&tag)
            .map(|t| t.wants_deferred_ack())
            .unwrap_or(false);
        if defer {
            if let Err(e) = comp.create_response(&ctx.http, deferred_ack()).await {
                warn!(error = %e, tag = %tag, "could not defer interaction");
                return;
            }
            let reply = router.dispatch(&tag, cx).await;
            if let Err(e) = comp.create_followup(&ctx.http, followup_for(&reply)).await {
                warn!(error = %e, tag = %tag, "could not send followup");
            }
        } else {
            let reply = router.dispatch(&tag, cx).await;
            let response = match &reply {
                Reply::TranscriptChannelModal => {
                    CreateInteractionResponse::Modal(components::transcript_channel_modal())
                }
                other => response_for(other),
            };
            if let Err(e) = comp.create_response(&ctx.http, response).await {
                warn!(error = %e, tag = %tag, "could not respond to interaction");
                return;
            }
            if matches!(reply, Reply::ConfirmDelete { .. }) {
                retire_confirm_later(ctx, comp);
            }
        }
    }

    async fn on_modal(&self, ctx: &Context, router: &Router, modal: ModalInteraction) {
        let tag = modal.data.custom_id.clone();
        let mut text = None;
        for row in &modal.data.components {
            for component in &row.components {
                if let ActionRowComponent::InputText(input) = component {
                    if let Some(value) = &input.value {
                        text = Some(value.clone());
                    }
                }
            }
        }
        let actor = actor_from(modal.member.as_ref(), &modal.user);
        let (channel_id, thread_id) = thread_context(modal.channel.as_ref(), modal.channel_id);
        let cx = InteractionContext {
            actor,
            channel_id,
            thread_id,
            payload: text
                .map(|value| Payload::Text { value })
                .unwrap_or(Payload::None),
        };

        let reply = router.dispatch(&tag, cx).await;
        if let Err(e) = modal.create_response(&ctx.http, response_for(&reply)).await {
            warn!(error = %e, tag = %tag, "could not respond to modal submit");
        }
    }

    /// `ticket_setup` stays in the adapter: it checks the bot's own
    /// permissions in the target channel and posts the select menu.
    async fn on_ticket_setup(&self, ctx: &Context, cmd: CommandInteraction) {
        let Some(target) = commands::channel_option(&cmd) else {
            respond_embed(ctx, &cmd, "Missing channel", "Pick a channel to post the menu into.")
                .await;
            return;
        };

        let channel = match target.to_channel(&ctx.http).await.ok().and_then(|c| c.guild()) {
            Some(channel) if channel.kind == ChannelType::Text => channel,
            _ => {
                respond_embed(
                    ctx,
                    &cmd,
                    "Invalid channel",
                    "The ticket menu can only be posted into a text channel.",
                )
                .await;
                return;
            }
        };

        let bot_id = ctx.cache.current_user().id;
        let perms = match channel.permissions_for_user(&ctx.cache, bot_id) {
            Ok(perms) => perms,
            Err(e) => {
                warn!(error = %e, "could not compute bot permissions");
                respond_embed(ctx, &cmd, "Error", "Could not check my permissions there.").await;
                return;
            }
        };
        if !(perms.send_messages()
            && perms.create_private_threads()
            && perms.read_message_history())
        {
            respond_embed(
                ctx,
                &cmd,
                "Missing permissions",
                "I need Send Messages, Create Private Threads, and Read Message History in that channel.",
            )
            .await;
            return;
        }

        let menu = CreateMessage::new()
            .embed(components::make_embed(
                "Make a selection",
                "Choose the appropriate option to open a ticket.",
            ))
            .components(vec![components::category_select_row()]);
        match channel.id.send_message(&ctx.http, menu).await {
            Ok(_) => {
                respond_embed(
                    ctx,
                    &cmd,
                    "Posted",
                    &format!("Ticket menu posted in <#{}>.", channel.id),
                )
                .await;
            }
            Err(e) => {
                warn!(error = %e, channel = %channel.id, "could not post ticket menu");
                respond_embed(ctx, &cmd, "Error", "Could not post the ticket menu there.").await;
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "connected to the gateway");

        if self.router.set(Arc::new(self.build_router(&ctx))).is_err() {
            debug!("router already initialized (gateway reconnect)");
        }

        // Guild-scoped sync for fast iteration, global sync as fallback.
        match self
            .guild_id
            .set_commands(&ctx.http, commands::command_definitions())
            .await
        {
            Ok(registered) => info!(count = registered.len(), "guild commands synced"),
            Err(e) => {
                warn!(error = %e, "guild command sync failed, trying global sync");
                if let Err(e) =
                    Command::set_global_commands(&ctx.http, commands::command_definitions()).await
                {
                    error!(error = %e, "global command sync failed");
                }
            }
        }

        if let Some(channel_id) = self.config.bot.post_channel_id {
            let menu = CreateMessage::new()
                .embed(components::make_embed(
                    "Make a selection",
                    "Choose the appropriate option to open a ticket.",
                ))
                .components(vec![components::category_select_row()]);
            match ChannelId::new(channel_id).send_message(&ctx.http, menu).await {
                Ok(_) => info!(channel = channel_id, "ticket menu auto-posted"),
                Err(e) => warn!(error = %e, channel = channel_id, "could not auto-post ticket menu"),
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Some(router) = self.router.get().cloned() else {
            warn!("interaction received before ready; dropping");
            return;
        };
        match interaction {
            Interaction::Command(cmd) => self.on_command(&ctx, &router, cmd).await,
            Interaction::Component(comp) => self.on_component(&ctx, &router, comp).await,
            Interaction::Modal(modal) => self.on_modal(&ctx, &router, modal).await,
            _ => {}
        }
    }
}

/// Build the actor from the interaction's member/user pair.
fn actor_from(member: Option<&Member>, user: &User) -> Actor {
    let is_admin = member
        .and_then(|m| m.permissions)
        .map(|p| p.administrator())
        .unwrap_or(false);
    let role_ids = member
        .map(|m| m.roles.iter().map(|r| r.to_string()).collect())
        .unwrap_or_default();
    Actor {
        id: user.id.to_string(),
        display_name: member
            .map(|m| m.display_name().to_string())
            .unwrap_or_else(|| user.name.clone()),
        is_admin,
        role_ids,
    }
}

/// Split the interaction's channel into (channel_id, thread context).
fn thread_context(
    channel: Option<&PartialChannel>,
    channel_id: ChannelId,
) -> (String, Option<String>) {
    let is_thread = channel
        .map(|c| {
            matches!(
                c.kind,
                ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::NewsThread
            )
        })
        .unwrap_or(false);
    let id = channel_id.to_string();
    if is_thread {
        (id.clone(), Some(id))
    } else {
        (id, None)
    }
}

fn deferred_ack() -> CreateInteractionResponse {
    CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new().ephemeral(true))
}

fn response_for(reply: &Reply) -> CreateInteractionResponse {
    let message = CreateInteractionResponseMessage::new().ephemeral(true);
    let message = match reply {
        Reply::Ephemeral { title, body } => message.embed(components::make_embed(title, body)),
        Reply::AdminPanel { title, body } => message
            .embed(components::make_embed(title, body))
            .components(components::admin_panel_rows()),
        Reply::ConfirmDelete { title, body } => message
            .embed(components::make_embed(title, body))
            .components(vec![components::confirm_delete_row()]),
        // Modal replies are handled before this point; a generic note keeps
        // the one-response guarantee if one ever lands here.
        Reply::TranscriptChannelModal => {
            message.embed(components::make_embed("Unavailable", "Please try again."))
        }
    };
    CreateInteractionResponse::Message(message)
}

fn followup_for(reply: &Reply) -> CreateInteractionResponseFollowup {
    let followup = CreateInteractionResponseFollowup::new().ephemeral(true);
    match reply {
        Reply::Ephemeral { title, body } => followup.embed(components::make_embed(title, body)),
        Reply::AdminPanel { title, body } => followup
            .embed(components::make_embed(title, body))
            .components(components::admin_panel_rows()),
        Reply::ConfirmDelete { title, body } => followup
            .embed(components::make_embed(title, body))
            .components(vec![components::confirm_delete_row()]),
        Reply::TranscriptChannelModal => {
            followup.embed(components::make_embed("Unavailable", "Please try again."))
        }
    }
}

async fn respond_embed(ctx: &Context, cmd: &CommandInteraction, title: &str, body: &str) {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .ephemeral(true)
            .embed(components::make_embed(title, body)),
    );
    if let Err(e) = cmd.create_response(&ctx.http, response).await {
        warn!(error = %e, "could not respond to interaction");
    }
}

/// Retire the confirm/cancel pair after its bounded lifetime. Best-effort;
/// authorization is re-checked at confirm time regardless.
fn retire_confirm_later(ctx: &Context, comp: ComponentInteraction) {
    let http = ctx.http.clone();
    tokio::spawn(async move {
        tokio::time::sleep(CONFIRM_LIFETIME).await;
        let edit = EditInteractionResponse::new()
            .components(vec![components::expired_confirm_row()]);
        if let Err(e) = comp.edit_response(&http, edit).await {
            debug!(error = %e, "could not retire expired delete confirmation");
        }
    });
}
