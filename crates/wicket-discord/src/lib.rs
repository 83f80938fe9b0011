// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord adapter for the Wicket ticket bot.
//!
//! Connects to the gateway via serenity, registers the slash-command set
//! and control templates at `ready`, and funnels every interaction through
//! the stateless router. The `Platform` trait implementation lives in
//! [`platform::SerenityPlatform`]; engine crates never see serenity types.

pub mod commands;
pub mod components;
pub mod gateway;
pub mod platform;

use std::sync::Arc;

use serenity::all::{Client, GatewayIntents, GuildId};
use tracing::info;

use wicket_config::WicketConfig;
use wicket_core::{TicketStore, WicketError};

pub use gateway::Handler;
pub use platform::SerenityPlatform;

/// Connect to Discord and run until the process receives a shutdown signal.
///
/// Requires `bot.token` and `bot.guild_id`; callers validate the config
/// before getting here, so these are defensive re-checks only in the sense
/// that they return `Config` errors rather than panicking.
pub async fn run_gateway(
    config: WicketConfig,
    store: Arc<dyn TicketStore>,
) -> Result<(), WicketError> {
    let token = config
        .bot
        .token
        .clone()
        .ok_or_else(|| WicketError::Config("bot.token is required".into()))?;
    let guild_id = GuildId::new(
        config
            .bot
            .guild_id
            .ok_or_else(|| WicketError::Config("bot.guild_id is required".into()))?,
    );

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler::new(config, guild_id, store);
    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| WicketError::Platform {
            message: "gateway client construction failed".into(),
            source: Some(Box::new(e)),
        })?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received, stopping shards");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await.map_err(|e| WicketError::Platform {
        message: "gateway connection failed".into(),
        source: Some(Box::new(e)),
    })
}
