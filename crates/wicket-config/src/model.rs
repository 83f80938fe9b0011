// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Wicket ticket bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Wicket configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values;
/// `serve` additionally requires `bot.token` and `bot.guild_id`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WicketConfig {
    /// Discord connection and identity settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Ticket provisioning and lifecycle settings.
    #[serde(default)]
    pub tickets: TicketsConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Discord connection and identity configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Bot token. Required for `serve`.
    #[serde(default)]
    pub token: Option<String>,

    /// The single guild this bot operates in. Required for `serve`.
    #[serde(default)]
    pub guild_id: Option<u64>,

    /// Role conferring staff authorization. Without it only members with
    /// the Administrator permission count as staff.
    #[serde(default)]
    pub staff_role_id: Option<u64>,

    /// Channel to auto-post the ticket select menu into at startup.
    #[serde(default)]
    pub post_channel_id: Option<u64>,
}

/// Ticket provisioning and lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TicketsConfig {
    /// Maximum staff members added directly to a new ticket thread.
    /// Overflow falls back to a role mention in the welcome message.
    #[serde(default = "default_staff_add_limit")]
    pub staff_add_limit: usize,

    /// Pause between individual staff additions, in milliseconds.
    /// Rate-limit avoidance, not a correctness requirement.
    #[serde(default = "default_add_pace_ms")]
    pub add_pace_ms: u64,

    /// Static default transcript channel. The runtime `transcript_channel`
    /// config key in the store takes precedence once set.
    #[serde(default)]
    pub transcript_channel_id: Option<u64>,
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            staff_add_limit: default_staff_add_limit(),
            add_pace_ms: default_add_pace_ms(),
            transcript_channel_id: None,
        }
    }
}

fn default_staff_add_limit() -> usize {
    20
}

fn default_add_pace_ms() -> u64 {
    250
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "./wicket.sqlite3".to_string()
}

/// Logging configuration. `RUST_LOG` overrides this at runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
