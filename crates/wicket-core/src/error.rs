// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Wicket ticket bot.

use thiserror::Error;

/// The primary error type used across all Wicket crates.
///
/// Authorization and not-found errors are always handled at the router
/// boundary and rendered as ephemeral denial replies; they never propagate
/// as unhandled faults. Nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum WicketError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Platform API errors (thread edits, member operations, message delivery).
    #[error("platform error: {message}")]
    Platform {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A ticket, thread, or channel the operation needs does not exist.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// The actor is not authorized for the attempted action.
    #[error("permission denied: {action}")]
    PermissionDenied { action: String },

    /// Thread creation for a new ticket failed. Surfaced to the initiating
    /// actor, never retried automatically.
    #[error("provisioning failed: {message}")]
    Provision { message: String },

    /// A transcript-destination payload could not be parsed or resolved
    /// to a text-capable channel.
    #[error("invalid channel reference: {input}")]
    InvalidChannelReference { input: String },

    /// A transcript could not be posted to the configured channel nor
    /// delivered by direct message.
    #[error("transcript delivery failed: {message}")]
    DeliveryFailure { message: String },

    /// An interaction arrived with a control tag not in the registered table.
    #[error("unroutable interaction: unknown control tag `{tag}`")]
    UnroutableInteraction { tag: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WicketError {
    /// Shorthand for a platform error without an underlying source.
    pub fn platform(message: impl Into<String>) -> Self {
        WicketError::Platform {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a permission denial on the named action.
    pub fn denied(action: impl Into<String>) -> Self {
        WicketError::PermissionDenied {
            action: action.into(),
        }
    }

    /// Shorthand for a missing ticket/thread/channel.
    pub fn not_found(what: impl Into<String>) -> Self {
        WicketError::NotFound { what: what.into() }
    }
}
