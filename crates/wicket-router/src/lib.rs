// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stateless interaction routing for the Wicket bot.
//!
//! Controls encode only a handler-class tag in their persistent identifier;
//! the execution context (which thread the click fired in) supplies the
//! instance. Registering the finite tag table once per process start is
//! sufficient for every past and future control to keep working after a
//! restart.

pub mod channelref;
pub mod context;
pub mod router;
pub mod tags;

pub use channelref::{parse_channel_ref, resolve_text_channel, ChannelRef};
pub use context::{InteractionContext, Payload, Reply};
pub use router::Router;
pub use tags::ControlTag;
