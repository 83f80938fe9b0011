// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket engines for the Wicket bot: authorization guard, provisioning,
//! lifecycle state machine, and transcript generation.
//!
//! Everything here is platform-agnostic -- engines talk to the chat
//! platform only through `wicket_core::Platform` and reload ticket state
//! from `wicket_core::TicketStore` per operation.

pub mod guard;
pub mod lifecycle;
pub mod provision;
pub mod transcript;

pub use guard::Guard;
pub use lifecycle::{CloseOutcome, LifecycleEngine};
pub use provision::{thread_name, ProvisionEngine, ProvisionOutcome};
pub use transcript::{DeliveryOutcome, TRANSCRIPT_CHANNEL_KEY};
