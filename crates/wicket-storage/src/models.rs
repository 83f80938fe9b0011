// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `wicket-core::types` for use across
//! trait boundaries. This module re-exports them for convenience within
//! the storage crate.

pub use wicket_core::types::{NewTicket, TicketCategory, TicketRecord, TicketStatus};
