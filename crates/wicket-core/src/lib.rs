// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Wicket ticket bot.
//!
//! This crate provides the trait definitions, error taxonomy, and domain
//! types used throughout the Wicket workspace. The Discord adapter and the
//! SQLite store implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::WicketError;
pub use traits::{Platform, TicketStore};
pub use types::{
    Actor, AttachmentInfo, BulkAddSummary, HistoryMessage, NewTicket, ThreadInfo,
    TicketCategory, TicketRecord, TicketStatus, TranscriptDocument,
};
