// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Wicket workspace.
//!
//! Provides a scripted [`MockPlatform`], an in-memory [`MemoryTicketStore`],
//! and small fixture helpers shared across engine and router tests.

pub mod fixtures;
pub mod memory_store;
pub mod mock_platform;

pub use fixtures::{history_message, staff_actor, user_actor};
pub use memory_store::MemoryTicketStore;
pub use mock_platform::{Failures, MockPlatform, MockThread};
