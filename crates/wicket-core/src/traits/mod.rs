// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits implemented by the platform and storage crates.

pub mod platform;
pub mod store;

pub use platform::Platform;
pub use store::TicketStore;
