// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket provisioning: thread creation, creator add, and rate-budgeted
//! bulk staff membership.
//!
//! Only thread creation is fatal; every later step is best-effort and
//! collected into a [`BulkAddSummary`] so partial success stays visible.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, warn};

use wicket_core::types::{Actor, BulkAddSummary, NewTicket, ThreadInfo, TicketCategory, TicketRecord};
use wicket_core::{Platform, TicketStore, WicketError};

/// Result of provisioning one ticket.
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    pub record: TicketRecord,
    pub thread: ThreadInfo,
    pub staff_adds: BulkAddSummary,
    /// Set when the staff role has more members than the add budget; the
    /// caller broadcasts a role mention in the welcome message for the
    /// overflow instead of relying on direct membership.
    pub fallback_mention_needed: bool,
}

/// Creates the private thread for a new ticket and populates it.
pub struct ProvisionEngine {
    platform: Arc<dyn Platform>,
    store: Arc<dyn TicketStore>,
    staff_role_id: Option<String>,
    staff_add_limit: usize,
    add_pace: Duration,
}

impl ProvisionEngine {
    pub fn new(
        platform: Arc<dyn Platform>,
        store: Arc<dyn TicketStore>,
        staff_role_id: Option<String>,
        staff_add_limit: usize,
        add_pace: Duration,
    ) -> Self {
        Self {
            platform,
            store,
            staff_role_id,
            staff_add_limit,
            add_pace,
        }
    }

    /// Provision a thread for `creator` under `parent_channel_id`.
    ///
    /// Thread-creation failure aborts the whole operation with
    /// [`WicketError::Provision`]; creator and staff adds are best-effort.
    pub async fn provision(
        &self,
        category: TicketCategory,
        creator: &Actor,
        parent_channel_id: &str,
    ) -> Result<ProvisionOutcome, WicketError> {
        let name = thread_name(&category.to_string(), &creator.display_name);

        let thread = self
            .platform
            .create_private_thread(parent_channel_id, &name)
            .await
            .map_err(|e| WicketError::Provision {
                message: e.to_string(),
            })?;

        if let Err(e) = self.platform.add_thread_member(&thread.id, &creator.id).await {
            // The creator usually has implicit access as thread author.
            debug!(error = %e, thread = %thread.id, "could not add creator to thread");
        }

        let mut staff_adds = BulkAddSummary::default();
        let mut fallback_mention_needed = false;
        if let Some(role) = &self.staff_role_id {
            match self.platform.role_members(role).await {
                Ok(members) => {
                    fallback_mention_needed = members.len() > self.staff_add_limit;
                    for (i, member) in members.iter().take(self.staff_add_limit).enumerate() {
                        if i > 0 {
                            tokio::time::sleep(self.add_pace).await;
                        }
                        match self.platform.add_thread_member(&thread.id, member).await {
                            Ok(()) => staff_adds.added += 1,
                            Err(e) => {
                                debug!(error = %e, member = %member, "staff add failed, continuing");
                                staff_adds.failed += 1;
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, role = %role, "could not enumerate staff role members");
                }
            }
        }

        let record = self
            .store
            .create_ticket(NewTicket {
                thread_id: thread.id.clone(),
                channel_id: parent_channel_id.to_string(),
                creator_user_id: creator.id.clone(),
                category,
                created_at: Utc::now(),
            })
            .await?;

        Ok(ProvisionOutcome {
            record,
            thread,
            staff_adds,
            fallback_mention_needed,
        })
    }
}

/// Derive a thread name from the category slug and the creator's display
/// name, with a 4-digit disambiguator.
///
/// Collisions are accepted as a low-probability risk, not actively checked.
pub fn thread_name(category: &str, username: &str) -> String {
    let base: String = category
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .take(12)
        .collect();
    let base = if base.is_empty() {
        "ticket".to_string()
    } else {
        base
    };

    let user: String = username
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect();
    let user = if user.is_empty() { "u".to_string() } else { user };

    let disambiguator = rand::thread_rng().gen_range(1000..=9999);
    format!("{base}-{user}-{disambiguator}")
}
