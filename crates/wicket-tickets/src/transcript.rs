// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript generation and delivery.
//!
//! The generator is deterministic: messages are ordered by timestamp no
//! matter what order the paginated retrieval produced.

use tracing::debug;

use wicket_core::types::{HistoryMessage, ThreadInfo, TranscriptDocument};
use wicket_core::{Platform, TicketStore, WicketError};

/// Store key holding the default transcript-destination channel id.
pub const TRANSCRIPT_CHANNEL_KEY: &str = "transcript_channel";

/// Where a transcript ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Posted { channel_id: String },
    DirectMessage,
}

/// Render a thread's history into a UTF-8 text document.
///
/// One line per message, oldest first, `[timestamp] author (id): content`,
/// with attachment metadata inline and an `[Embeds present]` marker for
/// messages carrying rich embeds (embed content itself is not serialized).
pub fn generate(
    thread: &ThreadInfo,
    messages: &[HistoryMessage],
    include_attachments: bool,
) -> TranscriptDocument {
    let mut ordered: Vec<&HistoryMessage> = messages.iter().collect();
    ordered.sort_by_key(|m| m.timestamp);

    let created = thread
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let mut out = String::new();
    out.push_str(&format!(
        "Transcript for thread {} (id: {})\n",
        thread.name, thread.id
    ));
    out.push_str(&format!("Channel: {}\n", thread.parent_id));
    out.push_str(&format!("Created: {created}\n\n"));

    for m in ordered {
        let mut content = m.content.clone();
        if include_attachments {
            for a in &m.attachments {
                content.push_str(&format!(
                    "\n[Attachment] filename={} url={} size={}",
                    a.filename, a.url, a.size
                ));
            }
        }
        if m.has_embeds {
            content.push_str("\n[Embeds present]");
        }
        out.push_str(&format!(
            "[{}] {} (id: {}): {}\n",
            m.timestamp.format("%Y-%m-%d %H:%M:%S"),
            m.author_name,
            m.author_id,
            content
        ));
    }

    TranscriptDocument {
        filename: format!("transcript-{}-{}.txt", thread.name, thread.id),
        content: out,
    }
}

/// Deliver a transcript: configured channel first, then a direct message to
/// the requester, then [`WicketError::DeliveryFailure`].
///
/// The runtime `transcript_channel` store key takes precedence over the
/// static `default_channel` from the TOML config.
pub async fn deliver(
    platform: &dyn Platform,
    store: &dyn TicketStore,
    default_channel: Option<&str>,
    requester_id: &str,
    note: &str,
    doc: &TranscriptDocument,
) -> Result<DeliveryOutcome, WicketError> {
    let configured = store.get_config(TRANSCRIPT_CHANNEL_KEY).await?;
    let destination = configured.or_else(|| default_channel.map(str::to_string));

    if let Some(channel_id) = destination {
        match platform.post_document(&channel_id, note, doc).await {
            Ok(()) => return Ok(DeliveryOutcome::Posted { channel_id }),
            Err(e) => {
                debug!(error = %e, channel = %channel_id, "transcript post failed, falling back to DM");
            }
        }
    }

    match platform.dm_document(requester_id, note, doc).await {
        Ok(()) => Ok(DeliveryOutcome::DirectMessage),
        Err(e) => Err(WicketError::DeliveryFailure {
            message: format!("could not post to a channel nor DM the requester: {e}"),
        }),
    }
}
