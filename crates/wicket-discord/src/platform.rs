// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serenity implementation of the `Platform` trait.
//!
//! All engine-visible identifiers are strings; this adapter converts to and
//! from Discord snowflakes at the boundary. History retrieval paginates
//! with an `after` cursor until exhaustion -- ordering is left to the
//! transcript generator.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{
    AutoArchiveDuration, ChannelId, ChannelType, CreateAttachment, CreateMessage, CreateThread,
    EditThread, GetMessages, GuildChannel, GuildId, MessageId, RoleId, UserId,
};
use serenity::http::Http;

use wicket_core::types::{AttachmentInfo, HistoryMessage, ThreadInfo, TranscriptDocument};
use wicket_core::{Platform, WicketError};

use crate::components;

const HISTORY_PAGE: u8 = 100;
const MEMBER_PAGE: u64 = 1000;

/// Discord-backed platform adapter.
pub struct SerenityPlatform {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, guild_id: GuildId) -> Self {
        Self { http, guild_id }
    }

    async fn guild_thread(&self, thread_id: &str) -> Result<GuildChannel, WicketError> {
        let channel = ChannelId::new(parse_id(thread_id)?)
            .to_channel(&self.http)
            .await
            .map_err(|e| map_api_err("could not fetch thread", e))?;
        channel
            .guild()
            .filter(|c| c.thread_metadata.is_some())
            .ok_or_else(|| WicketError::not_found(format!("thread {thread_id}")))
    }
}

fn parse_id(raw: &str) -> Result<u64, WicketError> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| WicketError::Internal(format!("malformed snowflake `{raw}`")))
}

fn map_api_err(context: &str, e: serenity::Error) -> WicketError {
    WicketError::Platform {
        message: context.to_string(),
        source: Some(Box::new(e)),
    }
}

fn to_utc(ts: serenity::model::Timestamp) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.unix_timestamp(), 0).unwrap_or(DateTime::UNIX_EPOCH)
}

#[async_trait]
impl Platform for SerenityPlatform {
    async fn create_private_thread(
        &self,
        parent_channel_id: &str,
        name: &str,
    ) -> Result<ThreadInfo, WicketError> {
        let parent = ChannelId::new(parse_id(parent_channel_id)?);
        let thread = parent
            .create_thread(
                &self.http,
                CreateThread::new(name)
                    .kind(ChannelType::PrivateThread)
                    .auto_archive_duration(AutoArchiveDuration::OneDay),
            )
            .await
            .map_err(|e| map_api_err("could not create a private thread", e))?;

        Ok(ThreadInfo {
            id: thread.id.to_string(),
            name: thread.name.clone(),
            parent_id: thread
                .parent_id
                .map(|c| c.to_string())
                .unwrap_or_else(|| parent_channel_id.to_string()),
            created_at: thread
                .thread_metadata
                .and_then(|m| m.create_timestamp)
                .map(to_utc),
        })
    }

    async fn thread_info(&self, thread_id: &str) -> Result<ThreadInfo, WicketError> {
        let thread = self.guild_thread(thread_id).await?;
        Ok(ThreadInfo {
            id: thread.id.to_string(),
            name: thread.name.clone(),
            parent_id: thread
                .parent_id
                .map(|c| c.to_string())
                .unwrap_or_default(),
            created_at: thread
                .thread_metadata
                .and_then(|m| m.create_timestamp)
                .map(to_utc),
        })
    }

    async fn add_thread_member(
        &self,
        thread_id: &str,
        user_id: &str,
    ) -> Result<(), WicketError> {
        self.http
            .add_thread_channel_member(
                ChannelId::new(parse_id(thread_id)?),
                UserId::new(parse_id(user_id)?),
            )
            .await
            .map_err(|e| map_api_err("could not add member to thread", e))
    }

    async fn remove_thread_member(
        &self,
        thread_id: &str,
        user_id: &str,
    ) -> Result<(), WicketError> {
        self.http
            .remove_thread_channel_member(
                ChannelId::new(parse_id(thread_id)?),
                UserId::new(parse_id(user_id)?),
            )
            .await
            .map_err(|e| map_api_err("could not remove member from thread", e))
    }

    async fn archive_thread(&self, thread_id: &str) -> Result<(), WicketError> {
        ChannelId::new(parse_id(thread_id)?)
            .edit_thread(&self.http, EditThread::new().archived(true))
            .await
            .map_err(|e| map_api_err("could not archive thread", e))?;
        Ok(())
    }

    async fn set_thread_locked(
        &self,
        thread_id: &str,
        locked: bool,
    ) -> Result<(), WicketError> {
        ChannelId::new(parse_id(thread_id)?)
            .edit_thread(&self.http, EditThread::new().locked(locked))
            .await
            .map_err(|e| map_api_err("could not edit thread lock", e))?;
        Ok(())
    }

    async fn is_thread_locked(&self, thread_id: &str) -> Result<bool, WicketError> {
        let thread = self.guild_thread(thread_id).await?;
        Ok(thread.thread_metadata.map(|m| m.locked).unwrap_or(false))
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<(), WicketError> {
        ChannelId::new(parse_id(thread_id)?)
            .delete(&self.http)
            .await
            .map_err(|e| map_api_err("could not delete thread", e))?;
        Ok(())
    }

    async fn role_members(&self, role_id: &str) -> Result<Vec<String>, WicketError> {
        let role = RoleId::new(parse_id(role_id)?);
        let mut out = Vec::new();
        let mut after: Option<UserId> = None;
        loop {
            let batch = self
                .guild_id
                .members(&self.http, Some(MEMBER_PAGE), after)
                .await
                .map_err(|e| map_api_err("could not enumerate guild members", e))?;
            if batch.is_empty() {
                break;
            }
            after = batch.last().map(|m| m.user.id);
            for member in &batch {
                if member.roles.contains(&role) {
                    out.push(member.user.id.to_string());
                }
            }
            if (batch.len() as u64) < MEMBER_PAGE {
                break;
            }
        }
        Ok(out)
    }

    async fn fetch_history(
        &self,
        thread_id: &str,
    ) -> Result<Vec<HistoryMessage>, WicketError> {
        let channel = ChannelId::new(parse_id(thread_id)?);
        let mut out = Vec::new();
        let mut after: Option<MessageId> = None;
        loop {
            let mut filter = GetMessages::new().limit(HISTORY_PAGE);
            if let Some(cursor) = after {
                filter = filter.after(cursor);
            }
            let batch = channel
                .messages(&self.http, filter)
                .await
                .map_err(|e| map_api_err("could not fetch thread history", e))?;
            if batch.is_empty() {
                break;
            }
            after = batch.iter().map(|m| m.id).max();
            for m in &batch {
                out.push(HistoryMessage {
                    id: m.id.to_string(),
                    author_name: m.author.name.clone(),
                    author_id: m.author.id.to_string(),
                    timestamp: to_utc(m.timestamp),
                    content: m.content.clone(),
                    attachments: m
                        .attachments
                        .iter()
                        .map(|a| AttachmentInfo {
                            filename: a.filename.clone(),
                            url: a.url.clone(),
                            size: a.size as u64,
                        })
                        .collect(),
                    has_embeds: !m.embeds.is_empty(),
                });
            }
            if batch.len() < HISTORY_PAGE as usize {
                break;
            }
        }
        Ok(out)
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), WicketError> {
        ChannelId::new(parse_id(channel_id)?)
            .send_message(&self.http, CreateMessage::new().content(text))
            .await
            .map_err(|e| map_api_err("could not post message", e))?;
        Ok(())
    }

    async fn post_ticket_controls(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<(), WicketError> {
        let message = CreateMessage::new()
            .embed(components::make_embed("New ticket", text))
            .components(vec![components::thread_controls_row()]);
        ChannelId::new(parse_id(thread_id)?)
            .send_message(&self.http, message)
            .await
            .map_err(|e| map_api_err("could not post welcome message", e))?;
        Ok(())
    }

    async fn post_document(
        &self,
        channel_id: &str,
        note: &str,
        doc: &TranscriptDocument,
    ) -> Result<(), WicketError> {
        let attachment =
            CreateAttachment::bytes(doc.content.clone().into_bytes(), doc.filename.clone());
        ChannelId::new(parse_id(channel_id)?)
            .send_message(
                &self.http,
                CreateMessage::new().content(note).add_file(attachment),
            )
            .await
            .map_err(|e| map_api_err("could not post transcript", e))?;
        Ok(())
    }

    async fn dm_document(
        &self,
        user_id: &str,
        note: &str,
        doc: &TranscriptDocument,
    ) -> Result<(), WicketError> {
        let dm = UserId::new(parse_id(user_id)?)
            .create_dm_channel(&self.http)
            .await
            .map_err(|e| map_api_err("could not open a direct message channel", e))?;
        let attachment =
            CreateAttachment::bytes(doc.content.clone().into_bytes(), doc.filename.clone());
        dm.id
            .send_message(
                &self.http,
                CreateMessage::new().content(note).add_file(attachment),
            )
            .await
            .map_err(|e| map_api_err("could not send transcript by direct message", e))?;
        Ok(())
    }

    async fn channel_by_name(&self, name: &str) -> Result<Option<String>, WicketError> {
        let channels = self
            .guild_id
            .channels(&self.http)
            .await
            .map_err(|e| map_api_err("could not list guild channels", e))?;
        Ok(channels
            .iter()
            .find(|(_, c)| c.kind == ChannelType::Text && c.name == name)
            .map(|(id, _)| id.to_string()))
    }

    async fn is_text_channel(&self, channel_id: &str) -> Result<bool, WicketError> {
        let id = ChannelId::new(parse_id(channel_id)?);
        let channels = self
            .guild_id
            .channels(&self.http)
            .await
            .map_err(|e| map_api_err("could not list guild channels", e))?;
        Ok(channels
            .get(&id)
            .map(|c| c.kind == ChannelType::Text)
            .unwrap_or(false))
    }
}
