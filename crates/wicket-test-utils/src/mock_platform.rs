// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock platform adapter for deterministic testing.
//!
//! `MockPlatform` implements `Platform` with injectable role membership,
//! message history, and per-operation failure switches, and records every
//! mutating call for assertion in tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use wicket_core::types::{HistoryMessage, ThreadInfo, TranscriptDocument};
use wicket_core::{Platform, WicketError};

/// State of one mock thread.
#[derive(Debug, Clone, Default)]
pub struct MockThread {
    pub name: String,
    pub parent_id: String,
    pub members: Vec<String>,
    pub archived: bool,
    pub locked: bool,
    pub deleted: bool,
    /// Plain messages posted into the thread.
    pub messages: Vec<String>,
    /// Welcome messages posted with the control row attached.
    pub control_messages: Vec<String>,
}

/// A mock text channel known to the platform.
#[derive(Debug, Clone)]
pub struct MockChannel {
    pub name: String,
    pub is_text: bool,
}

/// Failure switches; all default to off.
#[derive(Debug, Default)]
pub struct Failures {
    pub create_thread: bool,
    pub archive: bool,
    pub lock_edit: bool,
    pub delete: bool,
    pub post_document: bool,
    pub dm_document: bool,
    /// Member ids whose thread-add always fails.
    pub add_member_for: Vec<String>,
}

#[derive(Default)]
struct State {
    threads: HashMap<String, MockThread>,
    channels: HashMap<String, MockChannel>,
    role_members: HashMap<String, Vec<String>>,
    history: HashMap<String, Vec<HistoryMessage>>,
    posted_documents: Vec<(String, TranscriptDocument)>,
    dm_documents: Vec<(String, TranscriptDocument)>,
    failures: Failures,
    next_thread_id: u64,
}

/// A scripted chat platform for testing the engines and the router.
pub struct MockPlatform {
    state: Arc<Mutex<State>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_thread_id: 9000,
                ..State::default()
            })),
        }
    }

    pub async fn add_channel(&self, id: &str, name: &str, is_text: bool) {
        self.state.lock().await.channels.insert(
            id.to_string(),
            MockChannel {
                name: name.to_string(),
                is_text,
            },
        );
    }

    /// Register an existing thread (e.g. a pre-restart ticket thread).
    pub async fn add_thread(&self, id: &str, name: &str, parent_id: &str) {
        self.state.lock().await.threads.insert(
            id.to_string(),
            MockThread {
                name: name.to_string(),
                parent_id: parent_id.to_string(),
                ..MockThread::default()
            },
        );
    }

    pub async fn set_role_members(&self, role_id: &str, members: Vec<String>) {
        self.state
            .lock()
            .await
            .role_members
            .insert(role_id.to_string(), members);
    }

    pub async fn set_history(&self, thread_id: &str, messages: Vec<HistoryMessage>) {
        self.state
            .lock()
            .await
            .history
            .insert(thread_id.to_string(), messages);
    }

    pub async fn set_failures(&self, failures: Failures) {
        self.state.lock().await.failures = failures;
    }

    pub async fn thread(&self, id: &str) -> Option<MockThread> {
        self.state.lock().await.threads.get(id).cloned()
    }

    pub async fn posted_documents(&self) -> Vec<(String, TranscriptDocument)> {
        self.state.lock().await.posted_documents.clone()
    }

    pub async fn dm_documents(&self) -> Vec<(String, TranscriptDocument)> {
        self.state.lock().await.dm_documents.clone()
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn create_private_thread(
        &self,
        parent_channel_id: &str,
        name: &str,
    ) -> Result<ThreadInfo, WicketError> {
        let mut state = self.state.lock().await;
        if state.failures.create_thread {
            return Err(WicketError::platform("create_private_thread rejected"));
        }
        state.next_thread_id += 1;
        let id = state.next_thread_id.to_string();
        state.threads.insert(
            id.clone(),
            MockThread {
                name: name.to_string(),
                parent_id: parent_channel_id.to_string(),
                ..MockThread::default()
            },
        );
        Ok(ThreadInfo {
            id,
            name: name.to_string(),
            parent_id: parent_channel_id.to_string(),
            created_at: Some(chrono::Utc::now()),
        })
    }

    async fn thread_info(&self, thread_id: &str) -> Result<ThreadInfo, WicketError> {
        let state = self.state.lock().await;
        let thread = state
            .threads
            .get(thread_id)
            .ok_or_else(|| WicketError::not_found(format!("thread {thread_id}")))?;
        Ok(ThreadInfo {
            id: thread_id.to_string(),
            name: thread.name.clone(),
            parent_id: thread.parent_id.clone(),
            created_at: None,
        })
    }

    async fn add_thread_member(
        &self,
        thread_id: &str,
        user_id: &str,
    ) -> Result<(), WicketError> {
        let mut state = self.state.lock().await;
        if state.failures.add_member_for.iter().any(|u| u == user_id) {
            return Err(WicketError::platform(format!("cannot add {user_id}")));
        }
        let thread = state
            .threads
            .get_mut(thread_id)
            .ok_or_else(|| WicketError::not_found(format!("thread {thread_id}")))?;
        if !thread.members.iter().any(|m| m == user_id) {
            thread.members.push(user_id.to_string());
        }
        Ok(())
    }

    async fn remove_thread_member(
        &self,
        thread_id: &str,
        user_id: &str,
    ) -> Result<(), WicketError> {
        let mut state = self.state.lock().await;
        let thread = state
            .threads
            .get_mut(thread_id)
            .ok_or_else(|| WicketError::not_found(format!("thread {thread_id}")))?;
        thread.members.retain(|m| m != user_id);
        Ok(())
    }

    async fn archive_thread(&self, thread_id: &str) -> Result<(), WicketError> {
        let mut state = self.state.lock().await;
        if state.failures.archive {
            return Err(WicketError::platform("archive rejected"));
        }
        let thread = state
            .threads
            .get_mut(thread_id)
            .ok_or_else(|| WicketError::not_found(format!("thread {thread_id}")))?;
        thread.archived = true;
        Ok(())
    }

    async fn set_thread_locked(
        &self,
        thread_id: &str,
        locked: bool,
    ) -> Result<(), WicketError> {
        let mut state = self.state.lock().await;
        if state.failures.lock_edit {
            return Err(WicketError::platform("lock edit rejected"));
        }
        let thread = state
            .threads
            .get_mut(thread_id)
            .ok_or_else(|| WicketError::not_found(format!("thread {thread_id}")))?;
        thread.locked = locked;
        Ok(())
    }

    async fn is_thread_locked(&self, thread_id: &str) -> Result<bool, WicketError> {
        let state = self.state.lock().await;
        state
            .threads
            .get(thread_id)
            .map(|t| t.locked)
            .ok_or_else(|| WicketError::not_found(format!("thread {thread_id}")))
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<(), WicketError> {
        let mut state = self.state.lock().await;
        if state.failures.delete {
            return Err(WicketError::platform("delete rejected"));
        }
        let thread = state
            .threads
            .get_mut(thread_id)
            .ok_or_else(|| WicketError::not_found(format!("thread {thread_id}")))?;
        thread.deleted = true;
        Ok(())
    }

    async fn role_members(&self, role_id: &str) -> Result<Vec<String>, WicketError> {
        Ok(self
            .state
            .lock()
            .await
            .role_members
            .get(role_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_history(
        &self,
        thread_id: &str,
    ) -> Result<Vec<HistoryMessage>, WicketError> {
        Ok(self
            .state
            .lock()
            .await
            .history
            .get(thread_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), WicketError> {
        let mut state = self.state.lock().await;
        if let Some(thread) = state.threads.get_mut(channel_id) {
            thread.messages.push(text.to_string());
        }
        Ok(())
    }

    async fn post_ticket_controls(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<(), WicketError> {
        let mut state = self.state.lock().await;
        let thread = state
            .threads
            .get_mut(thread_id)
            .ok_or_else(|| WicketError::not_found(format!("thread {thread_id}")))?;
        thread.control_messages.push(text.to_string());
        Ok(())
    }

    async fn post_document(
        &self,
        channel_id: &str,
        _note: &str,
        doc: &TranscriptDocument,
    ) -> Result<(), WicketError> {
        let mut state = self.state.lock().await;
        if state.failures.post_document {
            return Err(WicketError::platform("post_document rejected"));
        }
        if !state.channels.contains_key(channel_id) {
            return Err(WicketError::not_found(format!("channel {channel_id}")));
        }
        state
            .posted_documents
            .push((channel_id.to_string(), doc.clone()));
        Ok(())
    }

    async fn dm_document(
        &self,
        user_id: &str,
        _note: &str,
        doc: &TranscriptDocument,
    ) -> Result<(), WicketError> {
        let mut state = self.state.lock().await;
        if state.failures.dm_document {
            return Err(WicketError::platform("dm rejected"));
        }
        state.dm_documents.push((user_id.to_string(), doc.clone()));
        Ok(())
    }

    async fn channel_by_name(&self, name: &str) -> Result<Option<String>, WicketError> {
        Ok(self
            .state
            .lock()
            .await
            .channels
            .iter()
            .find(|(_, c)| c.name == name)
            .map(|(id, _)| id.clone()))
    }

    async fn is_text_channel(&self, channel_id: &str) -> Result<bool, WicketError> {
        Ok(self
            .state
            .lock()
            .await
            .channels
            .get(channel_id)
            .map(|c| c.is_text)
            .unwrap_or(false))
    }
}
