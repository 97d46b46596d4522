use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatSessionError {
    #[error("a reply is still outstanding")]
    ReplyPending,

    #[error("message must not be empty")]
    EmptyMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => f.write_str("user"),
            ChatRole::Assistant => f.write_str("assistant"),
        }
    }
}

/// One turn in a tutor conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    role: ChatRole,
    text: String,
    sent_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, text: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            role,
            text: text.into(),
            sent_at,
        }
    }

    #[must_use]
    pub fn role(&self) -> ChatRole {
        self.role
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }
}

/// Single-use handle returned by [`ChatTranscript::begin_send`], consumed by
/// [`ChatTranscript::complete_send`] so a reply can only land once, and only
/// for the send that requested it.
#[derive(Debug)]
pub struct SendToken(u64);

/// Append-only conversation transcript with a pending-reply guard.
///
/// Each completed round trip grows the transcript by exactly two messages:
/// the user turn (appended immediately on send) and one assistant turn.
/// Timestamps are supplied by the caller so the transcript stays clock-free.
#[derive(Debug, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    sends: u64,
    pending: Option<u64>,
}

impl ChatTranscript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript opened by an assistant greeting.
    #[must_use]
    pub fn with_greeting(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            messages: vec![ChatMessage::new(ChatRole::Assistant, text, now)],
            sends: 0,
            pending: None,
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True while a send has not yet received its assistant reply.
    #[must_use]
    pub fn is_awaiting_reply(&self) -> bool {
        self.pending.is_some()
    }

    /// The transcript rendered as `role: text` lines for prompt embedding.
    #[must_use]
    pub fn history_lines(&self) -> Vec<String> {
        self.messages
            .iter()
            .map(|message| format!("{}: {}", message.role, message.text))
            .collect()
    }

    /// Append the user turn and mark a reply as outstanding.
    ///
    /// # Errors
    ///
    /// Returns `ChatSessionError::ReplyPending` while an earlier send is
    /// unresolved, or `ChatSessionError::EmptyMessage` for blank input; the
    /// transcript is left untouched in both cases.
    pub fn begin_send(
        &mut self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<SendToken, ChatSessionError> {
        if self.pending.is_some() {
            return Err(ChatSessionError::ReplyPending);
        }
        if text.trim().is_empty() {
            return Err(ChatSessionError::EmptyMessage);
        }

        self.messages.push(ChatMessage::new(ChatRole::User, text, now));
        self.sends += 1;
        self.pending = Some(self.sends);
        Ok(SendToken(self.sends))
    }

    /// Append the assistant turn for an earlier [`Self::begin_send`].
    ///
    /// Returns `false` and appends nothing when the token does not match the
    /// outstanding send; a late reply for a superseded session must be
    /// discarded rather than applied.
    pub fn complete_send(
        &mut self,
        token: SendToken,
        reply: impl Into<String>,
        now: DateTime<Utc>,
    ) -> bool {
        if self.pending != Some(token.0) {
            return false;
        }
        self.messages
            .push(ChatMessage::new(ChatRole::Assistant, reply, now));
        self.pending = None;
        true
    }

    /// Discard the conversation, invalidating any outstanding send.
    ///
    /// A reply still in flight for the old conversation fails its token check
    /// in [`Self::complete_send`] and is dropped.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.pending = None;
    }
}
