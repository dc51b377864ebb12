//! Minimal contract for the remote chat service consumed by `chatterm`.
//!
//! This crate defines only the message record and the history fetch call. It
//! excludes transport, authentication and rate limiting, which belong to the
//! concrete client implementing [`ChatService`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Identifier of a conversation channel.
pub type ChannelId = String;

/// Identifier of a single message, unique within its channel.
pub type MessageId = String;

/// Errors surfaced by a chat service client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatServiceError {
    #[error("transport error while fetching {channel_id}: {message}")]
    Transport {
        channel_id: ChannelId,
        message: String,
    },

    #[error("message {message_id} has invalid RFC3339 timestamp: {value}")]
    InvalidTimestamp { message_id: MessageId, value: String },
}

impl ChatServiceError {
    #[must_use]
    pub fn transport(channel_id: impl Into<ChannelId>, message: impl Into<String>) -> Self {
        Self::Transport {
            channel_id: channel_id.into(),
            message: message.into(),
        }
    }
}

/// Chat message as returned by the service.
///
/// Messages are immutable once cached; the client never edits them in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
    /// RFC 3339 timestamp string, exactly as delivered by the service.
    pub timestamp: String,
}

impl Message {
    #[must_use]
    pub fn new(
        id: impl Into<MessageId>,
        channel_id: impl Into<ChannelId>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            author: String::new(),
            content: String::new(),
            timestamp: timestamp.into(),
        }
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Parses the timestamp into an instant.
    pub fn parsed_timestamp(&self) -> Result<OffsetDateTime, ChatServiceError> {
        parse_timestamp(&self.timestamp).ok_or_else(|| ChatServiceError::InvalidTimestamp {
            message_id: self.id.clone(),
            value: self.timestamp.clone(),
        })
    }

    /// Timestamp used for ordering. Unparsable values order as the Unix epoch.
    #[must_use]
    pub fn sort_instant(&self) -> OffsetDateTime {
        parse_timestamp(&self.timestamp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

/// Parses an RFC 3339 timestamp string.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).ok()
}

/// Parameters for one page of channel history.
///
/// `before`/`after` bound the page by message id; `None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub channel_id: ChannelId,
    pub limit: usize,
    pub before: Option<MessageId>,
    pub after: Option<MessageId>,
}

impl FetchRequest {
    /// Most recent `limit` messages with no bounding cursors.
    #[must_use]
    pub fn latest(channel_id: impl Into<ChannelId>, limit: usize) -> Self {
        Self {
            channel_id: channel_id.into(),
            limit,
            before: None,
            after: None,
        }
    }

    #[must_use]
    pub fn before(mut self, message_id: impl Into<MessageId>) -> Self {
        self.before = Some(message_id.into());
        self
    }

    #[must_use]
    pub fn after(mut self, message_id: impl Into<MessageId>) -> Self {
        self.after = Some(message_id.into());
        self
    }
}

/// Remote chat service client.
///
/// Implementations own transport and retry policy. A returned error is final
/// for that call; callers do not retry.
pub trait ChatService: Send + Sync + 'static {
    /// Fetches one page of history, newest message first.
    fn fetch_messages(&self, request: &FetchRequest) -> Result<Vec<Message>, ChatServiceError>;
}
