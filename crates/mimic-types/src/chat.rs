//! Chat request, reply, exchange, and context types for Mimic.
//!
//! A `ChatRequest` enters the pipeline, a `ChatReply` leaves it. Successful
//! requests leave behind one `Exchange` in the history store; `ChatContext`
//! is the per-request aggregate used to personalize the prompt and is never
//! persisted.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::AttributeMap;

/// Maximum number of recent exchanges consulted per request.
pub const RECENT_EXCHANGE_LIMIT: u32 = 5;

/// An inbound chat message tied to a user and a channel.
///
/// Wire shape matches what chat-platform bots post to `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub server_id: String,
    pub channel_id: String,
    pub content: String,
}

impl ChatRequest {
    /// Check the request carries something to reply to.
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("user_id must not be empty".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("content must not be empty".to_string());
        }
        Ok(())
    }
}

/// The reply returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

impl ChatReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

/// One recorded (user message, bot reply) pair.
///
/// Created once per successfully generated reply; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: Uuid,
    pub user_id: String,
    pub channel_id: String,
    pub user_message: String,
    pub bot_reply: String,
    pub created_at: DateTime<Utc>,
}

impl Exchange {
    /// Create a new exchange stamped with a fresh UUID v7 and the current time.
    pub fn new(
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
        user_message: impl Into<String>,
        bot_reply: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            channel_id: channel_id.into(),
            user_message: user_message.into(),
            bot_reply: bot_reply.into(),
            created_at: Utc::now(),
        }
    }
}

/// Personalization state gathered for a single request.
///
/// Missing sources are represented by empty values, never by an error.
/// `recent_exchanges` is most-recent-first and holds at most
/// [`RECENT_EXCHANGE_LIMIT`] entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatContext {
    pub profile: AttributeMap,
    pub persona: AttributeMap,
    pub recent_exchanges: Vec<Exchange>,
}

/// Pipeline phase of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPhase {
    Gathering,
    Building,
    Generating,
    Recording,
    Failed,
    Done,
}

impl fmt::Display for ChatPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatPhase::Gathering => write!(f, "gathering"),
            ChatPhase::Building => write!(f, "building"),
            ChatPhase::Generating => write!(f, "generating"),
            ChatPhase::Recording => write!(f, "recording"),
            ChatPhase::Failed => write!(f, "failed"),
            ChatPhase::Done => write!(f, "done"),
        }
    }
}

/// How a request ended. Only operators see this; callers always get a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatOutcome {
    /// Generated and recorded.
    Completed,
    /// Generated, but the exchange could not be stored.
    RecordFailed,
    /// Deadline elapsed; timeout fallback returned.
    TimeoutFallback,
    /// Backend failed; generic fallback returned.
    BackendFallback,
}

impl ChatOutcome {
    /// Whether the reply text came from the backend rather than a fallback.
    pub fn is_generated(&self) -> bool {
        matches!(self, ChatOutcome::Completed | ChatOutcome::RecordFailed)
    }
}

impl fmt::Display for ChatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatOutcome::Completed => write!(f, "completed"),
            ChatOutcome::RecordFailed => write!(f, "record_failed"),
            ChatOutcome::TimeoutFallback => write!(f, "timeout_fallback"),
            ChatOutcome::BackendFallback => write!(f, "backend_fallback"),
        }
    }
}

/// A reply together with how it was produced.
#[derive(Debug, Clone)]
pub struct ChatResult {
    pub reply: ChatReply,
    pub outcome: ChatOutcome,
    pub elapsed: Duration,
    /// Phases entered, in order. Always ends with `Done`.
    pub phases: Vec<ChatPhase>,
}
