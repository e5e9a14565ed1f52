//! LLM request/stream types for Mimic.
//!
//! These types model the data shapes for generation backend interactions:
//! streaming completion requests and events, usage tracking, and errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Request to a generation backend.
///
/// The pipeline sends a single opaque prompt, so there is no message list:
/// the prompt goes out as one user turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier; empty means "use the backend's configured default".
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl CompletionRequest {
    /// Build a request for `prompt` using the backend's default model.
    pub fn from_prompt(prompt: impl Into<String>, max_tokens: u32, temperature: Option<f64>) -> Self {
        Self {
            model: String::new(),
            prompt: prompt.into(),
            max_tokens,
            temperature,
        }
    }
}

/// Reason why the backend stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ContentFilter,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::StopSequence => write!(f, "stop_sequence"),
            StopReason::ContentFilter => write!(f, "content_filter"),
        }
    }
}

/// Token usage for a completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Events emitted during a streaming backend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Connection established with the backend.
    Connected,

    /// An incremental chunk of generated text.
    TextDelta { text: String },

    /// The response is finishing with a stop reason.
    MessageDelta { stop_reason: StopReason },

    /// Token usage information.
    Usage(Usage),

    /// The stream has completed.
    Done,
}

/// Errors from generation backend operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_reason_display_matches_serde() {
        for reason in [
            StopReason::EndTurn,
            StopReason::MaxTokens,
            StopReason::StopSequence,
            StopReason::ContentFilter,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{reason}\""));
        }
    }

    #[test]
    fn test_stop_reason_serde() {
        let json = serde_json::to_string(&StopReason::EndTurn).unwrap();
        assert_eq!(json, "\"end_turn\"");
    }

    #[test]
    fn test_stream_event_tagging() {
        let event = StreamEvent::TextDelta {
            text: "hi".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"text_delta","text":"hi"}"#);
    }

    #[test]
    fn test_completion_request_from_prompt_uses_default_model() {
        let req = CompletionRequest::from_prompt("hello", 1024, Some(0.7));
        assert!(req.model.is_empty());
        assert_eq!(req.prompt, "hello");
        assert_eq!(req.max_tokens, 1024);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::RateLimited {
            retry_after_ms: Some(500),
        };
        assert!(err.to_string().contains("500"));
    }
}
