//! GenerationBackend trait definition.
//!
//! The pipeline only ever streams, so the trait is a single object-safe
//! `stream` method plus identification. `BoxGenerationBackend` erases the
//! concrete type for runtime provider selection.

use std::pin::Pin;

use futures_util::Stream;

use mimic_types::llm::{CompletionRequest, LlmError, StreamEvent};

/// Trait for external text-generation backends.
///
/// Implementations live in mimic-infra (e.g., `OpenAiCompatibleBackend`).
pub trait GenerationBackend: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Model used when a request leaves `model` empty.
    fn default_model(&self) -> &str;

    /// Send a streaming completion request. Returns a stream of events.
    ///
    /// Dropping the stream must abort the underlying request.
    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;
}
