//! Bounded streaming generation.
//!
//! `GenerationInvoker` opens a stream against the backend and accumulates
//! text deltas in arrival order. The whole open-and-accumulate future runs
//! under a single deadline; when it elapses the future is dropped, which
//! drops the stream and aborts the in-flight request.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tracing::{Instrument, debug, info_span};

use mimic_types::error::GenerationError;
use mimic_types::llm::{CompletionRequest, LlmError, StreamEvent};

use crate::llm::box_provider::BoxGenerationBackend;

/// Default upper bound on one generation call.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// Invokes the generation backend under a hard deadline. No retries.
#[derive(Debug, Clone)]
pub struct GenerationInvoker {
    backend: Arc<BoxGenerationBackend>,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl GenerationInvoker {
    pub fn new(backend: Arc<BoxGenerationBackend>, max_tokens: u32, temperature: Option<f64>) -> Self {
        Self {
            backend,
            max_tokens,
            temperature,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Generate a reply to `prompt`, giving up after `deadline`.
    ///
    /// Returns the concatenated text of every `TextDelta` event. A stream
    /// that ends without any non-whitespace text is an `EmptyResponse`.
    pub async fn invoke(&self, prompt: &str, deadline: Duration) -> Result<String, GenerationError> {
        let mut request = CompletionRequest::from_prompt(prompt, self.max_tokens, self.temperature);
        request.model = self.backend.default_model().to_string();

        let span = info_span!(
            "gen_ai.stream",
            gen_ai.system = self.backend.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            deadline_ms = deadline.as_millis() as u64,
        );

        let backend = Arc::clone(&self.backend);
        let accumulate = async move {
            let mut stream = backend.stream(request);
            let mut text = String::new();
            let mut chunks = 0usize;
            while let Some(event) = stream.next().await {
                match event? {
                    StreamEvent::TextDelta { text: delta } => {
                        chunks += 1;
                        text.push_str(&delta);
                    }
                    StreamEvent::MessageDelta { stop_reason } => {
                        debug!(%stop_reason, "Generation finishing");
                    }
                    StreamEvent::Usage(usage) => {
                        debug!(
                            gen_ai.usage.input_tokens = usage.input_tokens,
                            gen_ai.usage.output_tokens = usage.output_tokens,
                            "Token usage"
                        );
                    }
                    StreamEvent::Done => break,
                    StreamEvent::Connected => {}
                }
            }
            debug!(chunks, chars = text.len(), "Stream complete");
            Ok::<String, LlmError>(text)
        };

        match tokio::time::timeout(deadline, accumulate).instrument(span).await {
            Err(_elapsed) => Err(GenerationError::Timeout(deadline)),
            Ok(Err(e)) => Err(GenerationError::Backend(e)),
            Ok(Ok(text)) if text.trim().is_empty() => Err(GenerationError::EmptyResponse),
            Ok(Ok(text)) => Ok(text),
        }
    }
}
