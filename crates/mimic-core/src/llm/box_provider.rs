//! BoxGenerationBackend -- type-erased wrapper around a GenerationBackend.

use std::pin::Pin;

use futures_util::Stream;

use mimic_types::llm::{CompletionRequest, LlmError, StreamEvent};

use super::provider::GenerationBackend;

/// Type-erased generation backend for runtime provider selection.
///
/// Built once at startup and shared behind an `Arc`.
pub struct BoxGenerationBackend {
    inner: Box<dyn GenerationBackend>,
}

impl BoxGenerationBackend {
    /// Wrap a concrete backend in a type-erased box.
    pub fn new<T: GenerationBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn default_model(&self) -> &str {
        self.inner.default_model()
    }

    /// Send a streaming completion request. Returns a stream of events.
    pub fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        self.inner.stream(request)
    }
}

impl std::fmt::Debug for BoxGenerationBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxGenerationBackend")
            .field("name", &self.name())
            .field("default_model", &self.default_model())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_box_backend_delegates_stream() {
        let backend = BoxGenerationBackend::new(MockBackend::chunks(&["Hel", "lo"]));
        assert_eq!(backend.name(), "mock");
        assert_eq!(backend.default_model(), "mock-model");

        let mut stream = backend.stream(CompletionRequest::from_prompt("hi", 64, None));
        let mut text = String::new();
        while let Some(event) = stream.next().await {
            if let StreamEvent::TextDelta { text: t } = event.unwrap() {
                text.push_str(&t);
            }
        }
        assert_eq!(text, "Hello");
    }

    #[test]
    fn test_backend_trait_is_object_safe() {
        let backends: Vec<Box<dyn GenerationBackend>> = vec![
            Box::new(MockBackend::chunks(&["a"])),
            Box::new(MockBackend::hanging()),
        ];
        assert!(backends.iter().all(|b| b.name() == "mock"));
    }

    #[test]
    fn test_box_backend_debug_hides_inner() {
        let backend = BoxGenerationBackend::new(MockBackend::chunks(&["a"]));
        let debug = format!("{backend:?}");
        assert!(debug.contains("mock-model"));
    }
}
