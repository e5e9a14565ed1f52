//! OpenAI-compatible generation backend.
//!
//! A single [`OpenAiCompatibleBackend`] serves Google Gemini (the default),
//! OpenAI, Mistral, or any other endpoint speaking the chat completions
//! protocol via a configurable base URL.
//!
//! Uses [`async_openai`] for type-safe request/response handling and
//! built-in SSE streaming.

pub mod config;
pub mod streaming;

use std::pin::Pin;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, ChatCompletionStreamOptions,
    CreateChatCompletionRequest,
};
use futures_util::Stream;
use secrecy::ExposeSecret;

use mimic_core::llm::provider::GenerationBackend;
use mimic_types::llm::{CompletionRequest, LlmError, StreamEvent};

use self::config::OpenAiCompatConfig;
use self::streaming::map_openai_stream;

/// Backend for any OpenAI-compatible API.
///
/// Does NOT derive Debug: the `async_openai::Client` holds the API key.
pub struct OpenAiCompatibleBackend {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
}

impl OpenAiCompatibleBackend {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            provider_name: config.provider_name,
            model: config.model,
        }
    }

    /// Build a streaming [`CreateChatCompletionRequest`] carrying the prompt as one user turn.
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(request.prompt.clone()),
                name: None,
            },
        )];

        // Use the model from the request if set, otherwise fall back to config default
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            stream: Some(true),
            stream_options: Some(ChatCompletionStreamOptions {
                include_usage: Some(true),
                include_obfuscation: None,
            }),
            ..Default::default()
        }
    }
}

impl GenerationBackend for OpenAiCompatibleBackend {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let oai_request = self.build_request(&request);

        // Clone the client for the 'static stream closure
        let client = self.client.clone();

        Box::pin(async_stream::try_stream! {
            let oai_stream = client
                .chat()
                .create_stream(oai_request)
                .await
                .map_err(map_openai_error)?;

            let mut inner = map_openai_stream(oai_stream);

            use futures_util::StreamExt;
            while let Some(event) = inner.next().await {
                yield event?;
            }
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "authentication_error"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("API key not valid")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded"
                || error_type == "rate_limit_error"
                || error_type == "RESOURCE_EXHAUSTED"
            {
                LlmError::RateLimited {
                    retry_after_ms: None,
                }
            } else if code == "server_error" || error_type == "overloaded_error" {
                LlmError::Overloaded(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401 | 403) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited {
                retry_after_ms: None,
            },
            Some(503 | 529) => LlmError::Overloaded(err.to_string()),
            _ => LlmError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::StreamError(stream_err) => LlmError::Stream(stream_err.to_string()),
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn backend() -> OpenAiCompatibleBackend {
        OpenAiCompatibleBackend::new(config::gemini_defaults(
            SecretString::from("test-key".to_string()),
            "gemini-2.5-flash",
        ))
    }

    #[test]
    fn test_gemini_backend_identity() {
        let backend = backend();
        assert_eq!(backend.name(), "gemini");
        assert_eq!(backend.default_model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_build_request_single_user_turn() {
        let request = CompletionRequest::from_prompt("the whole prompt", 512, Some(0.5));
        let oai_req = backend().build_request(&request);
        assert_eq!(oai_req.model, "gemini-2.5-flash");
        assert_eq!(oai_req.messages.len(), 1);
        assert!(matches!(
            &oai_req.messages[0],
            ChatCompletionRequestMessage::User(_)
        ));
        assert_eq!(oai_req.max_completion_tokens, Some(512));
    }

    #[test]
    fn test_build_request_always_streams_with_usage() {
        let request = CompletionRequest::from_prompt("p", 64, None);
        let oai_req = backend().build_request(&request);
        assert_eq!(oai_req.stream, Some(true));
        let opts = oai_req.stream_options.unwrap();
        assert_eq!(opts.include_usage, Some(true));
    }

    #[test]
    fn test_build_request_explicit_model_wins() {
        let mut request = CompletionRequest::from_prompt("p", 64, None);
        request.model = "gemini-2.5-pro".to_string();
        let oai_req = backend().build_request(&request);
        assert_eq!(oai_req.model, "gemini-2.5-pro");
    }

    #[test]
    fn test_map_openai_error_api_auth() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Incorrect API key provided".to_string(),
            r#type: Some("authentication_error".to_string()),
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[test]
    fn test_map_openai_error_rate_limit() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Rate limit exceeded".to_string(),
            r#type: Some("rate_limit_error".to_string()),
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::RateLimited { .. }));
    }

    #[test]
    fn test_map_openai_error_invalid_argument() {
        use async_openai::error::OpenAIError;
        let err = map_openai_error(OpenAIError::InvalidArgument("bad arg".to_string()));
        assert!(matches!(err, LlmError::InvalidRequest(_)));
    }
}
