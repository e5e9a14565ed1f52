//! Generation backend implementations.
//!
//! Contains the concrete implementation of the [`GenerationBackend`] trait
//! defined in `mimic-core` and a factory ([`create_backend`]) that builds the
//! configured backend from [`GenerationConfig`].
//!
//! [`GenerationBackend`]: mimic_core::llm::provider::GenerationBackend

pub mod openai_compat;

use secrecy::SecretString;

use mimic_core::llm::box_provider::BoxGenerationBackend;
use mimic_types::config::GenerationConfig;
use mimic_types::llm::LlmError;

use self::openai_compat::OpenAiCompatibleBackend;
use self::openai_compat::config::{
    OpenAiCompatConfig, gemini_defaults, mistral_defaults, openai_defaults,
};

/// Create a [`BoxGenerationBackend`] from configuration and a resolved API key.
///
/// A non-empty `base_url` is used as-is; otherwise the base URL is inferred
/// from the provider name for well-known providers.
///
/// # Errors
///
/// Returns `AuthenticationFailed` when no API key is available.
pub fn create_backend(
    config: &GenerationConfig,
    api_key: Option<SecretString>,
) -> Result<BoxGenerationBackend, LlmError> {
    let key = api_key.ok_or(LlmError::AuthenticationFailed)?;

    let oai_config = if !config.base_url.trim().is_empty() {
        OpenAiCompatConfig {
            provider_name: config.provider.clone(),
            base_url: config.base_url.clone(),
            api_key: key,
            model: config.model.clone(),
        }
    } else {
        match config.provider.as_str() {
            "openai" => openai_defaults(key, &config.model),
            "mistral" => mistral_defaults(key, &config.model),
            _ => gemini_defaults(key, &config.model),
        }
    };

    tracing::debug!(
        provider = %oai_config.provider_name,
        base_url = %oai_config.base_url,
        model = %oai_config.model,
        "Generation backend configured"
    );

    Ok(BoxGenerationBackend::new(OpenAiCompatibleBackend::new(oai_config)))
}
