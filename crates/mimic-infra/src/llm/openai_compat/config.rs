//! Configuration and per-provider defaults for OpenAI-compatible backends.
//!
//! Each provider that speaks the OpenAI chat completions protocol gets a factory
//! function returning an [`OpenAiCompatConfig`] with the correct base URL.

use secrecy::SecretString;

/// Configuration for an OpenAI-compatible generation backend.
///
/// Used to construct an [`super::OpenAiCompatibleBackend`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "gemini").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model identifier (e.g., "gpt-4o", "gemini-2.5-flash").
    pub model: String,
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key,
        model: model.into(),
    }
}

/// Google Gemini default configuration (OpenAI-compatible beta endpoint).
///
/// Base URL: `https://generativelanguage.googleapis.com/v1beta/openai`
pub fn gemini_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
        api_key,
        model: model.into(),
    }
}

/// Mistral AI default configuration.
///
/// Base URL: `https://api.mistral.ai/v1`
pub fn mistral_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "mistral".into(),
        base_url: "https://api.mistral.ai/v1".into(),
        api_key,
        model: model.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_gemini_defaults() {
        let config = gemini_defaults(SecretString::from("g-key".to_string()), "gemini-2.5-flash");
        assert_eq!(config.provider_name, "gemini");
        assert!(config.base_url.contains("generativelanguage.googleapis.com"));
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.api_key.expose_secret(), "g-key");
    }

    #[test]
    fn test_openai_defaults() {
        let config = openai_defaults(SecretString::from("sk".to_string()), "gpt-4o-mini");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
    }
}
