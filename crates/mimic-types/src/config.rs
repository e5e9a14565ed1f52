//! Configuration types for Mimic.
//!
//! `MimicConfig` represents the top-level `config.toml`: which generation
//! backend to call and with what deadline, which persona the bot speaks as,
//! and where the HTTP server listens.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.mimic/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MimicConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Provider name used in logs and spans (e.g. "gemini", "openai").
    #[serde(default = "default_provider")]
    pub provider: String,
    /// OpenAI-compatible endpoint base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Hard deadline for one generation call, in seconds.
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl GenerationConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "LLM_API_KEY".to_string()
}

fn default_deadline_secs() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            deadline_secs: default_deadline_secs(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

/// Who the bot impersonates and which languages it may answer in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Key of the persona record consulted on every request.
    #[serde(default = "default_persona_id")]
    pub persona_id: String,
    /// Name the bot speaks as.
    #[serde(default = "default_owner_name")]
    pub owner_name: String,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

fn default_persona_id() -> String {
    "owner".to_string()
}

fn default_owner_name() -> String {
    "the owner".to_string()
}

fn default_languages() -> Vec<String> {
    vec![
        "Benglish".to_string(),
        "Hinglish".to_string(),
        "English".to_string(),
    ]
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            persona_id: default_persona_id(),
            owner_name: default_owner_name(),
            languages: default_languages(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = MimicConfig::default();
        assert_eq!(config.generation.model, "gemini-2.5-flash");
        assert_eq!(config.generation.api_key_env, "LLM_API_KEY");
        assert_eq!(config.generation.deadline(), Duration::from_secs(30));
        assert_eq!(config.persona.persona_id, "owner");
        assert_eq!(config.persona.languages.len(), 3);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: MimicConfig = toml::from_str("").unwrap();
        assert_eq!(config.generation.provider, "gemini");
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.generation.temperature.is_none());
    }

    #[test]
    fn test_config_deserialize_partial_sections() {
        let toml_str = r#"
[generation]
model = "gpt-4o-mini"
deadline_secs = 10
temperature = 0.9

[persona]
owner_name = "Suman"
languages = ["English"]
"#;
        let config: MimicConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.deadline_secs, 10);
        assert_eq!(config.generation.temperature, Some(0.9));
        // Unset keys in a present section still default.
        assert_eq!(config.generation.max_tokens, 1024);
        assert_eq!(config.persona.owner_name, "Suman");
        assert_eq!(config.persona.persona_id, "owner");
        assert_eq!(config.persona.languages, vec!["English".to_string()]);
        assert_eq!(config.server.port, 8000);
    }
}
