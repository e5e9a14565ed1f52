//! Configuration loader for Mimic.
//!
//! Reads `config.toml` from the data directory (`~/.mimic/` in production)
//! and deserializes it into [`MimicConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use mimic_types::config::{GenerationConfig, MimicConfig};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "MIMIC_DATA_DIR";

/// Environment variable holding the API key; takes precedence over `api_key_env`.
pub const API_KEY_ENV: &str = "MIMIC_API_KEY";

/// Environment variable that overrides `persona.persona_id`.
pub const PERSONA_ID_ENV: &str = "MIMIC_PERSONA_ID";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `MIMIC_DATA_DIR` environment variable
/// 2. `~/.mimic`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".mimic");
    }

    // Last resort: current directory
    PathBuf::from(".mimic")
}

/// Load configuration from `{data_dir}/config.toml` with environment overrides applied.
///
/// - If the file does not exist, starts from [`MimicConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and starts from the default.
pub async fn load_config(data_dir: &Path) -> MimicConfig {
    let config = read_config_file(data_dir).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

async fn read_config_file(data_dir: &Path) -> MimicConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return MimicConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return MimicConfig::default();
        }
    };

    match toml::from_str::<MimicConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            MimicConfig::default()
        }
    }
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides(
    mut config: MimicConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> MimicConfig {
    if let Some(persona_id) = lookup(PERSONA_ID_ENV).filter(|v| !v.trim().is_empty()) {
        config.persona.persona_id = persona_id;
    }
    config
}

/// Resolve the backend API key.
///
/// Priority:
/// 1. `MIMIC_API_KEY`
/// 2. The variable named by `generation.api_key_env` (default `LLM_API_KEY`)
pub fn resolve_api_key(config: &GenerationConfig) -> Option<SecretString> {
    resolve_api_key_with(config, |key| std::env::var(key).ok())
}

fn resolve_api_key_with(
    config: &GenerationConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    lookup(API_KEY_ENV)
        .or_else(|| lookup(&config.api_key_env))
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn read_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config_file(tmp.path()).await;
        assert_eq!(config.generation.model, "gemini-2.5-flash");
        assert_eq!(config.server.port, 8000);
    }

    #[tokio::test]
    async fn read_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[generation]
deadline_secs = 12

[server]
port = 9090
"#,
        )
        .await
        .unwrap();

        let config = read_config_file(tmp.path()).await;
        assert_eq!(config.generation.deadline_secs, 12);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.persona.persona_id, "owner");
    }

    #[tokio::test]
    async fn read_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = read_config_file(tmp.path()).await;
        assert_eq!(config.generation.deadline_secs, 30);
    }

    #[test]
    fn env_override_persona_id() {
        let config = apply_env_overrides(MimicConfig::default(), env(&[(PERSONA_ID_ENV, "pratik")]));
        assert_eq!(config.persona.persona_id, "pratik");

        let config = apply_env_overrides(MimicConfig::default(), env(&[(PERSONA_ID_ENV, "  ")]));
        assert_eq!(config.persona.persona_id, "owner");
    }

    #[test]
    fn api_key_prefers_mimic_api_key() {
        let config = GenerationConfig::default();
        let key = resolve_api_key_with(
            &config,
            env(&[(API_KEY_ENV, "primary"), ("LLM_API_KEY", "secondary")]),
        )
        .unwrap();
        assert_eq!(key.expose_secret(), "primary");
    }

    #[test]
    fn api_key_falls_back_to_configured_env() {
        let config = GenerationConfig {
            api_key_env: "GEMINI_KEY".to_string(),
            ..GenerationConfig::default()
        };
        let key = resolve_api_key_with(&config, env(&[("GEMINI_KEY", "g")])).unwrap();
        assert_eq!(key.expose_secret(), "g");
        assert!(resolve_api_key_with(&config, env(&[])).is_none());
    }

    #[test]
    fn resolve_data_dir_ends_with_mimic_or_env() {
        let dir = resolve_data_dir();
        match std::env::var(DATA_DIR_ENV) {
            Ok(value) => assert_eq!(dir, PathBuf::from(value)),
            Err(_) => assert!(dir.ends_with(".mimic")),
        }
    }
}
