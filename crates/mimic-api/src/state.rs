//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! The pipeline and services are generic over repository traits; AppState
//! pins them to the SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;

use mimic_core::chat::orchestrator::ChatOrchestrator;
use mimic_core::llm::box_provider::BoxGenerationBackend;
use mimic_core::service::profile::ProfileService;
use mimic_infra::config::{load_config, resolve_api_key, resolve_data_dir};
use mimic_infra::llm::create_backend;
use mimic_infra::sqlite::history::SqliteHistoryRepository;
use mimic_infra::sqlite::persona::SqlitePersonaRepository;
use mimic_infra::sqlite::pool::{DatabasePool, database_url};
use mimic_infra::sqlite::profile::SqliteProfileRepository;
use mimic_types::config::MimicConfig;

use crate::http::error::AppError;

/// Concrete type aliases for the generics pinned to infra implementations.
pub type ConcreteOrchestrator =
    ChatOrchestrator<SqliteProfileRepository, SqlitePersonaRepository, SqliteHistoryRepository>;

pub type ConcreteProfileService = ProfileService<SqliteProfileRepository, SqlitePersonaRepository>;

/// Shared application state.
///
/// `orchestrator` is `None` when no generation backend could be built (no
/// API key); profile, persona, and history commands still work in that case.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Option<Arc<ConcreteOrchestrator>>,
    pub profile_service: Arc<ConcreteProfileService>,
    pub history: Arc<SqliteHistoryRepository>,
    pub config: Arc<MimicConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let api_key = resolve_api_key(&config.generation);
        let backend = match create_backend(&config.generation, api_key) {
            Ok(backend) => Some(backend),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    api_key_env = %config.generation.api_key_env,
                    "Generation backend unavailable, chat is disabled"
                );
                None
            }
        };

        Ok(Self::from_parts(config, data_dir, db_pool, backend))
    }

    /// Wire services around an already-open pool and an optional backend.
    pub fn from_parts(
        config: MimicConfig,
        data_dir: PathBuf,
        db_pool: DatabasePool,
        backend: Option<BoxGenerationBackend>,
    ) -> Self {
        let profiles = Arc::new(SqliteProfileRepository::new(db_pool.clone()));
        let personas = Arc::new(SqlitePersonaRepository::new(db_pool.clone()));
        let history = Arc::new(SqliteHistoryRepository::new(db_pool.clone()));

        let orchestrator = backend.map(|backend| {
            Arc::new(ChatOrchestrator::from_config(
                Arc::clone(&profiles),
                Arc::clone(&personas),
                Arc::clone(&history),
                Arc::new(backend),
                &config,
            ))
        });

        let profile_service = ProfileService::new(profiles, personas);

        Self {
            orchestrator,
            profile_service: Arc::new(profile_service),
            history,
            config: Arc::new(config),
            data_dir,
        }
    }

    /// The chat pipeline, or `Unavailable` when no backend is configured.
    pub fn require_orchestrator(&self) -> Result<&Arc<ConcreteOrchestrator>, AppError> {
        self.orchestrator.as_ref().ok_or_else(|| {
            AppError::Unavailable(format!(
                "generation backend not configured (set MIMIC_API_KEY or {})",
                self.config.generation.api_key_env
            ))
        })
    }
}
