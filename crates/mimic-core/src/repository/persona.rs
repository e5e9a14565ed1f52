//! Persona repository trait definition.

use mimic_types::error::RepositoryError;
use mimic_types::profile::Persona;

/// Repository trait for owner persona persistence.
pub trait PersonaRepository: Send + Sync {
    fn get_persona(
        &self,
        persona_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Persona>, RepositoryError>> + Send;

    /// Create or replace a persona. Returns the stored persona.
    fn upsert_persona(
        &self,
        persona: &Persona,
    ) -> impl std::future::Future<Output = Result<Persona, RepositoryError>> + Send;
}
