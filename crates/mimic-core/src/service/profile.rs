//! Profile and persona management service.
//!
//! Backs the admin CRUD surface (HTTP and CLI). The chat pipeline reads the
//! same stores directly through `ContextGatherer`.

use std::sync::Arc;

use chrono::Utc;

use mimic_types::error::{ProfileError, RepositoryError};
use mimic_types::profile::{Persona, Profile, attributes_from_value, merge_attributes};

use crate::repository::persona::PersonaRepository;
use crate::repository::profile::ProfileRepository;

/// Service for reading and editing user profiles and the owner persona.
pub struct ProfileService<P, R> {
    profiles: Arc<P>,
    personas: Arc<R>,
}

impl<P: ProfileRepository, R: PersonaRepository> ProfileService<P, R> {
    pub fn new(profiles: Arc<P>, personas: Arc<R>) -> Self {
        Self { profiles, personas }
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, ProfileError> {
        let user_id = validate_id(user_id)?;
        self.profiles
            .get_profile(user_id)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>, ProfileError> {
        Ok(self.profiles.list_profiles().await?)
    }

    /// Create or replace a profile. `created_at` survives replacement.
    pub async fn put_profile(
        &self,
        user_id: &str,
        user_name: Option<String>,
        attributes: serde_json::Value,
    ) -> Result<Profile, ProfileError> {
        let user_id = validate_id(user_id)?;
        let attributes =
            attributes_from_value(attributes).map_err(ProfileError::InvalidAttributes)?;

        let now = Utc::now();
        let created_at = self
            .profiles
            .get_profile(user_id)
            .await?
            .map(|p| p.created_at)
            .unwrap_or(now);

        let profile = Profile {
            user_id: user_id.to_string(),
            user_name,
            attributes,
            created_at,
            updated_at: now,
        };
        Ok(self.profiles.upsert_profile(&profile).await?)
    }

    /// Merge top-level attribute keys into an existing profile.
    ///
    /// A `null` value removes the key. `user_name` is only replaced when given.
    pub async fn patch_profile(
        &self,
        user_id: &str,
        user_name: Option<String>,
        attributes: serde_json::Value,
    ) -> Result<Profile, ProfileError> {
        let user_id = validate_id(user_id)?;
        let patch = attributes_from_value(attributes).map_err(ProfileError::InvalidAttributes)?;

        let mut profile = self
            .profiles
            .get_profile(user_id)
            .await?
            .ok_or(ProfileError::NotFound)?;
        merge_attributes(&mut profile.attributes, patch);
        if user_name.is_some() {
            profile.user_name = user_name;
        }
        profile.updated_at = Utc::now();

        Ok(self.profiles.upsert_profile(&profile).await?)
    }

    pub async fn delete_profile(&self, user_id: &str) -> Result<(), ProfileError> {
        let user_id = validate_id(user_id)?;
        Ok(self.profiles.delete_profile(user_id).await?)
    }

    pub async fn get_persona(&self, persona_id: &str) -> Result<Persona, ProfileError> {
        let persona_id = validate_id(persona_id)?;
        self.personas
            .get_persona(persona_id)
            .await
            .map_err(storage_error)?
            .ok_or(ProfileError::PersonaNotFound)
    }

    /// Create or replace a persona. `created_at` survives replacement.
    pub async fn put_persona(
        &self,
        persona_id: &str,
        attributes: serde_json::Value,
    ) -> Result<Persona, ProfileError> {
        let persona_id = validate_id(persona_id)?;
        let attributes =
            attributes_from_value(attributes).map_err(ProfileError::InvalidAttributes)?;

        let now = Utc::now();
        let created_at = self
            .personas
            .get_persona(persona_id)
            .await
            .map_err(storage_error)?
            .map(|p| p.created_at)
            .unwrap_or(now);

        let persona = Persona {
            persona_id: persona_id.to_string(),
            attributes,
            created_at,
            updated_at: now,
        };
        self.personas
            .upsert_persona(&persona)
            .await
            .map_err(storage_error)
    }

    /// Merge top-level attribute keys into an existing persona.
    pub async fn patch_persona(
        &self,
        persona_id: &str,
        attributes: serde_json::Value,
    ) -> Result<Persona, ProfileError> {
        let persona_id = validate_id(persona_id)?;
        let patch = attributes_from_value(attributes).map_err(ProfileError::InvalidAttributes)?;

        let mut persona = self
            .personas
            .get_persona(persona_id)
            .await
            .map_err(storage_error)?
            .ok_or(ProfileError::PersonaNotFound)?;
        merge_attributes(&mut persona.attributes, patch);
        persona.updated_at = Utc::now();

        self.personas
            .upsert_persona(&persona)
            .await
            .map_err(storage_error)
    }
}

fn validate_id(id: &str) -> Result<&str, ProfileError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ProfileError::InvalidId("identifier cannot be empty".to_string()));
    }
    if id.len() > 128 {
        return Err(ProfileError::InvalidId(
            "identifier must be at most 128 characters".to_string(),
        ));
    }
    Ok(id)
}

fn storage_error(e: RepositoryError) -> ProfileError {
    ProfileError::StorageError(e.to_string())
}
