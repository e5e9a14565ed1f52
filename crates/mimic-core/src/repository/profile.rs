//! Profile repository trait definition.

use mimic_types::error::RepositoryError;
use mimic_types::profile::Profile;

/// Repository trait for per-user profile persistence.
///
/// At most one profile exists per `user_id`; `upsert` replaces it wholesale.
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile for a user, if any.
    fn get_profile(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Profile>, RepositoryError>> + Send;

    /// Create or replace a profile. Returns the stored profile.
    fn upsert_profile(
        &self,
        profile: &Profile,
    ) -> impl std::future::Future<Output = Result<Profile, RepositoryError>> + Send;

    /// List all profiles ordered by `user_id`.
    fn list_profiles(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Profile>, RepositoryError>> + Send;

    /// Delete a profile. Returns `NotFound` if it did not exist.
    fn delete_profile(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
