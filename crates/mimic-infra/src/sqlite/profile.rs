//! SQLite profile repository implementation.

use mimic_core::repository::profile::ProfileRepository;
use mimic_types::error::RepositoryError;
use mimic_types::profile::Profile;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_attributes, format_datetime, parse_attributes, parse_datetime};

/// SQLite-backed implementation of `ProfileRepository`.
pub struct SqliteProfileRepository {
    pool: DatabasePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> Result<Profile, RepositoryError> {
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let user_name: Option<String> = row
        .try_get("user_name")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let attributes: String = row
        .try_get("attributes")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let updated_at: String = row
        .try_get("updated_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(Profile {
        user_id,
        user_name,
        attributes: parse_attributes(&attributes)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl ProfileRepository for SqliteProfileRepository {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, RepositoryError> {
        sqlx::query(
            "INSERT INTO profiles (user_id, user_name, attributes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                user_name = excluded.user_name,
                attributes = excluded.attributes,
                updated_at = excluded.updated_at",
        )
        .bind(&profile.user_id)
        .bind(&profile.user_name)
        .bind(format_attributes(&profile.attributes)?)
        .bind(format_datetime(&profile.created_at))
        .bind(format_datetime(&profile.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(profile.clone())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM profiles ORDER BY user_id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_profile).collect()
    }

    async fn delete_profile(&self, user_id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_profile(user_id: &str, attributes: serde_json::Value) -> Profile {
        let now = Utc::now();
        Profile {
            user_id: user_id.to_string(),
            user_name: Some(format!("{user_id} display")),
            attributes: attributes.as_object().cloned().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get_profile() {
        let repo = SqliteProfileRepository::new(test_pool().await);
        let profile = make_profile("alice", json!({"relationship": "friend", "nicknames": ["ali"]}));
        repo.upsert_profile(&profile).await.unwrap();

        let fetched = repo.get_profile("alice").await.unwrap().unwrap();
        assert_eq!(fetched.attributes, profile.attributes);
        assert_eq!(fetched.user_name.as_deref(), Some("alice display"));
    }

    #[tokio::test]
    async fn test_get_missing_profile_is_none() {
        let repo = SqliteProfileRepository::new(test_pool().await);
        assert!(repo.get_profile("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_single_row() {
        let repo = SqliteProfileRepository::new(test_pool().await);
        let original = make_profile("alice", json!({"tone": "calm"}));
        repo.upsert_profile(&original).await.unwrap();

        let mut updated = make_profile("alice", json!({"tone": "playful"}));
        updated.user_name = None;
        repo.upsert_profile(&updated).await.unwrap();

        let all = repo.list_profiles().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].attributes["tone"], "playful");
        assert!(all[0].user_name.is_none());
        // created_at is kept from the first insert.
        assert_eq!(
            all[0].created_at.timestamp_millis(),
            original.created_at.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_list_profiles_sorted() {
        let repo = SqliteProfileRepository::new(test_pool().await);
        for id in ["carol", "alice", "bob"] {
            repo.upsert_profile(&make_profile(id, json!({}))).await.unwrap();
        }
        let ids: Vec<String> = repo
            .list_profiles()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.user_id)
            .collect();
        assert_eq!(ids, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_delete_profile() {
        let repo = SqliteProfileRepository::new(test_pool().await);
        repo.upsert_profile(&make_profile("alice", json!({}))).await.unwrap();

        repo.delete_profile("alice").await.unwrap();
        assert!(repo.get_profile("alice").await.unwrap().is_none());
        assert!(matches!(
            repo.delete_profile("alice").await,
            Err(RepositoryError::NotFound)
        ));
    }
}
