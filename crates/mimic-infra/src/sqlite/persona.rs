//! SQLite persona repository implementation.

use mimic_core::repository::persona::PersonaRepository;
use mimic_types::error::RepositoryError;
use mimic_types::profile::Persona;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_attributes, format_datetime, parse_attributes, parse_datetime};

/// SQLite-backed implementation of `PersonaRepository`.
pub struct SqlitePersonaRepository {
    pool: DatabasePool,
}

impl SqlitePersonaRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_persona(row: &sqlx::sqlite::SqliteRow) -> Result<Persona, RepositoryError> {
    let persona_id: String = row
        .try_get("persona_id")
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

    Ok(Persona {
        persona_id,
        attributes: parse_attributes(&attributes)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl PersonaRepository for SqlitePersonaRepository {
    async fn get_persona(&self, persona_id: &str) -> Result<Option<Persona>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM personas WHERE persona_id = ?")
            .bind(persona_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(row_to_persona).transpose()
    }

    async fn upsert_persona(&self, persona: &Persona) -> Result<Persona, RepositoryError> {
        sqlx::query(
            "INSERT INTO personas (persona_id, attributes, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(persona_id) DO UPDATE SET
                attributes = excluded.attributes,
                updated_at = excluded.updated_at",
        )
        .bind(&persona.persona_id)
        .bind(format_attributes(&persona.attributes)?)
        .bind(format_datetime(&persona.created_at))
        .bind(format_datetime(&persona.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(persona.clone())
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

    #[tokio::test]
    async fn test_upsert_and_get_persona() {
        let repo = SqlitePersonaRepository::new(test_pool().await);
        assert!(repo.get_persona("owner").await.unwrap().is_none());

        let now = Utc::now();
        let persona = Persona {
            persona_id: "owner".to_string(),
            attributes: json!({"name": "Suman", "likes": ["football", "biryani"]})
                .as_object()
                .cloned()
                .unwrap(),
            created_at: now,
            updated_at: now,
        };
        repo.upsert_persona(&persona).await.unwrap();

        let fetched = repo.get_persona("owner").await.unwrap().unwrap();
        assert_eq!(fetched.attributes["likes"], json!(["football", "biryani"]));

        let mut changed = persona.clone();
        changed.attributes.insert("city".to_string(), json!("Kolkata"));
        repo.upsert_persona(&changed).await.unwrap();
        let fetched = repo.get_persona("owner").await.unwrap().unwrap();
        assert_eq!(fetched.attributes.len(), 3);
    }
}
