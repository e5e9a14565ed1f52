//! SQLite conversation history repository implementation.
//!
//! Exchanges are append-only. Ordering uses the autoincrement `seq` column,
//! so two exchanges stamped with the same instant still come back in the
//! order they were written.

use mimic_core::repository::history::HistoryRepository;
use mimic_types::chat::Exchange;
use mimic_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `HistoryRepository`.
pub struct SqliteHistoryRepository {
    pool: DatabasePool,
}

impl SqliteHistoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_exchange(row: &sqlx::sqlite::SqliteRow) -> Result<Exchange, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let channel_id: String = row
        .try_get("channel_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let user_message: String = row
        .try_get("user_message")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let bot_reply: String = row
        .try_get("bot_reply")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(Exchange {
        id: Uuid::parse_str(&id)
            .map_err(|e| RepositoryError::Query(format!("invalid exchange id: {e}")))?,
        user_id,
        channel_id,
        user_message,
        bot_reply,
        created_at: parse_datetime(&created_at)?,
    })
}

impl HistoryRepository for SqliteHistoryRepository {
    async fn recent_exchanges(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<Exchange>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM exchanges WHERE user_id = ? ORDER BY seq DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_exchange).collect()
    }

    async fn append_exchange(&self, exchange: &Exchange) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO exchanges (id, user_id, channel_id, user_message, bot_reply, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(exchange.id.to_string())
        .bind(&exchange.user_id)
        .bind(&exchange.channel_id)
        .bind(&exchange.user_message)
        .bind(&exchange.bot_reply)
        .bind(format_datetime(&exchange.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("UNIQUE") {
                    return RepositoryError::Conflict(format!(
                        "exchange {} already recorded",
                        exchange.id
                    ));
                }
            }
            RepositoryError::Query(e.to_string())
        })?;

        Ok(())
    }
}
