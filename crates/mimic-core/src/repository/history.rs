//! Conversation history repository trait definition.

use mimic_types::chat::Exchange;
use mimic_types::error::RepositoryError;

/// Append-only store of (user message, bot reply) exchanges.
pub trait HistoryRepository: Send + Sync {
    /// Return up to `limit` exchanges for a user, most recent first.
    ///
    /// Ordering follows insertion order, not the wall-clock timestamp.
    fn recent_exchanges(
        &self,
        user_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Exchange>, RepositoryError>> + Send;

    /// Append one exchange.
    fn append_exchange(
        &self,
        exchange: &Exchange,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
