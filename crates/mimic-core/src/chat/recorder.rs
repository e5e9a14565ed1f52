//! Persistence of completed exchanges.

use std::sync::Arc;

use tracing::debug;

use mimic_types::chat::Exchange;
use mimic_types::error::RepositoryError;

use crate::repository::history::HistoryRepository;

/// Appends one `Exchange` per successfully generated reply.
pub struct ConversationRecorder<H> {
    history: Arc<H>,
}

impl<H> Clone for ConversationRecorder<H> {
    fn clone(&self) -> Self {
        Self {
            history: Arc::clone(&self.history),
        }
    }
}

impl<H: HistoryRepository> ConversationRecorder<H> {
    pub fn new(history: Arc<H>) -> Self {
        Self { history }
    }

    /// Store the exchange and return it. The caller decides what a failure means.
    pub async fn record(
        &self,
        user_id: &str,
        channel_id: &str,
        user_message: &str,
        reply: &str,
    ) -> Result<Exchange, RepositoryError> {
        let exchange = Exchange::new(user_id, channel_id, user_message, reply);
        self.history.append_exchange(&exchange).await?;
        debug!(exchange_id = %exchange.id, user_id, "Exchange recorded");
        Ok(exchange)
    }
}
