//! Query parameter extractors for list endpoints.

use serde::Deserialize;

use mimic_types::chat::RECENT_EXCHANGE_LIMIT;

/// Largest page the history endpoint will return.
pub const MAX_HISTORY_LIMIT: u32 = 50;

/// Query parameters for the exchange history endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    /// Maximum results, clamped to `1..=50`.
    pub limit: Option<u32>,
}

impl HistoryQuery {
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(RECENT_EXCHANGE_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}
