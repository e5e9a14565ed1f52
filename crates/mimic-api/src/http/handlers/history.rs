//! Exchange history handler.

use std::time::Instant;

use axum::extract::{Path, Query, State};

use mimic_core::repository::history::HistoryRepository;
use mimic_types::chat::Exchange;

use crate::http::error::AppError;
use crate::http::extractors::query::HistoryQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users/{user_id}/exchanges - Most recent exchanges, newest first.
pub async fn list_exchanges(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<ApiResponse<Vec<Exchange>>, AppError> {
    let start = Instant::now();
    if user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id must not be empty".to_string()));
    }

    let exchanges = state
        .history
        .recent_exchanges(&user_id, query.effective_limit())
        .await?;

    let self_link = format!("/api/v1/users/{user_id}/exchanges");
    Ok(ApiResponse::timed(exchanges, start).with_link("self", &self_link))
}
