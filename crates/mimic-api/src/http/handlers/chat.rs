//! Chat endpoint used by chat-platform bots.

use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;

use mimic_types::chat::ChatRequest;

use crate::http::error::AppError;
use crate::state::AppState;

/// Header carrying how the reply was produced (`completed`, `timeout_fallback`, ...).
pub const OUTCOME_HEADER: &str = "x-chat-outcome";

/// Header carrying the pipeline time in milliseconds.
pub const RESPONSE_TIME_HEADER: &str = "x-response-time-ms";

/// POST /chat - Run one message through the reply pipeline.
///
/// The body is returned unwrapped (`{"reply": "..."}`) for existing bot
/// clients. Generation failures still produce a 200 with a fallback reply;
/// the outcome header tells them apart.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Response, AppError> {
    body.validate().map_err(AppError::Validation)?;
    let orchestrator = state.require_orchestrator()?;

    let result = orchestrator.process_chat_with_outcome(&body).await;

    let mut response = Json(result.reply).into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&result.outcome.to_string()) {
        headers.insert(OUTCOME_HEADER, value);
    }
    headers.insert(
        RESPONSE_TIME_HEADER,
        HeaderValue::from(result.elapsed.as_millis() as u64),
    );

    Ok(response)
}
