//! Persona handlers for the REST API.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;

use mimic_types::profile::{Persona, UpsertPersonaRequest};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/personas/{persona_id}
pub async fn get_persona(
    State(state): State<AppState>,
    Path(persona_id): Path<String>,
) -> Result<ApiResponse<Persona>, AppError> {
    let start = Instant::now();
    let persona = state.profile_service.get_persona(&persona_id).await?;

    Ok(persona_response(persona, start))
}

/// PUT /api/v1/personas/{persona_id} - Create or replace a persona.
pub async fn put_persona(
    State(state): State<AppState>,
    Path(persona_id): Path<String>,
    Json(body): Json<UpsertPersonaRequest>,
) -> Result<ApiResponse<Persona>, AppError> {
    let start = Instant::now();
    let persona = state
        .profile_service
        .put_persona(&persona_id, body.attributes)
        .await?;

    tracing::info!(persona_id = %persona.persona_id, "Persona saved");
    Ok(persona_response(persona, start))
}

/// PATCH /api/v1/personas/{persona_id} - Merge attribute keys into a persona.
pub async fn patch_persona(
    State(state): State<AppState>,
    Path(persona_id): Path<String>,
    Json(body): Json<UpsertPersonaRequest>,
) -> Result<ApiResponse<Persona>, AppError> {
    let start = Instant::now();
    let persona = state
        .profile_service
        .patch_persona(&persona_id, body.attributes)
        .await?;

    Ok(persona_response(persona, start))
}

fn persona_response(persona: Persona, start: Instant) -> ApiResponse<Persona> {
    let self_link = format!("/api/v1/personas/{}", persona.persona_id);
    ApiResponse::timed(persona, start).with_link("self", &self_link)
}
