//! Profile CRUD handlers for the REST API.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;

use mimic_types::profile::{Profile, UpsertProfileRequest};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/profiles - List all profiles.
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Profile>>, AppError> {
    let start = Instant::now();
    let profiles = state.profile_service.list_profiles().await?;

    Ok(ApiResponse::timed(profiles, start).with_link("self", "/api/v1/profiles"))
}

/// GET /api/v1/profiles/{user_id} - Get a single profile.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Profile>, AppError> {
    let start = Instant::now();
    let profile = state.profile_service.get_profile(&user_id).await?;

    Ok(profile_response(profile, start))
}

/// PUT /api/v1/profiles/{user_id} - Create or replace a profile.
pub async fn put_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<UpsertProfileRequest>,
) -> Result<ApiResponse<Profile>, AppError> {
    let start = Instant::now();
    let profile = state
        .profile_service
        .put_profile(&user_id, body.user_name, body.attributes)
        .await?;

    tracing::info!(user_id = %profile.user_id, "Profile saved");
    Ok(profile_response(profile, start))
}

/// PATCH /api/v1/profiles/{user_id} - Merge attribute keys into a profile.
pub async fn patch_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<UpsertProfileRequest>,
) -> Result<ApiResponse<Profile>, AppError> {
    let start = Instant::now();
    let profile = state
        .profile_service
        .patch_profile(&user_id, body.user_name, body.attributes)
        .await?;

    Ok(profile_response(profile, start))
}

/// DELETE /api/v1/profiles/{user_id} - Delete a profile.
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let start = Instant::now();
    state.profile_service.delete_profile(&user_id).await?;

    tracing::info!(user_id = %user_id, "Profile deleted");
    Ok(ApiResponse::timed(
        serde_json::json!({ "deleted": true, "user_id": user_id }),
        start,
    ))
}

fn profile_response(profile: Profile, start: Instant) -> ApiResponse<Profile> {
    let self_link = format!("/api/v1/profiles/{}", profile.user_id);
    let exchanges_link = format!("/api/v1/users/{}/exchanges", profile.user_id);
    ApiResponse::timed(profile, start)
        .with_link("self", &self_link)
        .with_link("exchanges", &exchanges_link)
}
