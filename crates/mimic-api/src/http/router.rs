//! Axum router configuration with middleware.
//!
//! `POST /chat` sits at the root for bot clients; management routes are
//! under `/api/v1/`. Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Profiles
        .route("/profiles", get(handlers::profile::list_profiles))
        .route(
            "/profiles/{user_id}",
            get(handlers::profile::get_profile)
                .put(handlers::profile::put_profile)
                .patch(handlers::profile::patch_profile)
                .delete(handlers::profile::delete_profile),
        )
        // Personas
        .route(
            "/personas/{persona_id}",
            get(handlers::persona::get_persona)
                .put(handlers::persona::put_persona)
                .patch(handlers::persona::patch_persona),
        )
        // History
        .route(
            "/users/{user_id}/exchanges",
            get(handlers::history::list_exchanges),
        );

    Router::new()
        .route("/chat", post(handlers::chat::chat))
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
