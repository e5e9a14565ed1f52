//! HTTP/REST API layer for Mimic.
//!
//! Axum-based API: the unwrapped `POST /chat` endpoint used by chat-platform
//! bots, plus envelope-format profile, persona, and history routes under
//! `/api/v1/`.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
