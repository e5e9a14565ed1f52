//! Shared domain types for Mimic.
//!
//! This crate contains the domain types used across the Mimic workspace:
//! chat requests and exchanges, user profiles and the owner persona, LLM
//! request/stream shapes, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod profile;
