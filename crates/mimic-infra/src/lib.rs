//! Infrastructure layer for Mimic.
//!
//! Contains implementations of the ports defined in `mimic-core`: SQLite
//! repositories for profiles, personas and conversation history, the
//! OpenAI-compatible streaming generation backend, and configuration loading.

pub mod config;
pub mod llm;
pub mod sqlite;
