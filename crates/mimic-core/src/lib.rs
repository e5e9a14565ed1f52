//! Business logic and repository trait definitions for Mimic.
//!
//! This crate defines the "ports" (repository and generation backend traits)
//! that the infrastructure layer implements, plus the message-to-reply
//! pipeline built on top of them. It depends only on `mimic-types` -- never
//! on `mimic-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
