//! REST API handlers.

pub mod chat;
pub mod history;
pub mod persona;
pub mod profile;
