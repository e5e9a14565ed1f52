//! Generation backend abstractions for Mimic.
//!
//! - `GenerationBackend`: streaming trait for concrete backend implementations
//! - `BoxGenerationBackend`: type-erased wrapper shared by the pipeline

pub mod box_provider;
pub mod provider;
