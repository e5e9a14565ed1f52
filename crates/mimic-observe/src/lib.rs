//! Observability setup for Mimic: structured logging and optional
//! OpenTelemetry trace export.

pub mod tracing_setup;
