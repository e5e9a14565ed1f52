//! The message-to-reply pipeline.
//!
//! `ChatOrchestrator` drives a request through `ContextGatherer` (concurrent
//! lookups), `PromptBuilder` (pure), `GenerationInvoker` (bounded streaming
//! call) and `ConversationRecorder` (append-only history).

pub mod context;
pub mod invoker;
pub mod orchestrator;
pub mod prompt;
pub mod recorder;
