//! Chat orchestration.
//!
//! Drives one request through the pipeline phases
//! `Gathering -> Building -> Generating -> Recording -> Done`, with
//! `Generating -> Failed -> Done` on the fallback path. Callers always get a reply: generation
//! failures turn into a fixed fallback text and are never recorded.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{Instrument, debug, error, info, info_span, warn};

use mimic_types::chat::{ChatOutcome, ChatPhase, ChatReply, ChatRequest, ChatResult};
use mimic_types::config::MimicConfig;
use mimic_types::error::GenerationError;

use crate::llm::box_provider::BoxGenerationBackend;
use crate::repository::history::HistoryRepository;
use crate::repository::persona::PersonaRepository;
use crate::repository::profile::ProfileRepository;

use super::context::ContextGatherer;
use super::invoker::GenerationInvoker;
use super::prompt::PromptBuilder;
use super::recorder::ConversationRecorder;

/// Reply returned when generation exceeds its deadline.
pub const TIMEOUT_FALLBACK: &str = "Sorry, I took too long to respond. Please try again.";

/// Reply returned for any other generation failure.
pub const BACKEND_FALLBACK: &str = "Sorry, something went wrong. Please try again later.";

/// Coordinates context gathering, prompt assembly, generation, and recording.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct ChatOrchestrator<P, R, H> {
    gatherer: ContextGatherer<P, R, H>,
    prompts: PromptBuilder,
    invoker: GenerationInvoker,
    recorder: ConversationRecorder<H>,
    persona_id: String,
    deadline: Duration,
}

impl<P, R, H> ChatOrchestrator<P, R, H>
where
    P: ProfileRepository,
    R: PersonaRepository,
    H: HistoryRepository,
{
    pub fn new(
        gatherer: ContextGatherer<P, R, H>,
        prompts: PromptBuilder,
        invoker: GenerationInvoker,
        recorder: ConversationRecorder<H>,
        persona_id: impl Into<String>,
        deadline: Duration,
    ) -> Self {
        Self {
            gatherer,
            prompts,
            invoker,
            recorder,
            persona_id: persona_id.into(),
            deadline,
        }
    }

    /// Wire the pipeline from shared stores, a backend, and configuration.
    pub fn from_config(
        profiles: Arc<P>,
        personas: Arc<R>,
        history: Arc<H>,
        backend: Arc<BoxGenerationBackend>,
        config: &MimicConfig,
    ) -> Self {
        let gatherer = ContextGatherer::new(profiles, personas, Arc::clone(&history));
        let invoker = GenerationInvoker::new(
            backend,
            config.generation.max_tokens,
            config.generation.temperature,
        );
        Self::new(
            gatherer,
            PromptBuilder::from_config(&config.persona),
            invoker,
            ConversationRecorder::new(history),
            config.persona.persona_id.clone(),
            config.generation.deadline(),
        )
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Produce a reply for `request`. Never fails.
    pub async fn process_chat(&self, request: &ChatRequest) -> ChatReply {
        self.process_chat_with_outcome(request).await.reply
    }

    /// Produce a reply together with how it was obtained and how long it took.
    pub async fn process_chat_with_outcome(&self, request: &ChatRequest) -> ChatResult {
        let span = info_span!(
            "chat.process",
            user_id = %request.user_id,
            channel_id = %request.channel_id,
            server_id = %request.server_id,
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &ChatRequest) -> ChatResult {
        let start = Instant::now();
        let mut trail = PhaseTrail::default();

        trail.enter(ChatPhase::Gathering);
        let context = self
            .gatherer
            .gather(&request.user_id, &self.persona_id)
            .await;

        trail.enter(ChatPhase::Building);
        let prompt = self.prompts.build(&context, &request.content);
        debug!(prompt_chars = prompt.len(), history = context.recent_exchanges.len(), "Prompt built");

        trail.enter(ChatPhase::Generating);
        let reply = match self.invoker.invoke(&prompt, self.deadline).await {
            Ok(reply) => reply,
            Err(e) => {
                trail.enter(ChatPhase::Failed);
                let elapsed = start.elapsed();
                let (text, outcome) = match &e {
                    GenerationError::Timeout(deadline) => {
                        warn!(
                            fallback = "timeout",
                            deadline_ms = deadline.as_millis() as u64,
                            elapsed_ms = elapsed.as_millis() as u64,
                            "Generation timed out, returning fallback reply"
                        );
                        (TIMEOUT_FALLBACK, ChatOutcome::TimeoutFallback)
                    }
                    GenerationError::Backend(_) | GenerationError::EmptyResponse => {
                        error!(
                            fallback = "backend",
                            backend = self.invoker.backend_name(),
                            error = %e,
                            elapsed_ms = elapsed.as_millis() as u64,
                            "Generation failed, returning fallback reply"
                        );
                        (BACKEND_FALLBACK, ChatOutcome::BackendFallback)
                    }
                };
                trail.enter(ChatPhase::Done);
                return ChatResult {
                    reply: ChatReply::new(text),
                    outcome,
                    elapsed,
                    phases: trail.into_phases(),
                };
            }
        };

        trail.enter(ChatPhase::Recording);
        let outcome = match self
            .recorder
            .record(&request.user_id, &request.channel_id, &request.content, &reply)
            .await
        {
            Ok(_) => ChatOutcome::Completed,
            Err(e) => {
                error!(error = %e, "Failed to record exchange, returning reply anyway");
                ChatOutcome::RecordFailed
            }
        };

        trail.enter(ChatPhase::Done);
        let elapsed = start.elapsed();
        info!(
            outcome = %outcome,
            reply_chars = reply.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Chat reply generated"
        );

        ChatResult {
            reply: ChatReply::new(reply),
            outcome,
            elapsed,
            phases: trail.into_phases(),
        }
    }
}

/// Ordered record of the phases one request passed through.
#[derive(Default)]
struct PhaseTrail(Vec<ChatPhase>);

impl PhaseTrail {
    fn enter(&mut self, phase: ChatPhase) {
        debug!(phase = %phase, "Chat phase");
        self.0.push(phase);
    }

    fn into_phases(self) -> Vec<ChatPhase> {
        self.0
    }
}
