//! In-memory repositories and scripted backends shared by the unit tests.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::Stream;

use mimic_types::chat::Exchange;
use mimic_types::error::RepositoryError;
use mimic_types::llm::{CompletionRequest, LlmError, StopReason, StreamEvent};
use mimic_types::profile::{AttributeMap, Persona, Profile};

use crate::llm::provider::GenerationBackend;
use crate::repository::history::HistoryRepository;
use crate::repository::persona::PersonaRepository;
use crate::repository::profile::ProfileRepository;

pub fn attrs(value: serde_json::Value) -> AttributeMap {
    match value {
        serde_json::Value::Object(map) => map,
        _ => AttributeMap::new(),
    }
}

pub fn profile(user_id: &str, value: serde_json::Value) -> Profile {
    let now = chrono::Utc::now();
    Profile {
        user_id: user_id.to_string(),
        user_name: None,
        attributes: attrs(value),
        created_at: now,
        updated_at: now,
    }
}

pub fn persona(persona_id: &str, value: serde_json::Value) -> Persona {
    let now = chrono::Utc::now();
    Persona {
        persona_id: persona_id.to_string(),
        attributes: attrs(value),
        created_at: now,
        updated_at: now,
    }
}

// --- Repositories ---

async fn pause(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

#[derive(Default)]
pub struct MemoryProfiles {
    pub profiles: Mutex<HashMap<String, Profile>>,
    pub fail: bool,
    /// Sleep applied before answering `get_profile`.
    pub delay: Option<Duration>,
}

impl MemoryProfiles {
    pub fn with(profile: Profile) -> Self {
        let repo = Self::default();
        repo.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile);
        repo
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl ProfileRepository for MemoryProfiles {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, RepositoryError> {
        pause(self.delay).await;
        if self.fail {
            return Err(RepositoryError::Connection);
        }
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, RepositoryError> {
        if self.fail {
            return Err(RepositoryError::Connection);
        }
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile.clone());
        Ok(profile.clone())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        if self.fail {
            return Err(RepositoryError::Connection);
        }
        let mut all: Vec<Profile> = self.profiles.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(all)
    }

    async fn delete_profile(&self, user_id: &str) -> Result<(), RepositoryError> {
        if self.fail {
            return Err(RepositoryError::Connection);
        }
        match self.profiles.lock().unwrap().remove(user_id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[derive(Default)]
pub struct MemoryPersonas {
    pub personas: Mutex<HashMap<String, Persona>>,
    pub fail: bool,
    /// Sleep applied before answering `get_persona`.
    pub delay: Option<Duration>,
}

impl MemoryPersonas {
    pub fn with(persona: Persona) -> Self {
        let repo = Self::default();
        repo.personas
            .lock()
            .unwrap()
            .insert(persona.persona_id.clone(), persona);
        repo
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl PersonaRepository for MemoryPersonas {
    async fn get_persona(&self, persona_id: &str) -> Result<Option<Persona>, RepositoryError> {
        pause(self.delay).await;
        if self.fail {
            return Err(RepositoryError::Connection);
        }
        Ok(self.personas.lock().unwrap().get(persona_id).cloned())
    }

    async fn upsert_persona(&self, persona: &Persona) -> Result<Persona, RepositoryError> {
        if self.fail {
            return Err(RepositoryError::Connection);
        }
        self.personas
            .lock()
            .unwrap()
            .insert(persona.persona_id.clone(), persona.clone());
        Ok(persona.clone())
    }
}

/// Append-only history; `exchanges` is kept in insertion order.
#[derive(Default)]
pub struct MemoryHistory {
    pub exchanges: Mutex<Vec<Exchange>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Sleep applied before answering `recent_exchanges`.
    pub delay: Option<Duration>,
}

impl MemoryHistory {
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.exchanges.lock().unwrap().len()
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl HistoryRepository for MemoryHistory {
    async fn recent_exchanges(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<Exchange>, RepositoryError> {
        pause(self.delay).await;
        if self.fail_reads {
            return Err(RepositoryError::Query("history unavailable".to_string()));
        }
        Ok(self
            .exchanges
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn append_exchange(&self, exchange: &Exchange) -> Result<(), RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Query("disk full".to_string()));
        }
        self.exchanges.lock().unwrap().push(exchange.clone());
        Ok(())
    }
}

// --- Backends ---

#[derive(Clone)]
enum Script {
    Chunks(Vec<String>),
    Delayed(Duration, Vec<String>),
    FailAfter(Vec<String>, String),
    Hang,
}

/// Backend that replays a fixed script and records every prompt it receives.
#[derive(Clone)]
pub struct MockBackend {
    script: Script,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    fn new(script: Script) -> Self {
        Self {
            script,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Emits the given text chunks and finishes.
    pub fn chunks(chunks: &[&str]) -> Self {
        Self::new(Script::Chunks(chunks.iter().map(|c| c.to_string()).collect()))
    }

    /// Sleeps before every chunk.
    pub fn delayed(delay: Duration, chunks: &[&str]) -> Self {
        Self::new(Script::Delayed(
            delay,
            chunks.iter().map(|c| c.to_string()).collect(),
        ))
    }

    /// Emits the chunks, then a provider error.
    pub fn failing_after(chunks: &[&str], message: &str) -> Self {
        Self::new(Script::FailAfter(
            chunks.iter().map(|c| c.to_string()).collect(),
            message.to_string(),
        ))
    }

    /// Fails immediately.
    pub fn failing(message: &str) -> Self {
        Self::failing_after(&[], message)
    }

    /// Never yields a single event.
    pub fn hanging() -> Self {
        Self::new(Script::Hang)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

impl GenerationBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        self.prompts.lock().unwrap().push(request.prompt);
        let script = self.script.clone();
        Box::pin(async_stream::stream! {
            match script {
                Script::Chunks(chunks) => {
                    yield Ok(StreamEvent::Connected);
                    for text in chunks {
                        yield Ok(StreamEvent::TextDelta { text });
                    }
                    yield Ok(StreamEvent::MessageDelta { stop_reason: StopReason::EndTurn });
                    yield Ok(StreamEvent::Done);
                }
                Script::Delayed(delay, chunks) => {
                    yield Ok(StreamEvent::Connected);
                    for text in chunks {
                        tokio::time::sleep(delay).await;
                        yield Ok(StreamEvent::TextDelta { text });
                    }
                    yield Ok(StreamEvent::Done);
                }
                Script::FailAfter(chunks, message) => {
                    for text in chunks {
                        yield Ok(StreamEvent::TextDelta { text });
                    }
                    yield Err(LlmError::Provider { message });
                }
                Script::Hang => {
                    futures_util::future::pending::<()>().await;
                }
            }
        })
    }
}
