//! Concurrent context gathering for a single chat request.

use std::sync::Arc;

use tracing::{debug, warn};

use mimic_types::chat::{ChatContext, RECENT_EXCHANGE_LIMIT};
use mimic_types::profile::AttributeMap;

use crate::repository::history::HistoryRepository;
use crate::repository::persona::PersonaRepository;
use crate::repository::profile::ProfileRepository;

/// Fetches profile, persona, and recent history in parallel.
///
/// Never fails: an absent record or a store error degrades that source to an
/// empty value, logged at `warn` with the source name.
pub struct ContextGatherer<P, R, H> {
    profiles: Arc<P>,
    personas: Arc<R>,
    history: Arc<H>,
}

impl<P, R, H> Clone for ContextGatherer<P, R, H> {
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
            personas: Arc::clone(&self.personas),
            history: Arc::clone(&self.history),
        }
    }
}

impl<P, R, H> ContextGatherer<P, R, H>
where
    P: ProfileRepository,
    R: PersonaRepository,
    H: HistoryRepository,
{
    pub fn new(profiles: Arc<P>, personas: Arc<R>, history: Arc<H>) -> Self {
        Self {
            profiles,
            personas,
            history,
        }
    }

    /// Gather everything needed to personalize a reply to `user_id`.
    ///
    /// Completes only after all three lookups have resolved.
    pub async fn gather(&self, user_id: &str, persona_id: &str) -> ChatContext {
        let (profile, persona, history) = tokio::join!(
            self.profiles.get_profile(user_id),
            self.personas.get_persona(persona_id),
            self.history.recent_exchanges(user_id, RECENT_EXCHANGE_LIMIT),
        );

        let profile = match profile {
            Ok(Some(p)) => p.attributes,
            Ok(None) => {
                debug!(user_id, "No profile for user");
                AttributeMap::new()
            }
            Err(e) => {
                warn!(source = "profile", user_id, error = %e, "Context lookup failed, using empty profile");
                AttributeMap::new()
            }
        };

        let persona = match persona {
            Ok(Some(p)) => p.attributes,
            Ok(None) => {
                debug!(persona_id, "No persona configured");
                AttributeMap::new()
            }
            Err(e) => {
                warn!(source = "persona", persona_id, error = %e, "Context lookup failed, using empty persona");
                AttributeMap::new()
            }
        };

        let mut recent_exchanges = match history {
            Ok(exchanges) => exchanges,
            Err(e) => {
                warn!(source = "history", user_id, error = %e, "Context lookup failed, using empty history");
                Vec::new()
            }
        };
        recent_exchanges.truncate(RECENT_EXCHANGE_LIMIT as usize);

        ChatContext {
            profile,
            persona,
            recent_exchanges,
        }
    }
}
