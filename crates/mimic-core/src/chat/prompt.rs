//! Prompt assembly.
//!
//! Turns a `ChatContext` plus the inbound message into the single text prompt
//! sent to the generation backend. The output is a pure function of its
//! inputs: same context and message, same bytes.

use mimic_types::chat::{ChatContext, Exchange};
use mimic_types::config::PersonaConfig;
use mimic_types::profile::AttributeMap;

/// Builds generation prompts in the voice of a fixed owner persona.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    owner_name: String,
    languages: Vec<String>,
}

impl PromptBuilder {
    pub fn new(owner_name: impl Into<String>, languages: Vec<String>) -> Self {
        Self {
            owner_name: owner_name.into(),
            languages,
        }
    }

    pub fn from_config(config: &PersonaConfig) -> Self {
        Self::new(config.owner_name.clone(), config.languages.clone())
    }

    /// Assemble the prompt for `message` under `context`.
    ///
    /// Sections always appear in the same order: persona description,
    /// language rule, personalization rule, then the tagged data blocks
    /// `<owner_persona>`, `<user_profile>`, `<recent_exchanges>`,
    /// `<current_message>`.
    pub fn build(&self, context: &ChatContext, message: &str) -> String {
        let owner = &self.owner_name;
        let mut sections = Vec::with_capacity(7);

        sections.push(format!(
            "You are {owner}, chatting with people on a community chat server. \
             Reply exactly as {owner} would: casual, warm, and concise. \
             Never sound robotic and never mention that you are an assistant or a bot."
        ));
        sections.push(format!(
            "Reply in the same language the user wrote their current message in. \
             Allowed languages: [{}]. If unsure, mirror the user's mix of languages.",
            self.languages.join(" / ")
        ));
        sections.push(format!(
            "The user profile below describes how {owner} relates to this specific user: \
             relationship, nicknames, tone, and standing instructions. Follow it when choosing \
             how to address them and which nicknames to use. It applies to this user only; \
             never carry it over to anyone else. The owner persona describes {owner}. \
             The recent exchanges are context for the current conversation; do not reply to \
             them, reply only to the current message."
        ));

        sections.push(format!(
            "<owner_persona>\n{}\n</owner_persona>",
            render_attributes(&context.persona)
        ));
        sections.push(format!(
            "<user_profile>\n{}\n</user_profile>",
            render_attributes(&context.profile)
        ));
        sections.push(format!(
            "<recent_exchanges>\n{}\n</recent_exchanges>",
            render_exchanges(&context.recent_exchanges, owner)
        ));
        sections.push(format!("<current_message>\n{message}\n</current_message>"));

        sections.join("\n\n")
    }
}

fn render_attributes(map: &AttributeMap) -> String {
    if map.is_empty() {
        return "{}".to_string();
    }
    serde_json::to_string_pretty(map).unwrap_or_else(|_| "{}".to_string())
}

/// Render history oldest first so the conversation reads top to bottom.
///
/// `exchanges` arrives most-recent-first from the gatherer.
fn render_exchanges(exchanges: &[Exchange], owner: &str) -> String {
    if exchanges.is_empty() {
        return "(none)".to_string();
    }
    let lines: Vec<String> = exchanges
        .iter()
        .rev()
        .flat_map(|e| {
            [
                format!("user: {}", e.user_message),
                format!("{owner}: {}", e.bot_reply),
            ]
        })
        .collect();
    format!("Oldest first:\n{}", lines.join("\n"))
}
