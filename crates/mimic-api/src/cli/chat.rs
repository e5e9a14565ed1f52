//! One-shot chat command: run a single message through the pipeline.

use anyhow::Result;
use console::style;

use mimic_types::chat::ChatRequest;

use crate::state::AppState;

pub async fn chat(
    state: &AppState,
    request: ChatRequest,
    json: bool,
) -> Result<()> {
    request.validate().map_err(|e| anyhow::anyhow!(e))?;

    let orchestrator = state.orchestrator.as_ref().ok_or_else(|| {
        anyhow::anyhow!(
            "no generation backend configured; set MIMIC_API_KEY or {}",
            state.config.generation.api_key_env
        )
    })?;

    let result = orchestrator.process_chat_with_outcome(&request).await;

    if json {
        let out = serde_json::json!({
            "reply": result.reply.reply,
            "outcome": result.outcome,
            "elapsed_ms": result.elapsed.as_millis() as u64,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(&state.config.persona.owner_name).cyan().bold(),
        result.reply.reply
    );
    println!();

    let outcome = result.outcome.to_string();
    let outcome = if result.outcome.is_generated() {
        style(outcome).dim()
    } else {
        style(outcome).yellow()
    };
    println!(
        "  {} {}ms",
        outcome,
        style(result.elapsed.as_millis()).dim()
    );
    println!();

    Ok(())
}
