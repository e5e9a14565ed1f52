//! Persona CLI commands.

use anyhow::Result;
use console::style;

use mimic_types::profile::Persona;

use super::{format_attributes, parse_attributes};
use crate::state::AppState;

pub async fn set_persona(
    state: &AppState,
    persona_id: Option<String>,
    attributes: &str,
    merge: bool,
    json: bool,
) -> Result<()> {
    let persona_id = persona_id.unwrap_or_else(|| state.config.persona.persona_id.clone());
    let attributes = parse_attributes(attributes)?;

    let persona = if merge {
        state
            .profile_service
            .patch_persona(&persona_id, attributes)
            .await?
    } else {
        state
            .profile_service
            .put_persona(&persona_id, attributes)
            .await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&persona)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Persona {} saved",
        style("✓").green().bold(),
        style(&persona.persona_id).cyan()
    );
    print_persona(&persona);
    Ok(())
}

pub async fn get_persona(state: &AppState, persona_id: Option<String>, json: bool) -> Result<()> {
    let persona_id = persona_id.unwrap_or_else(|| state.config.persona.persona_id.clone());
    let persona = state.profile_service.get_persona(&persona_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&persona)?);
        return Ok(());
    }

    print_persona(&persona);
    Ok(())
}

fn print_persona(persona: &Persona) {
    println!();
    println!(
        "  {}  {}",
        style("Persona:").bold(),
        style(&persona.persona_id).cyan()
    );
    println!(
        "  {}  {}",
        style("Updated:").bold(),
        style(persona.updated_at.to_rfc3339()).dim()
    );
    println!("  {}", style("Attributes:").bold());
    for line in format_attributes(&persona.attributes).lines() {
        println!("    {line}");
    }
    println!();
}
