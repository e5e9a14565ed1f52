//! Print the effective configuration.

use anyhow::Result;
use console::style;

use mimic_infra::config::resolve_api_key;

use crate::state::AppState;

pub fn show_config(state: &AppState, json: bool) -> Result<()> {
    let has_key = resolve_api_key(&state.config.generation).is_some();

    if json {
        let mut value = serde_json::to_value(state.config.as_ref())?;
        value["data_dir"] = serde_json::json!(state.data_dir.display().to_string());
        value["api_key_present"] = serde_json::json!(has_key);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let config = &state.config;
    let key_status = if has_key {
        style("present".to_string()).green()
    } else {
        style(format!("missing (set {})", config.generation.api_key_env)).red()
    };

    println!();
    println!("  {}  {}", style("Data dir:").bold(), state.data_dir.display());
    println!();
    println!("  {}", style("[generation]").cyan().bold());
    println!("    provider       {}", config.generation.provider);
    println!("    base_url       {}", config.generation.base_url);
    println!("    model          {}", config.generation.model);
    println!("    api key        {key_status}");
    println!("    deadline_secs  {}", config.generation.deadline_secs);
    println!("    max_tokens     {}", config.generation.max_tokens);
    if let Some(t) = config.generation.temperature {
        println!("    temperature    {t}");
    }
    println!();
    println!("  {}", style("[persona]").cyan().bold());
    println!("    persona_id     {}", config.persona.persona_id);
    println!("    owner_name     {}", config.persona.owner_name);
    println!("    languages      {}", config.persona.languages.join(", "));
    println!();
    println!("  {}", style("[server]").cyan().bold());
    println!("    host           {}", config.server.host);
    println!("    port           {}", config.server.port);
    println!();
    Ok(())
}
