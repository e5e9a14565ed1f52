//! History CLI command.

use anyhow::Result;
use comfy_table::{Cell, ContentArrangement, Table, presets};
use console::style;

use mimic_core::repository::history::HistoryRepository;

use crate::state::AppState;

/// Show the most recent exchanges for a user, newest first.
pub async fn show_history(state: &AppState, user_id: &str, limit: u32, json: bool) -> Result<()> {
    let exchanges = state.history.recent_exchanges(user_id, limit.max(1)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&exchanges)?);
        return Ok(());
    }

    if exchanges.is_empty() {
        println!();
        println!("  No exchanges recorded for {}.", style(user_id).cyan());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("When").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Channel").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("User").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Reply").add_attribute(comfy_table::Attribute::Bold),
        ]);

    for exchange in &exchanges {
        table.add_row(vec![
            Cell::new(exchange.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(&exchange.channel_id),
            Cell::new(&exchange.user_message),
            Cell::new(&exchange.bot_reply),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
