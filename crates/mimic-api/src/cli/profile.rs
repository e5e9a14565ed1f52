//! Profile CLI commands: set, get, list, delete.

use anyhow::Result;
use comfy_table::{Cell, ContentArrangement, Table, presets};
use console::style;

use mimic_types::profile::Profile;

use super::{format_attributes, parse_attributes};
use crate::state::AppState;

pub async fn set_profile(
    state: &AppState,
    user_id: &str,
    name: Option<String>,
    attributes: &str,
    merge: bool,
    json: bool,
) -> Result<()> {
    let attributes = parse_attributes(attributes)?;
    let profile = if merge {
        state
            .profile_service
            .patch_profile(user_id, name, attributes)
            .await?
    } else {
        state
            .profile_service
            .put_profile(user_id, name, attributes)
            .await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Profile saved for {}",
        style("✓").green().bold(),
        style(&profile.user_id).cyan()
    );
    print_profile(&profile);
    Ok(())
}

pub async fn get_profile(state: &AppState, user_id: &str, json: bool) -> Result<()> {
    let profile = state.profile_service.get_profile(user_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!();
    print_profile(&profile);
    Ok(())
}

/// List all profiles in a table.
pub async fn list_profiles(state: &AppState, json: bool) -> Result<()> {
    let profiles = state.profile_service.list_profiles().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    if profiles.is_empty() {
        println!();
        println!("  No profiles yet.");
        println!(
            "  Create one: {}",
            style("mimic profile set <user_id> --attributes '{\"relationship\": \"friend\"}'")
                .yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("User").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Name").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Attributes").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Updated").add_attribute(comfy_table::Attribute::Bold),
        ]);

    for profile in &profiles {
        let keys: Vec<&str> = profile.attributes.keys().map(String::as_str).collect();
        table.add_row(vec![
            Cell::new(&profile.user_id),
            Cell::new(profile.user_name.as_deref().unwrap_or("-")),
            Cell::new(keys.join(", ")),
            Cell::new(profile.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!("  {} profile(s)", profiles.len());
    println!();
    Ok(())
}

pub async fn delete_profile(state: &AppState, user_id: &str, json: bool) -> Result<()> {
    state.profile_service.delete_profile(user_id).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "deleted": true, "user_id": user_id })
        );
        return Ok(());
    }

    println!();
    println!(
        "  {} Deleted profile {}",
        style("✓").green().bold(),
        style(user_id).cyan()
    );
    println!();
    Ok(())
}

fn print_profile(profile: &Profile) {
    println!();
    println!("  {}  {}", style("User:").bold(), style(&profile.user_id).cyan());
    if let Some(name) = &profile.user_name {
        println!("  {}  {}", style("Name:").bold(), name);
    }
    println!(
        "  {}  {}",
        style("Updated:").bold(),
        style(profile.updated_at.to_rfc3339()).dim()
    );
    println!("  {}", style("Attributes:").bold());
    for line in format_attributes(&profile.attributes).lines() {
        println!("    {line}");
    }
    println!();
}
