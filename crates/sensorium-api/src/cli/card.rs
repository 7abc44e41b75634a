//! Agent profile listing and card display.

use anyhow::Result;
use console::style;

use sensorium_types::config::SensoriumConfig;

use super::build_agent;

/// List configured agent profiles.
pub fn list_agents(config: &SensoriumConfig, json: bool) -> Result<()> {
    if json {
        let agents: Vec<serde_json::Value> = config
            .agents
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "name": p.role.name,
                    "kind": p.kind,
                    "needs": p.needs.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&agents)?);
        return Ok(());
    }

    println!();
    if config.agents.is_empty() {
        println!(
            "  {} No agents configured. Add an [[agent]] table to sensorium.toml.",
            style("ℹ").blue()
        );
        println!();
        return Ok(());
    }

    for profile in &config.agents {
        let id = profile.id.as_deref().unwrap_or("(generated id)");
        println!(
            "  {} {}",
            style(&profile.role.name).cyan().bold(),
            style(id).dim()
        );
        for need in &profile.needs {
            println!("    {} {}", style("·").dim(), need.to_context_string());
        }
    }
    println!();
    Ok(())
}

/// Print the card an agent would publish.
pub fn show_card(config: &SensoriumConfig, key: &str, json: bool) -> Result<()> {
    let agent = build_agent(config, key, config.settings.clone())?;
    let card = agent.card();

    if json {
        println!("{}", serde_json::to_string_pretty(&card)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} v{}",
        style(&card.name).cyan().bold(),
        card.version
    );
    if !card.description.is_empty() {
        println!("  {}", card.description);
    }
    println!();
    println!("  Id:           {}", style(agent.id()).dim());
    if !card.url.is_empty() {
        println!("  URL:          {}", card.url);
    }
    if !card.capabilities.is_empty() {
        println!("  Capabilities: {}", card.capabilities.join(", "));
    }
    if !card.skills.is_empty() {
        println!("  Skills:       {}", card.skills.join(", "));
    }
    println!();
    Ok(())
}
