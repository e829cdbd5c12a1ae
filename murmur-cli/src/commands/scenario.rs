use anyhow::{bail, Context};
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use murmur_core::{
    DynRuntime, InMemoryRuntime, RuntimeOptions, ScenarioOutcome, ScenarioRunner, ScenarioScript,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::config::CliConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct RunOptions {
    pub script: Option<PathBuf>,
    pub agents: Option<String>,
    pub format: OutputFormat,
}

pub async fn handle_run_command(config: &CliConfig, options: RunOptions) -> anyhow::Result<()> {
    let script = match options.script.as_ref().or(config.script_path()) {
        Some(path) => ScenarioScript::load(path)
            .with_context(|| format!("Failed to load scenario {}", path.display()))?,
        None => ScenarioScript::default_conversation(),
    };

    let names = config.agents(options.agents.as_deref());
    if names.is_empty() {
        bail!("No agents given; pass --agents Alice,Bob");
    }

    let members = build_members(config, &names).await?;
    debug!(agents = ?names, scenario = %script.name, "Starting scenario");

    let outcome = ScenarioRunner::with_source(config.source())
        .run(&script, &members)
        .await?;

    match options.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => print_outcome(&outcome),
    }

    Ok(())
}

async fn build_members(config: &CliConfig, names: &[String]) -> anyhow::Result<Vec<DynRuntime>> {
    let mut members: Vec<DynRuntime> = Vec::with_capacity(names.len());
    for name in names {
        let runtime =
            InMemoryRuntime::new(RuntimeOptions::new(name).with_events_config(config.events()));
        runtime
            .install_default_handlers()
            .await
            .with_context(|| format!("Failed to set up runtime for {}", name))?;
        members.push(Arc::new(runtime));
    }
    Ok(members)
}

fn print_outcome(outcome: &ScenarioOutcome) {
    println!(
        "{} {}",
        "Scenario".cyan().bold(),
        outcome.scenario.cyan().bold()
    );
    println!("{}", "═".repeat(40).dimmed());
    println!(
        "  Rooms: {}  Saved: {}  Sent: {}  ({} ms)",
        outcome.rooms_created, outcome.messages_saved, outcome.messages_sent, outcome.duration_ms
    );

    if outcome.logs.is_empty() {
        println!();
        println!("  {}", "No conversations collected".dimmed());
        return;
    }

    for log in &outcome.logs {
        for perspective in &log.perspectives {
            println!();
            println!(
                "  {}",
                format!("{}'s perspective", perspective.agent_name)
                    .yellow()
                    .bold()
            );

            if perspective.lines.is_empty() {
                println!("    {}", "No messages".dimmed());
                continue;
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("#").fg(Color::White),
                    Cell::new("Sender").fg(Color::White),
                    Cell::new("Message").fg(Color::White),
                ]);

            for (i, line) in perspective.lines.iter().enumerate() {
                let sender = if line.sender == perspective.agent_name {
                    Cell::new(&line.sender).fg(Color::Green)
                } else {
                    Cell::new(&line.sender).fg(Color::Cyan)
                };
                table.add_row(vec![
                    Cell::new((i + 1).to_string()),
                    sender,
                    Cell::new(&line.text),
                ]);
            }

            println!("{table}");
        }
    }
}
