use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::clients::Client;
use crate::error::MurmurResult;
use crate::runtime::DynRuntime;

use super::client::{ScenarioClient, SCENARIO_CLIENT_NAME};
use super::log::ConversationLog;
use super::script::{room_name, ScenarioScript, ScenarioStep};

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub scenario: String,
    pub rooms_created: usize,
    pub messages_saved: usize,
    pub messages_sent: usize,
    /// One log per `collect` step, in step order.
    pub logs: Vec<ConversationLog>,
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    fn new(scenario: &str) -> Self {
        Self {
            scenario: scenario.to_string(),
            rooms_created: 0,
            messages_saved: 0,
            messages_sent: 0,
            logs: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn last_log(&self) -> Option<&ConversationLog> {
        self.logs.last()
    }
}

/// Drives a [`ScenarioScript`] through a fresh [`ScenarioClient`] bound to the
/// first member.
pub struct ScenarioRunner {
    source: String,
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::with_source(SCENARIO_CLIENT_NAME)
    }

    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub async fn run(
        &self,
        script: &ScenarioScript,
        members: &[DynRuntime],
    ) -> MurmurResult<ScenarioOutcome> {
        script.validate(members.len())?;
        let host = members[0].clone();

        let client = Arc::new(ScenarioClient::with_source(&self.source));
        client.start(host.clone()).await?;
        host.register_client(SCENARIO_CLIENT_NAME, client.clone())
            .await?;

        info!(
            scenario = %script.name,
            members = members.len(),
            steps = script.steps.len(),
            "Running scenario"
        );

        let start = Instant::now();
        let result = self.execute(&client, script, members).await;
        client.stop().await?;

        match result {
            Ok(mut outcome) => {
                outcome.duration_ms = start.elapsed().as_millis() as u64;
                info!(
                    scenario = %script.name,
                    duration_ms = outcome.duration_ms,
                    "Scenario completed"
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!(scenario = %script.name, "Scenario aborted");
                e.log();
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        client: &ScenarioClient,
        script: &ScenarioScript,
        members: &[DynRuntime],
    ) -> MurmurResult<ScenarioOutcome> {
        let mut outcome = ScenarioOutcome::new(&script.name);

        for step in &script.steps {
            match step {
                ScenarioStep::CreateRooms { name_template } => {
                    for member in members {
                        let name = room_name(name_template.as_deref(), member.character_name());
                        client.create_room(member.agent_id(), Some(&name)).await?;
                        outcome.rooms_created += 1;
                    }
                }
                ScenarioStep::Save { sender, text } => {
                    outcome.messages_saved += client
                        .save_message(members[*sender].as_ref(), members, text)
                        .await?;
                }
                ScenarioStep::Send { sender, text } => {
                    outcome.messages_sent += client
                        .send_message(members[*sender].as_ref(), members, text)
                        .await?;
                }
                ScenarioStep::Collect => {
                    let conversations = client.get_conversations(members).await?;
                    outcome
                        .logs
                        .push(ConversationLog::from_conversations(members, &conversations));
                }
            }
        }

        Ok(outcome)
    }
}

/// Runs each script in order against the same members.
pub async fn start_scenarios(
    scripts: &[ScenarioScript],
    members: &[DynRuntime],
) -> MurmurResult<Vec<ScenarioOutcome>> {
    let runner = ScenarioRunner::new();
    let mut outcomes = Vec::with_capacity(scripts.len());
    for script in scripts {
        outcomes.push(runner.run(script, members).await?);
    }
    Ok(outcomes)
}
