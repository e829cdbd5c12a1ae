use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MurmurError, MurmurResult};

pub const DEFAULT_ROOM_TEMPLATE: &str = "Test Room for {name}";

/// One scripted action. Senders are indices into the member list the script
/// runs against; every member receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    CreateRooms {
        /// `{name}` is replaced with the member's character name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name_template: Option<String>,
    },
    Save {
        sender: usize,
        text: String,
    },
    Send {
        sender: usize,
        text: String,
    },
    Collect,
}

impl ScenarioStep {
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioStep::CreateRooms { .. } => "create_rooms",
            ScenarioStep::Save { .. } => "save",
            ScenarioStep::Send { .. } => "send",
            ScenarioStep::Collect => "collect",
        }
    }

    fn sender(&self) -> Option<usize> {
        match self {
            ScenarioStep::Save { sender, .. } | ScenarioStep::Send { sender, .. } => Some(*sender),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioScript {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

impl ScenarioScript {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            steps: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn step(mut self, step: ScenarioStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn create_rooms(self) -> Self {
        self.step(ScenarioStep::CreateRooms {
            name_template: None,
        })
    }

    pub fn save(self, sender: usize, text: impl Into<String>) -> Self {
        self.step(ScenarioStep::Save {
            sender,
            text: text.into(),
        })
    }

    pub fn send(self, sender: usize, text: impl Into<String>) -> Self {
        self.step(ScenarioStep::Send {
            sender,
            text: text.into(),
        })
    }

    pub fn collect(self) -> Self {
        self.step(ScenarioStep::Collect)
    }

    /// Two remembered messages followed by a live greeting from the first
    /// member.
    pub fn default_conversation() -> Self {
        Self::new("default-conversation")
            .with_description("Seeded history followed by a live greeting")
            .create_rooms()
            .save(0, "Earlier message from conversation...")
            .save(1, "Previous reply in history...")
            .send(0, "Hello everyone!")
            .collect()
    }

    pub fn from_toml(source: &str) -> MurmurResult<Self> {
        let script: Self = toml::from_str(source)?;
        if script.name.trim().is_empty() {
            return Err(MurmurError::InvalidScenario(
                "scenario name must not be empty".to_string(),
            ));
        }
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> MurmurResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MurmurError::ConfigFileNotFound(path.display().to_string()));
        }
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Checks the script can run against `member_count` members.
    pub fn validate(&self, member_count: usize) -> MurmurResult<()> {
        if member_count == 0 {
            return Err(MurmurError::InvalidScenario(format!(
                "scenario '{}' needs at least one member",
                self.name
            )));
        }

        for (index, step) in self.steps.iter().enumerate() {
            if let Some(sender) = step.sender() {
                if sender >= member_count {
                    return Err(MurmurError::InvalidScenario(format!(
                        "step {} ({}) uses sender {} but only {} members are present",
                        index + 1,
                        step.label(),
                        sender,
                        member_count
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn collect_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, ScenarioStep::Collect))
            .count()
    }
}

pub(crate) fn room_name(template: Option<&str>, character_name: &str) -> String {
    template
        .unwrap_or(DEFAULT_ROOM_TEMPLATE)
        .replace("{name}", character_name)
}
