mod client;
mod log;
mod runner;
mod script;

pub use client::{ScenarioClient, SCENARIO_CLIENT_NAME};
pub use log::{ConversationLine, ConversationLog, Perspective};
pub use runner::{start_scenarios, ScenarioOutcome, ScenarioRunner};
pub use script::{ScenarioScript, ScenarioStep, DEFAULT_ROOM_TEMPLATE};
