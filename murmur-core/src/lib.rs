pub mod clients;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod runtime;
pub mod scenario;

pub use clients::{Client, ClientRegistry, DynClient};
pub use config::{
    get_config_dir, ConfigLoadError, EventsConfig, LoggingConfig, MurmurConfig, ScenarioConfig,
};
pub use error::{CliErrorDisplay, MurmurError, MurmurResult};
pub use events::{
    DynEventHandler, EmitReport, EventBus, EventConfig, EventData, EventExecution, EventHandler,
    EventHandlerInfo, EventPayload, EventType, MessageEvent, MessageLogHandler,
    PersistMessageHandler, Responder, ResponseCallback,
};
pub use models::{
    string_to_uuid, AgentId, ChannelType, ConnectionRequest, Content, Memory, Room, RoomHandle,
};
pub use runtime::{
    AgentRuntime, DynRuntime, InMemoryRuntime, MemoryStore, RuntimeOptions, SettingsProvider,
};
pub use scenario::{
    start_scenarios, ConversationLine, ConversationLog, Perspective, ScenarioClient,
    ScenarioOutcome, ScenarioRunner, ScenarioScript, ScenarioStep, SCENARIO_CLIENT_NAME,
};
