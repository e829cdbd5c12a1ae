use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clients::{ClientRegistry, DynClient};
use crate::config::EventsConfig;
use crate::error::MurmurResult;
use crate::events::{
    EmitReport, EventBus, EventConfig, EventPayload, MessageLogHandler, PersistMessageHandler,
};
use crate::models::{string_to_uuid, AgentId, ConnectionRequest, Memory, Room};

use super::memory::MemoryStore;
use super::traits::{AgentRuntime, SettingsProvider};

#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Derived from the character name when absent.
    pub agent_id: Option<AgentId>,
    pub character_name: String,
    pub settings: HashMap<String, String>,
    /// Consult the process environment for keys missing from `settings`.
    pub env_fallback: bool,
    pub events: EventConfig,
    pub max_event_history: usize,
}

impl RuntimeOptions {
    pub fn new(character_name: impl Into<String>) -> Self {
        Self {
            agent_id: None,
            character_name: character_name.into(),
            settings: HashMap::new(),
            env_fallback: true,
            events: EventConfig::default(),
            max_event_history: 1000,
        }
    }

    pub fn with_agent_id(mut self, agent_id: AgentId) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn without_env_fallback(mut self) -> Self {
        self.env_fallback = false;
        self
    }

    pub fn with_events_config(mut self, config: &EventsConfig) -> Self {
        self.events = EventConfig::from(config);
        self.max_event_history = config.max_history;
        self
    }
}

/// Self-contained runtime keeping rooms, connections, memories and event
/// handlers in process memory.
pub struct InMemoryRuntime {
    agent_id: AgentId,
    character_name: String,
    settings: HashMap<String, String>,
    env_fallback: bool,
    rooms: RwLock<HashMap<Uuid, Room>>,
    connections: RwLock<Vec<ConnectionRequest>>,
    memory: Arc<MemoryStore>,
    events: EventBus,
    clients: ClientRegistry,
}

impl InMemoryRuntime {
    pub fn new(options: RuntimeOptions) -> Self {
        let agent_id = options
            .agent_id
            .unwrap_or_else(|| string_to_uuid(&options.character_name));

        Self {
            agent_id,
            character_name: options.character_name,
            settings: options.settings,
            env_fallback: options.env_fallback,
            rooms: RwLock::new(HashMap::new()),
            connections: RwLock::new(Vec::new()),
            memory: Arc::new(MemoryStore::new()),
            events: EventBus::with_config(options.events)
                .with_max_history(options.max_event_history),
            clients: ClientRegistry::new(),
        }
    }

    pub fn named(character_name: impl Into<String>) -> Self {
        Self::new(RuntimeOptions::new(character_name))
    }

    /// Registers the persistence and logging handlers for received messages.
    pub async fn install_default_handlers(&self) -> MurmurResult<()> {
        self.events
            .register(Arc::new(PersistMessageHandler::new(self.memory.clone())))
            .await?;
        self.events
            .register(Arc::new(MessageLogHandler::new(&self.character_name)))
            .await?;
        Ok(())
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn memory(&self) -> &Arc<MemoryStore> {
        &self.memory
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub async fn room(&self, room_id: &Uuid) -> Option<Room> {
        self.rooms.read().await.get(room_id).cloned()
    }

    pub async fn rooms(&self) -> Vec<Room> {
        self.rooms.read().await.values().cloned().collect()
    }

    /// Every `ensure_connection` call received, in order.
    pub async fn connections(&self) -> Vec<ConnectionRequest> {
        self.connections.read().await.clone()
    }

    pub async fn is_connected(&self, user_id: &Uuid, room_id: &Uuid) -> bool {
        self.connections
            .read()
            .await
            .iter()
            .any(|c| &c.user_id == user_id && &c.room_id == room_id)
    }

    /// Like `emit_event`, but hands back what each handler did.
    pub async fn emit(&self, payload: EventPayload) -> EmitReport {
        let report = self.events.emit(payload).await;
        for failure in report.failures() {
            warn!(
                agent = %self.character_name,
                event = %failure.event,
                handler = %failure.handler_name,
                error = ?failure.error,
                "Event handler did not complete"
            );
        }
        report
    }
}

#[async_trait]
impl SettingsProvider for InMemoryRuntime {
    async fn get_setting(&self, key: &str) -> MurmurResult<Option<String>> {
        if let Some(value) = self.settings.get(key) {
            return Ok(Some(value.clone()));
        }
        if self.env_fallback {
            return Ok(std::env::var(key).ok());
        }
        Ok(None)
    }
}

#[async_trait]
impl AgentRuntime for InMemoryRuntime {
    fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    fn character_name(&self) -> &str {
        &self.character_name
    }

    async fn ensure_room_exists(&self, room: Room) -> MurmurResult<()> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room.id) {
            return Ok(());
        }

        debug!(
            agent = %self.character_name,
            room_id = %room.id,
            room_name = %room.name,
            "Provisioned room"
        );
        rooms.insert(room.id, room);
        Ok(())
    }

    async fn ensure_connection(&self, request: ConnectionRequest) -> MurmurResult<()> {
        // Rooms provisioned by another runtime are unknown here until a
        // participant connects.
        {
            let mut rooms = self.rooms.write().await;
            rooms.entry(request.room_id).or_insert_with(|| Room {
                id: request.room_id,
                name: format!("Room {}", request.room_id),
                source: request.source.clone(),
                channel_type: request.channel_type,
                channel_id: request.room_id.to_string(),
                server_id: String::new(),
            });
        }

        debug!(
            agent = %self.character_name,
            user_id = %request.user_id,
            room_id = %request.room_id,
            "Ensured connection"
        );
        self.connections.write().await.push(request);
        Ok(())
    }

    async fn create_memory(&self, memory: Memory) -> MurmurResult<Memory> {
        Ok(self.memory.create(memory).await)
    }

    async fn get_memories(&self, room_id: &Uuid) -> MurmurResult<Vec<Memory>> {
        Ok(self.memory.list(room_id).await)
    }

    async fn emit_event(&self, payload: EventPayload) -> MurmurResult<()> {
        self.emit(payload).await;
        Ok(())
    }

    async fn register_client(&self, name: &str, client: DynClient) -> MurmurResult<()> {
        self.clients.register(name, client).await;
        self.emit(EventPayload::client_registered(name)).await;
        Ok(())
    }
}
