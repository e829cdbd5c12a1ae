use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::EventsConfig;
use crate::models::{ChannelType, Memory, Room};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    MessageReceived,
    MessageSent,
    RoomJoined,
    ClientRegistered,
    Custom(String),
}

impl EventType {
    pub fn name(&self) -> &str {
        match self {
            EventType::MessageReceived => "MESSAGE_RECEIVED",
            EventType::MessageSent => "MESSAGE_SENT",
            EventType::RoomJoined => "ROOM_JOINED",
            EventType::ClientRegistered => "CLIENT_REGISTERED",
            EventType::Custom(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "MESSAGE_RECEIVED" => EventType::MessageReceived,
            "MESSAGE_SENT" => EventType::MessageSent,
            "ROOM_JOINED" => EventType::RoomJoined,
            "CLIENT_REGISTERED" => EventType::ClientRegistered,
            custom => EventType::Custom(custom.to_string()),
        }
    }

    pub fn all_standard() -> Vec<Self> {
        vec![
            EventType::MessageReceived,
            EventType::MessageSent,
            EventType::RoomJoined,
            EventType::ClientRegistered,
        ]
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub type ResponseCallback = Arc<dyn Fn(Memory) + Send + Sync>;

/// Callbacks a handler may invoke to answer a received message.
#[derive(Clone, Default)]
pub struct Responder {
    callbacks: Vec<ResponseCallback>,
}

impl Responder {
    pub fn new(callbacks: Vec<ResponseCallback>) -> Self {
        Self { callbacks }
    }

    /// Hands `memory` to every callback; returns how many were invoked.
    pub fn respond(&self, memory: Memory) -> usize {
        for callback in &self.callbacks {
            callback(memory.clone());
        }
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Body of a `MESSAGE_RECEIVED` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub message: Memory,
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub server_id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    #[serde(skip)]
    pub responder: Option<Responder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
#[derive(Default)]
pub enum EventData {
    Message(MessageEvent),
    Room(Room),
    Client {
        name: String,
    },
    Custom(serde_json::Value),
    #[default]
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPayload {
    pub event: EventType,
    pub data: EventData,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub correlation_id: Uuid,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl EventPayload {
    pub fn new(event: EventType, data: EventData) -> Self {
        Self {
            event,
            data,
            timestamp: Utc::now(),
            source: String::new(),
            correlation_id: Uuid::new_v4(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_metadata<V: Serialize>(mut self, key: impl Into<String>, value: V) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), v);
        }
        self
    }

    pub fn get_metadata<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.metadata
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn message_received(message: MessageEvent) -> Self {
        let source = message.source.clone();
        Self::new(EventType::MessageReceived, EventData::Message(message)).with_source(source)
    }

    pub fn client_registered(name: impl Into<String>) -> Self {
        Self::new(
            EventType::ClientRegistered,
            EventData::Client { name: name.into() },
        )
        .with_source("runtime")
    }

    pub fn message(&self) -> Option<&MessageEvent> {
        match &self.data {
            EventData::Message(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventExecution {
    pub id: Uuid,
    pub event: EventType,
    pub handler_name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub duration_ms: Option<u64>,
}

impl EventExecution {
    pub fn new(event: EventType, handler_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            handler_name: handler_name.into(),
            started_at: Utc::now(),
            completed_at: None,
            error: None,
            duration_ms: None,
        }
    }

    pub fn complete(mut self) -> Self {
        let now = Utc::now();
        self.completed_at = Some(now);
        self.duration_ms = Some((now - self.started_at).num_milliseconds() as u64);
        self
    }

    pub fn fail(mut self, error: impl Into<String>) -> Self {
        self = self.complete();
        self.error = Some(error.into());
        self
    }

    pub fn is_successful(&self) -> bool {
        self.completed_at.is_some() && self.error.is_none()
    }
}

/// What one `emit` did. Returned only after every handler finished or timed out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitReport {
    pub event: EventType,
    pub executions: Vec<EventExecution>,
}

impl EmitReport {
    pub fn empty(event: EventType) -> Self {
        Self {
            event,
            executions: Vec::new(),
        }
    }

    pub fn handled(&self) -> usize {
        self.executions.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &EventExecution> {
        self.executions.iter().filter(|e| !e.is_successful())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventHandlerInfo {
    pub name: String,
    pub event: EventType,
    pub priority: i32,
    pub enabled: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EventConfig {
    pub timeout_ms: u64,
    pub enabled: bool,
    pub max_handlers: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            enabled: true,
            max_handlers: 100,
        }
    }
}

impl EventConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_max_handlers(mut self, max: usize) -> Self {
        self.max_handlers = max;
        self
    }
}

impl From<&EventsConfig> for EventConfig {
    fn from(config: &EventsConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            enabled: true,
            max_handlers: config.max_handlers,
        }
    }
}
