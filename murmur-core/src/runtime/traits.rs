use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::clients::DynClient;
use crate::error::MurmurResult;
use crate::events::EventPayload;
use crate::models::{AgentId, ConnectionRequest, Memory, Room};

/// Read access to runtime settings.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// `Ok(None)` when the key is not set anywhere the provider looks.
    async fn get_setting(&self, key: &str) -> MurmurResult<Option<String>>;
}

/// The capabilities an agent runtime exposes to clients such as the
/// scenario harness.
///
/// Every call may fail; callers propagate those errors untouched.
#[async_trait]
pub trait AgentRuntime: SettingsProvider {
    fn agent_id(&self) -> AgentId;

    /// Display name of the character this runtime plays.
    fn character_name(&self) -> &str;

    /// Provision `room` unless a room with the same id already exists.
    async fn ensure_room_exists(&self, room: Room) -> MurmurResult<()>;

    /// Make sure the requesting user participates in the room.
    async fn ensure_connection(&self, request: ConnectionRequest) -> MurmurResult<()>;

    /// Insert a memory record, returning it as stored.
    async fn create_memory(&self, memory: Memory) -> MurmurResult<Memory>;

    /// Memories of a room in insertion order.
    async fn get_memories(&self, room_id: &Uuid) -> MurmurResult<Vec<Memory>>;

    /// Dispatch an event to this runtime's handlers. The payload names the event.
    async fn emit_event(&self, payload: EventPayload) -> MurmurResult<()>;

    /// Register a client under `name`, replacing any previous one.
    async fn register_client(&self, name: &str, client: DynClient) -> MurmurResult<()>;
}

pub type DynRuntime = Arc<dyn AgentRuntime>;
