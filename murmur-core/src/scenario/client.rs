use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clients::Client;
use crate::error::{MurmurError, MurmurResult};
use crate::events::{EventPayload, MessageEvent, Responder, ResponseCallback};
use crate::models::{
    string_to_uuid, AgentId, ChannelType, ConnectionRequest, Content, Memory, Room, RoomHandle,
};
use crate::runtime::{AgentRuntime, DynRuntime};

pub const SCENARIO_CLIENT_NAME: &str = "scenario";

/// Test-double client that scripts conversations between runtimes.
///
/// Every participant gets one room, provisioned through the runtime the client
/// was started on. Messages addressed to a participant without a room are
/// skipped silently.
pub struct ScenarioClient {
    source: String,
    runtime: RwLock<Option<DynRuntime>>,
    rooms: RwLock<HashMap<AgentId, RoomHandle>>,
    response_handlers: RwLock<HashMap<AgentId, Vec<ResponseCallback>>>,
}

impl Default for ScenarioClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioClient {
    pub fn new() -> Self {
        Self::with_source(SCENARIO_CLIENT_NAME)
    }

    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            runtime: RwLock::new(None),
            rooms: RwLock::new(HashMap::new()),
            response_handlers: RwLock::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub async fn is_started(&self) -> bool {
        self.runtime.read().await.is_some()
    }

    async fn bound_runtime(&self) -> MurmurResult<DynRuntime> {
        self.runtime
            .read()
            .await
            .clone()
            .ok_or_else(|| MurmurError::ClientNotStarted(SCENARIO_CLIENT_NAME.to_string()))
    }

    /// Provisions a fresh room for `participant_id` and registers it,
    /// replacing any room the participant had before.
    pub async fn create_room(
        &self,
        participant_id: AgentId,
        name: Option<&str>,
    ) -> MurmurResult<RoomHandle> {
        let runtime = self.bound_runtime().await?;

        let room_id = string_to_uuid(&format!("room-{}", Uuid::new_v4()));
        let server_id = format!("test-server-{}", Uuid::new_v4());
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| format!("Room for {}", participant_id));

        let room = Room::group(room_id, name, &self.source, server_id);
        let handle = room.handle();
        runtime.ensure_room_exists(room).await?;

        let previous = self
            .rooms
            .write()
            .await
            .insert(participant_id, handle.clone());

        debug!(
            participant = %participant_id,
            room_id = %handle.room_id,
            server_id = %handle.server_id,
            replaced = previous.is_some(),
            "Created scenario room"
        );

        Ok(handle)
    }

    pub async fn room_for(&self, participant_id: &AgentId) -> Option<RoomHandle> {
        self.rooms.read().await.get(participant_id).cloned()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Registers a callback that receives responses produced by
    /// `participant_id`'s handlers for live messages.
    pub async fn on_response(&self, participant_id: AgentId, callback: ResponseCallback) {
        self.response_handlers
            .write()
            .await
            .entry(participant_id)
            .or_default()
            .push(callback);
    }

    fn build_memory(&self, sender: &dyn AgentRuntime, receiver: AgentId, room: &RoomHandle, text: &str) -> Memory {
        Memory::new(
            sender.agent_id(),
            receiver,
            room.room_id,
            Content::new(text, &self.source).with_sender(sender.character_name()),
        )
    }

    /// Writes `text` straight into each receiver's memory without emitting
    /// events. Returns the number of receivers written to.
    pub async fn save_message(
        &self,
        sender: &dyn AgentRuntime,
        receivers: &[DynRuntime],
        text: &str,
    ) -> MurmurResult<usize> {
        let mut saved = 0;

        for receiver in receivers {
            let receiver_id = receiver.agent_id();
            let Some(room) = self.room_for(&receiver_id).await else {
                debug!(receiver = %receiver.character_name(), "No room for receiver, skipping save");
                continue;
            };

            let memory = self.build_memory(sender, receiver_id, &room, text);
            receiver.create_memory(memory).await?;
            saved += 1;
        }

        debug!(
            sender = %sender.character_name(),
            saved,
            "Saved scenario message"
        );
        Ok(saved)
    }

    /// Delivers `text` live: one `MESSAGE_RECEIVED` event per receiver with a
    /// room, after ensuring the sender is connected to that room. Returns once
    /// every receiver's handlers have completed.
    pub async fn send_message(
        &self,
        sender: &dyn AgentRuntime,
        receivers: &[DynRuntime],
        text: &str,
    ) -> MurmurResult<usize> {
        let sender_id = sender.agent_id();
        let mut delivered = 0;

        for receiver in receivers {
            let receiver_id = receiver.agent_id();
            let Some(room) = self.room_for(&receiver_id).await else {
                debug!(receiver = %receiver.character_name(), "No room for receiver, skipping send");
                continue;
            };

            if receiver_id != sender_id {
                receiver
                    .ensure_connection(ConnectionRequest::group(
                        sender_id,
                        room.room_id,
                        sender.character_name(),
                        &self.source,
                    ))
                    .await?;
            }

            let responder = self
                .response_handlers
                .read()
                .await
                .get(&receiver_id)
                .filter(|callbacks| !callbacks.is_empty())
                .map(|callbacks| Responder::new(callbacks.clone()));

            let message = self.build_memory(sender, receiver_id, &room, text);
            receiver
                .emit_event(EventPayload::message_received(MessageEvent {
                    message,
                    room_id: room.room_id,
                    user_id: sender_id,
                    server_id: room.server_id.clone(),
                    source: self.source.clone(),
                    channel_type: ChannelType::Group,
                    responder,
                }))
                .await?;
            delivered += 1;
        }

        info!("{}: {}", sender.character_name(), text);
        Ok(delivered)
    }

    /// Fetches every participant's room history concurrently. The result is in
    /// the order of `participants`; a participant without a room gets an
    /// empty history.
    pub async fn get_conversations(
        &self,
        participants: &[DynRuntime],
    ) -> MurmurResult<Vec<Vec<Memory>>> {
        let rooms = self.rooms.read().await.clone();

        let fetches = participants.iter().map(|member| {
            let room = rooms.get(&member.agent_id()).cloned();
            async move {
                match room {
                    Some(room) => member.get_memories(&room.room_id).await,
                    None => Ok(Vec::new()),
                }
            }
        });

        let conversations = join_all(fetches)
            .await
            .into_iter()
            .collect::<MurmurResult<Vec<_>>>()?;

        for (member, conversation) in participants.iter().zip(&conversations) {
            info!(
                agent = %member.character_name(),
                messages = conversation.len(),
                "Collected conversation"
            );
        }

        Ok(conversations)
    }
}

#[async_trait]
impl Client for ScenarioClient {
    fn name(&self) -> &str {
        SCENARIO_CLIENT_NAME
    }

    async fn start(&self, runtime: DynRuntime) -> MurmurResult<()> {
        info!(agent = %runtime.character_name(), "Scenario client started");
        *self.runtime.write().await = Some(runtime);
        Ok(())
    }

    async fn stop(&self) -> MurmurResult<()> {
        self.response_handlers.write().await.clear();
        self.rooms.write().await.clear();
        *self.runtime.write().await = None;
        debug!("Scenario client stopped");
        Ok(())
    }
}
