use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::MurmurResult;
use crate::runtime::MemoryStore;

use super::bus::EventHandler;
use super::types::{EventPayload, EventType};

/// Stores every received message in the owning runtime's memory.
///
/// This is the default reactive behaviour of an in-memory runtime: a live
/// message shows up in the receiver's history only once this handler ran.
pub struct PersistMessageHandler {
    store: Arc<MemoryStore>,
}

impl PersistMessageHandler {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventHandler for PersistMessageHandler {
    fn name(&self) -> &str {
        "persist_message"
    }

    fn event(&self) -> EventType {
        EventType::MessageReceived
    }

    fn priority(&self) -> i32 {
        100
    }

    fn description(&self) -> Option<&str> {
        Some("Stores received messages in the runtime memory")
    }

    async fn handle(&self, payload: &EventPayload) -> MurmurResult<()> {
        let Some(message) = payload.message() else {
            return Ok(());
        };

        let stored = self.store.create(message.message.clone()).await;
        debug!(
            memory_id = ?stored.id,
            room_id = %stored.room_id,
            "Persisted received message"
        );

        Ok(())
    }
}

/// Emits one structured log line per received message.
pub struct MessageLogHandler {
    agent_name: String,
    received: AtomicUsize,
}

impl MessageLogHandler {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            received: AtomicUsize::new(0),
        }
    }

    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventHandler for MessageLogHandler {
    fn name(&self) -> &str {
        "message_log"
    }

    fn event(&self) -> EventType {
        EventType::MessageReceived
    }

    fn priority(&self) -> i32 {
        10
    }

    fn description(&self) -> Option<&str> {
        Some("Logs received messages")
    }

    async fn handle(&self, payload: &EventPayload) -> MurmurResult<()> {
        if let Some(message) = payload.message() {
            self.received.fetch_add(1, Ordering::SeqCst);
            info!(
                agent = %self.agent_name,
                room_id = %message.room_id,
                server_id = %message.server_id,
                sender = %message.message.sender_name(),
                "{}: {}",
                message.message.sender_name(),
                message.message.text()
            );
        }
        Ok(())
    }
}
