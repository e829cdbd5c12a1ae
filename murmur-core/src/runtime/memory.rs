use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Memory;

/// Memories grouped by room, each room in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    rooms: RwLock<HashMap<Uuid, Vec<Memory>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `memory`, assigning an id when it has none and stamping `created_at`.
    pub async fn create(&self, mut memory: Memory) -> Memory {
        if memory.id.is_none() {
            memory.id = Some(Uuid::new_v4());
        }
        memory.created_at = Some(Utc::now());

        let mut rooms = self.rooms.write().await;
        rooms.entry(memory.room_id).or_default().push(memory.clone());
        memory
    }

    pub async fn list(&self, room_id: &Uuid) -> Vec<Memory> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).cloned().unwrap_or_default()
    }

    pub async fn count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.values().map(|m| m.len()).sum()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn clear(&self) {
        self.rooms.write().await.clear();
    }
}
