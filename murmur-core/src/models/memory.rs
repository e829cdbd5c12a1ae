use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub text: String,
    pub source: String,
    /// Display name of the sender.
    pub name: String,
    pub user_name: String,
}

impl Content {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            name: String::new(),
            user_name: String::new(),
        }
    }

    pub fn with_sender(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.user_name = name.clone();
        self.name = name;
        self
    }
}

/// One chat utterance as stored by a receiving runtime.
///
/// `user_id` is the sender, `agent_id` the runtime that owns this copy.
/// `id` and `created_at` are assigned by the memory store on insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub agent_id: Uuid,
    pub room_id: Uuid,
    pub content: Content,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Memory {
    pub fn new(user_id: Uuid, agent_id: Uuid, room_id: Uuid, content: Content) -> Self {
        Self {
            id: None,
            user_id,
            agent_id,
            room_id,
            content,
            created_at: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.content.text
    }

    pub fn sender_name(&self) -> &str {
        &self.content.name
    }

    pub fn is_stored(&self) -> bool {
        self.id.is_some()
    }
}
