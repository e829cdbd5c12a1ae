use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum ChannelType {
    Dm,
    #[default]
    Group,
    VoiceDm,
    VoiceGroup,
    Feed,
    Thread,
    Api,
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelType::Dm => write!(f, "DM"),
            ChannelType::Group => write!(f, "GROUP"),
            ChannelType::VoiceDm => write!(f, "VOICE_DM"),
            ChannelType::VoiceGroup => write!(f, "VOICE_GROUP"),
            ChannelType::Feed => write!(f, "FEED"),
            ChannelType::Thread => write!(f, "THREAD"),
            ChannelType::Api => write!(f, "API"),
        }
    }
}

/// A conversation channel as provisioned by a runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub source: String,
    pub channel_type: ChannelType,
    pub channel_id: String,
    pub server_id: String,
}

impl Room {
    /// A group room whose channel id mirrors its room id.
    pub fn group(
        id: Uuid,
        name: impl Into<String>,
        source: impl Into<String>,
        server_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            source: source.into(),
            channel_type: ChannelType::Group,
            channel_id: id.to_string(),
            server_id: server_id.into(),
        }
    }

    pub fn handle(&self) -> RoomHandle {
        RoomHandle {
            room_id: self.id,
            server_id: self.server_id.clone(),
        }
    }
}

/// The part of a room a scenario needs to address messages to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomHandle {
    pub room_id: Uuid,
    pub server_id: String,
}
