use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::room::ChannelType;

/// Asks a runtime to make sure `user_id` is a known participant of `room_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub user_name: String,
    pub user_screen_name: String,
    pub source: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
}

impl ConnectionRequest {
    pub fn group(
        user_id: Uuid,
        room_id: Uuid,
        display_name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let display_name = display_name.into();
        Self {
            user_id,
            room_id,
            user_name: display_name.clone(),
            user_screen_name: display_name,
            source: source.into(),
            channel_type: ChannelType::Group,
        }
    }
}
