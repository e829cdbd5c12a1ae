mod connection;
mod memory;
mod room;

use uuid::Uuid;

pub use connection::ConnectionRequest;
pub use memory::{Content, Memory};
pub use room::{ChannelType, Room, RoomHandle};

/// Identifier of an agent runtime (and of the participant it plays in a scenario).
pub type AgentId = Uuid;

/// Derive a stable UUID from an arbitrary string.
///
/// The same input always yields the same id, so names and synthetic room keys
/// can be turned into identifiers without a lookup table.
pub fn string_to_uuid(value: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, value.as_bytes())
}
