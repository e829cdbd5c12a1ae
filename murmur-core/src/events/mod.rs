mod bus;
mod handlers;
mod types;

pub use bus::{DynEventHandler, EventBus, EventHandler};

pub use handlers::{MessageLogHandler, PersistMessageHandler};

pub use types::{
    EmitReport, EventConfig, EventData, EventExecution, EventHandlerInfo, EventPayload,
    EventType, MessageEvent, Responder, ResponseCallback,
};
