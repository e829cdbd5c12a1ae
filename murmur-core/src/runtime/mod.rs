mod in_memory;
mod memory;
mod traits;

pub use in_memory::{InMemoryRuntime, RuntimeOptions};
pub use memory::MemoryStore;
pub use traits::{AgentRuntime, DynRuntime, SettingsProvider};
