mod registry;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::MurmurResult;
use crate::runtime::DynRuntime;

pub use registry::ClientRegistry;

/// Something that drives a runtime from the outside: a chat connector, a
/// scenario harness, a test double.
#[async_trait]
pub trait Client: Send + Sync {
    fn name(&self) -> &str;

    /// Bind the client to `runtime`.
    async fn start(&self, runtime: DynRuntime) -> MurmurResult<()>;

    /// Drop all per-session state and release the runtime.
    async fn stop(&self) -> MurmurResult<()>;
}

pub type DynClient = Arc<dyn Client>;
