use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{MurmurError, MurmurResult};

use super::DynClient;

#[derive(Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<String, DynClient>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `client` under `name`; a previous client with that name is
    /// replaced and returned.
    pub async fn register(&self, name: &str, client: DynClient) -> Option<DynClient> {
        let mut clients = self.clients.write().await;
        let previous = clients.insert(name.to_string(), client);

        if previous.is_some() {
            warn!("Replaced client: {}", name);
        } else {
            info!("Registered client: {}", name);
        }

        previous
    }

    pub async fn unregister(&self, name: &str) -> MurmurResult<DynClient> {
        let mut clients = self.clients.write().await;
        match clients.remove(name) {
            Some(client) => {
                info!("Unregistered client: {}", name);
                Ok(client)
            }
            None => Err(MurmurError::ClientNotFound(name.to_string())),
        }
    }

    pub async fn get(&self, name: &str) -> Option<DynClient> {
        self.clients.read().await.get(name).cloned()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.clients.read().await.contains_key(name)
    }

    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.clients.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Stops and removes every registered client. The first stop error is
    /// returned after all clients were attempted.
    pub async fn stop_all(&self) -> MurmurResult<()> {
        let drained: Vec<(String, DynClient)> = self.clients.write().await.drain().collect();
        let mut first_error = None;

        for (name, client) in drained {
            if let Err(e) = client.stop().await {
                warn!(client = %name, error = %e, "Client failed to stop");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
