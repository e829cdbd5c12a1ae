use murmur_core::SettingsProvider;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::environment::{validate_env_config, TonEnvConfig, TON_PRIVATE_KEY, TON_RPC_URL};
use crate::error::TonConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Holds the TON settings once they have been validated against a runtime.
pub struct TonPlugin {
    info: PluginInfo,
    config: Option<TonEnvConfig>,
}

impl Default for TonPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl TonPlugin {
    pub fn new() -> Self {
        Self {
            info: PluginInfo {
                name: "ton".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: "TON wallet settings".to_string(),
            },
            config: None,
        }
    }

    pub fn info(&self) -> &PluginInfo {
        &self.info
    }

    pub async fn init(&mut self, provider: &dyn SettingsProvider) -> Result<(), TonConfigError> {
        let config = validate_env_config(provider).await?;
        info!(plugin = %self.info.name, rpc_url = %config.ton_rpc_url, "Plugin initialized");
        self.config = Some(config);
        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.config = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.config.is_some()
    }

    pub fn config(&self) -> Option<&TonEnvConfig> {
        self.config.as_ref()
    }

    pub fn config_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                TON_PRIVATE_KEY: {
                    "type": "string",
                    "minLength": 1,
                    "description": "Wallet private key"
                },
                TON_RPC_URL: {
                    "type": "string",
                    "description": "RPC endpoint"
                }
            },
            "required": [TON_PRIVATE_KEY, TON_RPC_URL]
        })
    }
}
