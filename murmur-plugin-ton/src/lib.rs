mod environment;
mod error;
mod plugin;

pub use environment::{
    validate_env_config, validate_env_config_with, TonEnvConfig, TON_PRIVATE_KEY, TON_RPC_URL,
};
pub use error::{TonConfigError, ValidationIssue};
pub use plugin::{PluginInfo, TonPlugin};

pub use murmur_core::SettingsProvider;
