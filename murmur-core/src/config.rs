use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MurmurConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_handler_timeout")]
    pub timeout_ms: u64,

    #[serde(default = "default_max_handlers")]
    pub max_handlers: usize,

    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Source tag stamped on rooms, connections and messages.
    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default = "default_agents")]
    pub agents: Vec<String>,

    #[serde(default)]
    pub script_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_handler_timeout() -> u64 {
    5000
}

fn default_max_handlers() -> usize {
    100
}

fn default_max_history() -> usize {
    1000
}

fn default_source() -> String {
    "scenario".to_string()
}

fn default_agents() -> Vec<String> {
    vec!["Alice".to_string(), "Bob".to_string()]
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_handler_timeout(),
            max_handlers: default_max_handlers(),
            max_history: default_max_history(),
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            agents: default_agents(),
            script_path: None,
        }
    }
}

impl MurmurConfig {
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from_paths(get_config_paths())
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> Result<Self, ConfigLoadError> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        // MURMUR_EVENTS__TIMEOUT_MS -> events.timeout_ms
        builder = builder.add_source(
            Environment::with_prefix("MURMUR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let mut murmur_config: MurmurConfig = config.try_deserialize()?;

        if let Ok(level) = std::env::var("MURMUR_LOG_LEVEL") {
            murmur_config.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            murmur_config.logging.level = level;
        }

        murmur_config.validate()?;

        Ok(murmur_config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.events.timeout_ms == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "events.timeout_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.events.max_handlers == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "events.max_handlers".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.scenario.source.trim().is_empty() {
            return Err(ConfigLoadError::MissingRequired(
                "scenario.source".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(ConfigLoadError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    pub fn source(&self) -> &str {
        &self.scenario.source
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("murmur.toml"));
    }

    if let Some(config_dir) = get_config_dir() {
        paths.push(config_dir.join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    for path in get_dotenv_paths() {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

fn get_dotenv_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".env"));
        paths.push(cwd.join(".env.local"));
    }

    if let Some(config_dir) = get_config_dir() {
        paths.push(config_dir.join(".env"));
    }

    paths
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("murmur"))
}
