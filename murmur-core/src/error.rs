//! Error types for the Murmur core library.
//!
//! This module provides a unified error handling system for all Murmur operations,
//! including configuration, runtime capability calls, scenarios, clients and events.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E2001-E2099 | Config | Environment, config file, and validation errors |
//! | E3001-E3099 | Runtime | Room, connection, memory and settings errors raised by a runtime |
//! | E4001-E4099 | Scenario | Script parsing and step execution errors |
//! | E9001-E9099 | General | Internal, IO, serialization, and validation errors |
//! | E10001-E10099 | Client | Client registration and lifecycle errors |
//! | E11001-E11099 | Event | Event handler registration, execution, and timeout errors |

use std::fmt;
use thiserror::Error;
use tracing::error;

/// The main error type for the Murmur core library.
#[derive(Debug, Error)]
pub enum MurmurError {
    // ========================================================================
    // Configuration Errors (E2001-E2099)
    // ========================================================================
    /// Required environment variable is missing
    #[error("[E2001] Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable has invalid value
    #[error("[E2002] Invalid environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    /// Configuration file not found
    #[error("[E2003] Configuration file not found: {0}")]
    ConfigFileNotFound(String),

    /// Configuration file parse error
    #[error("[E2004] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// Invalid configuration value
    #[error("[E2005] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    /// Configuration error (generic)
    #[error("[E2006] Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Runtime Errors (E3001-E3099)
    // ========================================================================
    /// Agent runtime not found
    #[error("[E3001] Agent not found: {0}")]
    AgentNotFound(String),

    /// Runtime refused or failed to provision a room
    #[error("[E3002] Failed to provision room '{room}': {message}")]
    RoomProvisioningFailed { room: String, message: String },

    /// Runtime failed to ensure a connection
    #[error("[E3003] Failed to ensure connection for '{agent}': {message}")]
    ConnectionFailed { agent: String, message: String },

    /// Memory store operation failed
    #[error("[E3004] Memory store operation failed: {0}")]
    MemoryStoreFailed(String),

    /// Settings provider could not answer a lookup
    #[error("[E3005] Settings lookup failed for '{key}': {message}")]
    SettingsUnavailable { key: String, message: String },

    // ========================================================================
    // Scenario Errors (E4001-E4099)
    // ========================================================================
    /// Scenario script is malformed or does not fit the members given
    #[error("[E4001] Invalid scenario: {0}")]
    InvalidScenario(String),

    /// A scenario step failed
    #[error("[E4002] Scenario step {step} failed: {message}")]
    ScenarioStepFailed { step: usize, message: String },

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    /// Internal error (catch-all for unexpected conditions)
    #[error("[E9001] Internal error: {0}")]
    Internal(String),

    /// Validation error
    #[error("[E9004] Validation error: {0}")]
    ValidationError(String),

    /// IO error
    #[error("[E9005] IO error: {0}")]
    IoError(String),

    /// Serialization/deserialization error
    #[error("[E9006] Serialization error: {0}")]
    SerializationError(String),

    // ========================================================================
    // Client Errors (E10001-E10099)
    // ========================================================================
    /// Client error (generic)
    #[error("[E10001] Client error: {0}")]
    ClientError(String),

    /// No client registered under the given name
    #[error("[E10002] Client not found: {0}")]
    ClientNotFound(String),

    /// Client used before `start` bound it to a runtime
    #[error("[E10003] Client '{0}' has not been started")]
    ClientNotStarted(String),

    // ========================================================================
    // Event Errors (E11001-E11099)
    // ========================================================================
    /// Event error (generic)
    #[error("[E11001] Event error: {0}")]
    EventError(String),

    /// Event handler not found
    #[error("[E11002] Event handler not found: {0}")]
    EventHandlerNotFound(String),

    /// Event handler returned an error
    #[error("[E11003] Handler for event '{event}' failed: {message}")]
    EventHandlerFailed { event: String, message: String },

    /// Event handler exceeded its timeout
    #[error("[E11004] Handler for event '{0}' timed out after {1}ms")]
    EventTimeout(String, u64),
}

/// Result type alias for Murmur operations.
pub type MurmurResult<T> = Result<T, MurmurError>;

impl From<serde_json::Error> for MurmurError {
    fn from(err: serde_json::Error) -> Self {
        MurmurError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for MurmurError {
    fn from(err: toml::de::Error) -> Self {
        MurmurError::InvalidScenario(err.to_string())
    }
}

impl From<std::io::Error> for MurmurError {
    fn from(err: std::io::Error) -> Self {
        MurmurError::IoError(err.to_string())
    }
}

impl From<config::ConfigError> for MurmurError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => MurmurError::InvalidConfigValue {
                key,
                message: "Key not found".to_string(),
            },
            config::ConfigError::FileParse { uri, cause } => MurmurError::ConfigParseError(
                format!("Failed to parse {}: {}", uri.unwrap_or_default(), cause),
            ),
            config::ConfigError::Type {
                origin,
                unexpected,
                expected,
                key,
            } => MurmurError::InvalidConfigValue {
                key: key.unwrap_or_else(|| origin.map(|o| o.to_string()).unwrap_or_default()),
                message: format!("Expected {}, got {}", expected, unexpected),
            },
            _ => MurmurError::ConfigParseError(err.to_string()),
        }
    }
}

impl MurmurError {
    /// Returns true if this error is related to configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            MurmurError::MissingEnvVar(_)
                | MurmurError::InvalidEnvVar { .. }
                | MurmurError::ConfigFileNotFound(_)
                | MurmurError::ConfigParseError(_)
                | MurmurError::InvalidConfigValue { .. }
                | MurmurError::Config(_)
        )
    }

    /// Returns true if this error was raised by a runtime capability call.
    pub fn is_runtime_error(&self) -> bool {
        matches!(
            self,
            MurmurError::AgentNotFound(_)
                | MurmurError::RoomProvisioningFailed { .. }
                | MurmurError::ConnectionFailed { .. }
                | MurmurError::MemoryStoreFailed(_)
                | MurmurError::SettingsUnavailable { .. }
        )
    }

    pub fn is_scenario_error(&self) -> bool {
        matches!(
            self,
            MurmurError::InvalidScenario(_) | MurmurError::ScenarioStepFailed { .. }
        )
    }

    /// Returns true if this error is related to client registration or lifecycle.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MurmurError::ClientError(_)
                | MurmurError::ClientNotFound(_)
                | MurmurError::ClientNotStarted(_)
        )
    }

    /// Returns true if this error is related to event handling.
    pub fn is_event_error(&self) -> bool {
        matches!(
            self,
            MurmurError::EventError(_)
                | MurmurError::EventHandlerNotFound(_)
                | MurmurError::EventHandlerFailed { .. }
                | MurmurError::EventTimeout(_, _)
        )
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            MurmurError::MissingEnvVar(_) => "E2001",
            MurmurError::InvalidEnvVar { .. } => "E2002",
            MurmurError::ConfigFileNotFound(_) => "E2003",
            MurmurError::ConfigParseError(_) => "E2004",
            MurmurError::InvalidConfigValue { .. } => "E2005",
            MurmurError::Config(_) => "E2006",
            MurmurError::AgentNotFound(_) => "E3001",
            MurmurError::RoomProvisioningFailed { .. } => "E3002",
            MurmurError::ConnectionFailed { .. } => "E3003",
            MurmurError::MemoryStoreFailed(_) => "E3004",
            MurmurError::SettingsUnavailable { .. } => "E3005",
            MurmurError::InvalidScenario(_) => "E4001",
            MurmurError::ScenarioStepFailed { .. } => "E4002",
            MurmurError::Internal(_) => "E9001",
            MurmurError::ValidationError(_) => "E9004",
            MurmurError::IoError(_) => "E9005",
            MurmurError::SerializationError(_) => "E9006",
            MurmurError::ClientError(_) => "E10001",
            MurmurError::ClientNotFound(_) => "E10002",
            MurmurError::ClientNotStarted(_) => "E10003",
            MurmurError::EventError(_) => "E11001",
            MurmurError::EventHandlerNotFound(_) => "E11002",
            MurmurError::EventHandlerFailed { .. } => "E11003",
            MurmurError::EventTimeout(_, _) => "E11004",
        }
    }

    /// Returns a user-friendly suggestion for how to resolve this error.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            MurmurError::MissingEnvVar(_) => {
                Some("Create a .env file or set the environment variable")
            }
            MurmurError::ConfigFileNotFound(_) => {
                Some("Create murmur.toml or pass the path explicitly")
            }
            MurmurError::InvalidScenario(_) => {
                Some("Check that every sender index refers to one of the --agents")
            }
            MurmurError::ClientNotStarted(_) => Some("Call start() before driving the client"),
            MurmurError::EventTimeout(_, _) => {
                Some("Raise events.timeout_ms or make the handler return sooner")
            }
            _ => None,
        }
    }

    /// Create a client error
    pub fn client(message: impl Into<String>) -> Self {
        MurmurError::ClientError(message.into())
    }

    /// Create an event error
    pub fn event(message: impl Into<String>) -> Self {
        MurmurError::EventError(message.into())
    }

    /// Log this error with its code and suggestion.
    pub fn log(&self) {
        error!(
            error_code = %self.error_code(),
            suggestion = self.user_suggestion(),
            "Error occurred: {}",
            self
        );
    }
}

// ============================================================================
// User-friendly error formatting for CLI
// ============================================================================

/// Format an error for CLI display with suggestions.
pub struct CliErrorDisplay<'a> {
    error: &'a MurmurError,
    show_suggestion: bool,
}

impl<'a> CliErrorDisplay<'a> {
    pub fn new(error: &'a MurmurError) -> Self {
        Self {
            error,
            show_suggestion: true,
        }
    }

    pub fn without_suggestion(mut self) -> Self {
        self.show_suggestion = false;
        self
    }
}

impl<'a> fmt::Display for CliErrorDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Main error message (already includes code)
        writeln!(f, "{}", self.error)?;

        if self.show_suggestion {
            if let Some(suggestion) = self.error.user_suggestion() {
                writeln!(f)?;
                writeln!(f, "  Suggestion: {}", suggestion)?;
            }
        }

        Ok(())
    }
}
