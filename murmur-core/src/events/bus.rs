use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, warn};

use crate::error::{MurmurError, MurmurResult};

use super::types::{EmitReport, EventConfig, EventExecution, EventHandlerInfo, EventPayload, EventType};

#[async_trait]
pub trait EventHandler: Send + Sync {
    fn name(&self) -> &str;

    fn event(&self) -> EventType;

    fn priority(&self) -> i32 {
        0
    }

    fn description(&self) -> Option<&str> {
        None
    }

    async fn handle(&self, payload: &EventPayload) -> MurmurResult<()>;

    fn info(&self) -> EventHandlerInfo {
        EventHandlerInfo {
            name: self.name().to_string(),
            event: self.event(),
            priority: self.priority(),
            enabled: true,
            description: self.description().map(|s| s.to_string()),
        }
    }
}

pub type DynEventHandler = Arc<dyn EventHandler>;

struct RegisteredHandler {
    handler: DynEventHandler,
    enabled: bool,
}

/// Per-runtime event dispatcher.
///
/// `emit` runs the enabled handlers of an event one after another, highest
/// priority first, and only returns once each of them has finished or hit its
/// timeout. Handler failures are logged and recorded, never propagated.
pub struct EventBus {
    handlers: RwLock<HashMap<EventType, Vec<RegisteredHandler>>>,
    configs: RwLock<HashMap<EventType, EventConfig>>,
    global_config: RwLock<EventConfig>,
    executions: RwLock<Vec<EventExecution>>,
    max_execution_history: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            configs: RwLock::new(HashMap::new()),
            global_config: RwLock::new(EventConfig::default()),
            executions: RwLock::new(Vec::new()),
            max_execution_history: 1000,
        }
    }

    pub fn with_config(config: EventConfig) -> Self {
        Self {
            global_config: RwLock::new(config),
            ..Self::new()
        }
    }

    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_execution_history = max;
        self
    }

    pub async fn register(&self, handler: DynEventHandler) -> MurmurResult<()> {
        let event = handler.event();
        let name = handler.name().to_string();
        let config = self.get_config(&event).await;

        let mut handlers = self.handlers.write().await;
        let event_handlers = handlers.entry(event.clone()).or_default();

        if event_handlers.len() >= config.max_handlers {
            return Err(MurmurError::event(format!(
                "Maximum handlers ({}) reached for event '{}'",
                config.max_handlers,
                event.name()
            )));
        }

        if event_handlers.iter().any(|h| h.handler.name() == name) {
            return Err(MurmurError::event(format!(
                "Handler '{}' already registered for event '{}'",
                name,
                event.name()
            )));
        }

        event_handlers.push(RegisteredHandler {
            handler,
            enabled: true,
        });
        event_handlers.sort_by(|a, b| b.handler.priority().cmp(&a.handler.priority()));

        info!(
            event = %event.name(),
            handler = %name,
            "Registered event handler"
        );

        Ok(())
    }

    pub async fn unregister(&self, event: &EventType, handler_name: &str) -> MurmurResult<()> {
        let mut handlers = self.handlers.write().await;

        if let Some(event_handlers) = handlers.get_mut(event) {
            let initial_len = event_handlers.len();
            event_handlers.retain(|h| h.handler.name() != handler_name);

            if event_handlers.len() < initial_len {
                info!(
                    event = %event.name(),
                    handler = %handler_name,
                    "Unregistered event handler"
                );
                return Ok(());
            }
        }

        Err(MurmurError::EventHandlerNotFound(format!(
            "{}/{}",
            event.name(),
            handler_name
        )))
    }

    pub async fn enable_handler(&self, event: &EventType, handler_name: &str) -> MurmurResult<()> {
        self.set_handler_enabled(event, handler_name, true).await
    }

    pub async fn disable_handler(&self, event: &EventType, handler_name: &str) -> MurmurResult<()> {
        self.set_handler_enabled(event, handler_name, false).await
    }

    async fn set_handler_enabled(
        &self,
        event: &EventType,
        handler_name: &str,
        enabled: bool,
    ) -> MurmurResult<()> {
        let mut handlers = self.handlers.write().await;

        if let Some(registered) = handlers
            .get_mut(event)
            .and_then(|hs| hs.iter_mut().find(|h| h.handler.name() == handler_name))
        {
            registered.enabled = enabled;
            debug!(
                event = %event.name(),
                handler = %handler_name,
                enabled = enabled,
                "Handler enabled state changed"
            );
            return Ok(());
        }

        Err(MurmurError::EventHandlerNotFound(format!(
            "{}/{}",
            event.name(),
            handler_name
        )))
    }

    pub async fn set_config(&self, event: EventType, config: EventConfig) {
        self.configs.write().await.insert(event, config);
    }

    pub async fn get_config(&self, event: &EventType) -> EventConfig {
        if let Some(config) = self.configs.read().await.get(event) {
            return *config;
        }
        *self.global_config.read().await
    }

    pub async fn emit(&self, payload: EventPayload) -> EmitReport {
        let event = payload.event.clone();
        let config = self.get_config(&event).await;

        if !config.enabled {
            debug!(event = %event.name(), "Event disabled, skipping handlers");
            return EmitReport::empty(event);
        }

        // Snapshot so handlers may register or emit without deadlocking.
        let enabled_handlers: Vec<DynEventHandler> = {
            let handlers = self.handlers.read().await;
            handlers
                .get(&event)
                .map(|hs| {
                    hs.iter()
                        .filter(|h| h.enabled)
                        .map(|h| h.handler.clone())
                        .collect()
                })
                .unwrap_or_default()
        };

        if enabled_handlers.is_empty() {
            debug!(event = %event.name(), "No enabled handlers for event");
            return EmitReport::empty(event);
        }

        let timeout_duration = Duration::from_millis(config.timeout_ms);
        let mut report = EmitReport::empty(event.clone());

        for handler in enabled_handlers {
            let handler_name = handler.name().to_string();
            let execution = EventExecution::new(event.clone(), &handler_name);

            debug!(
                event = %event.name(),
                handler = %handler_name,
                priority = handler.priority(),
                "Executing event handler"
            );

            let execution = match timeout(timeout_duration, handler.handle(&payload)).await {
                Ok(Ok(())) => execution.complete(),
                Ok(Err(e)) => {
                    error!(
                        event = %event.name(),
                        handler = %handler_name,
                        error = %e,
                        "Event handler failed"
                    );
                    execution.fail(e.to_string())
                }
                Err(_) => {
                    warn!(
                        event = %event.name(),
                        handler = %handler_name,
                        timeout_ms = config.timeout_ms,
                        "Event handler timed out"
                    );
                    execution.fail(
                        MurmurError::EventTimeout(event.name().to_string(), config.timeout_ms)
                            .to_string(),
                    )
                }
            };

            self.record_execution(execution.clone()).await;
            report.executions.push(execution);
        }

        report
    }

    async fn record_execution(&self, execution: EventExecution) {
        let mut executions = self.executions.write().await;
        executions.push(execution);

        if executions.len() > self.max_execution_history {
            let drain_count = executions.len() - self.max_execution_history;
            executions.drain(0..drain_count);
        }
    }

    pub async fn get_handlers(&self, event: &EventType) -> Vec<EventHandlerInfo> {
        let handlers = self.handlers.read().await;
        handlers
            .get(event)
            .map(|hs| {
                hs.iter()
                    .map(|r| {
                        let mut info = r.handler.info();
                        info.enabled = r.enabled;
                        info
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn recent_executions(&self, limit: usize) -> Vec<EventExecution> {
        let executions = self.executions.read().await;
        executions.iter().rev().take(limit).cloned().collect()
    }

    pub async fn executions_for(&self, event: &EventType) -> Vec<EventExecution> {
        let executions = self.executions.read().await;
        executions
            .iter()
            .filter(|e| &e.event == event)
            .cloned()
            .collect()
    }

    pub async fn clear_execution_history(&self) {
        self.executions.write().await.clear();
    }

    pub async fn handler_count(&self) -> usize {
        let handlers = self.handlers.read().await;
        handlers.values().map(|h| h.len()).sum()
    }

    pub async fn has_handlers(&self, event: &EventType) -> bool {
        let handlers = self.handlers.read().await;
        handlers.get(event).map(|h| !h.is_empty()).unwrap_or(false)
    }
}
