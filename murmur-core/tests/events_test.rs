use async_trait::async_trait;
use murmur_core::{
    AgentRuntime, Client, DynRuntime, EventBus, EventConfig, EventHandler, EventPayload,
    EventType, InMemoryRuntime, Memory, MurmurError, MurmurResult, RuntimeOptions, ScenarioClient,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers every received message after a delay.
struct DelayedEchoHandler {
    delay: Duration,
    handled: AtomicUsize,
}

impl DelayedEchoHandler {
    fn new(delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            delay: Duration::from_millis(delay_ms),
            handled: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl EventHandler for DelayedEchoHandler {
    fn name(&self) -> &str {
        "delayed_echo"
    }

    fn event(&self) -> EventType {
        EventType::MessageReceived
    }

    async fn handle(&self, payload: &EventPayload) -> MurmurResult<()> {
        tokio::time::sleep(self.delay).await;
        self.handled.fetch_add(1, Ordering::SeqCst);

        let message = payload
            .message()
            .ok_or_else(|| MurmurError::event("expected a message payload"))?;
        if let Some(responder) = &message.responder {
            let mut reply = message.message.clone();
            reply.content.text = format!("echo: {}", message.message.text());
            responder.respond(reply);
        }
        Ok(())
    }
}

struct FailingHandler;

#[async_trait]
impl EventHandler for FailingHandler {
    fn name(&self) -> &str {
        "failing"
    }

    fn event(&self) -> EventType {
        EventType::MessageReceived
    }

    fn priority(&self) -> i32 {
        50
    }

    async fn handle(&self, _payload: &EventPayload) -> MurmurResult<()> {
        Err(MurmurError::Internal("handler exploded".to_string()))
    }
}

mod delivery_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_returns_after_handlers_complete() {
        let alice = Arc::new(InMemoryRuntime::named("Alice"));
        let bob = Arc::new(InMemoryRuntime::named("Bob"));
        bob.install_default_handlers().await.unwrap();
        let echo = DelayedEchoHandler::new(30);
        bob.events().register(echo.clone()).await.unwrap();

        let client = ScenarioClient::new();
        client.start(alice.clone()).await.unwrap();
        let room = client.create_room(bob.agent_id(), None).await.unwrap();

        let replies = Arc::new(Mutex::new(Vec::<Memory>::new()));
        let sink = replies.clone();
        client
            .on_response(
                bob.agent_id(),
                Arc::new(move |memory| sink.lock().unwrap().push(memory)),
            )
            .await;

        let receivers: Vec<DynRuntime> = vec![bob.clone()];
        client
            .send_message(&*alice, &receivers, "Hello everyone!")
            .await
            .unwrap();

        // No sleep: delivery is complete once send_message returns.
        assert_eq!(echo.handled.load(Ordering::SeqCst), 1);
        assert_eq!(bob.get_memories(&room.room_id).await.unwrap().len(), 1);
        assert_eq!(replies.lock().unwrap()[0].text(), "echo: Hello everyone!");
        assert!(bob.is_connected(&alice.agent_id(), &room.room_id).await);

        client.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_handler_failure_does_not_fail_send() {
        let alice = Arc::new(InMemoryRuntime::named("Alice"));
        let bob = Arc::new(InMemoryRuntime::named("Bob"));
        bob.install_default_handlers().await.unwrap();
        bob.events().register(Arc::new(FailingHandler)).await.unwrap();

        let client = ScenarioClient::new();
        client.start(alice.clone()).await.unwrap();
        let room = client.create_room(bob.agent_id(), None).await.unwrap();

        let receivers: Vec<DynRuntime> = vec![bob.clone()];
        let sent = client
            .send_message(&*alice, &receivers, "still delivered")
            .await
            .unwrap();

        assert_eq!(sent, 1);
        assert_eq!(bob.get_memories(&room.room_id).await.unwrap().len(), 1);

        let executions = bob.events().executions_for(&EventType::MessageReceived).await;
        assert_eq!(executions.len(), 3);
        assert_eq!(executions.iter().filter(|e| !e.is_successful()).count(), 1);
    }
}

mod bus_tests {
    use super::*;

    #[tokio::test]
    async fn test_slow_handler_times_out() {
        let bus = EventBus::with_config(EventConfig::default().with_timeout(10));
        bus.register(DelayedEchoHandler::new(200)).await.unwrap();

        let report = bus
            .emit(EventPayload::new(
                EventType::MessageReceived,
                Default::default(),
            ))
            .await;

        assert_eq!(report.handled(), 1);
        assert!(!report.all_succeeded());
        let failure = report.failures().next().unwrap();
        assert!(failure.error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_bad_payload_recorded_as_failure() {
        let bus = EventBus::new();
        bus.register(DelayedEchoHandler::new(0)).await.unwrap();

        let report = bus
            .emit(EventPayload::client_registered("scenario"))
            .await;
        assert!(report.all_succeeded());
        assert_eq!(report.handled(), 0);

        let report = bus
            .emit(EventPayload::new(
                EventType::MessageReceived,
                Default::default(),
            ))
            .await;
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_register_client_emits_event() {
        tokio_test::block_on(async {
            let runtime = InMemoryRuntime::new(RuntimeOptions::new("Alice"));
            let client = Arc::new(ScenarioClient::new());

            runtime.register_client("scenario", client).await.unwrap();

            assert!(runtime.clients().contains("scenario").await);
        });
    }
}
