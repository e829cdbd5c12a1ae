use murmur_core::{
    start_scenarios, AgentRuntime, Client, DynRuntime, EventsConfig, InMemoryRuntime,
    RuntimeOptions, ScenarioClient, ScenarioRunner, ScenarioScript, ScenarioStep,
    SCENARIO_CLIENT_NAME,
};
use std::sync::Arc;

async fn crew(names: &[&str]) -> Vec<Arc<InMemoryRuntime>> {
    let mut runtimes = Vec::new();
    for name in names {
        let runtime = InMemoryRuntime::new(
            RuntimeOptions::new(*name).with_events_config(&EventsConfig::default()),
        );
        runtime.install_default_handlers().await.unwrap();
        runtimes.push(Arc::new(runtime));
    }
    runtimes
}

fn as_members(runtimes: &[Arc<InMemoryRuntime>]) -> Vec<DynRuntime> {
    runtimes.iter().map(|r| r.clone() as DynRuntime).collect()
}

mod client_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_full_conversation_by_hand() {
        let runtimes = crew(&["Alice", "Bob", "Carol"]).await;
        let members = as_members(&runtimes);
        let (alice, bob, carol) = (&runtimes[0], &runtimes[1], &runtimes[2]);

        let client = Arc::new(ScenarioClient::new());
        client.start(members[0].clone()).await.unwrap();
        alice
            .register_client(SCENARIO_CLIENT_NAME, client.clone())
            .await
            .unwrap();

        for member in &members {
            let name = format!("Test Room for {}", member.character_name());
            client
                .create_room(member.agent_id(), Some(&name))
                .await
                .unwrap();
        }

        client
            .save_message(members[0].as_ref(), &members, "Earlier message from conversation...")
            .await
            .unwrap();
        client
            .save_message(members[1].as_ref(), &members, "Previous reply in history...")
            .await
            .unwrap();
        client
            .send_message(members[0].as_ref(), &members, "Hello everyone!")
            .await
            .unwrap();

        let conversations = client.get_conversations(&members).await.unwrap();
        assert_eq!(conversations.len(), 3);
        for conversation in &conversations {
            let texts: Vec<&str> = conversation.iter().map(|m| m.text()).collect();
            assert_eq!(
                texts,
                vec![
                    "Earlier message from conversation...",
                    "Previous reply in history...",
                    "Hello everyone!",
                ]
            );
            assert!(conversation.iter().all(|m| m.is_stored()));
        }

        // Alice sent to herself without a connection; the others saw her join.
        let carol_room = client.room_for(&carol.agent_id()).await.unwrap();
        assert!(carol.is_connected(&alice.agent_id(), &carol_room.room_id).await);
        assert!(alice.connections().await.is_empty());

        assert!(alice.clients().contains(SCENARIO_CLIENT_NAME).await);
        alice.clients().stop_all().await.unwrap();
        assert!(!client.is_started().await);
    }

    #[tokio::test]
    async fn test_rooms_provisioned_on_host_runtime() {
        let runtimes = crew(&["Alice", "Bob"]).await;
        let members = as_members(&runtimes);

        let client = ScenarioClient::new();
        client.start(members[0].clone()).await.unwrap();
        let bob_room = client
            .create_room(runtimes[1].agent_id(), None)
            .await
            .unwrap();

        let provisioned = runtimes[0].room(&bob_room.room_id).await.unwrap();
        assert_eq!(provisioned.name, format!("Room for {}", runtimes[1].agent_id()));
        assert!(runtimes[1].room(&bob_room.room_id).await.is_none());

        client.stop().await.unwrap();
    }
}

mod runner_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_scripts_run_in_order() {
        let runtimes = crew(&["Alice", "Bob"]).await;
        let members = as_members(&runtimes);

        let warmup = ScenarioScript::new("warmup")
            .create_rooms()
            .send(1, "ready?")
            .collect();
        let main = ScenarioScript::default_conversation();

        let outcomes = start_scenarios(&[warmup, main], &members).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].scenario, "warmup");
        // Fresh rooms for the second script: only its own messages are visible.
        let bob = outcomes[1].last_log().unwrap().perspective("Bob").unwrap();
        assert_eq!(bob.lines.len(), 3);
        assert!(bob.lines.iter().all(|l| l.text != "ready?"));
    }

    #[tokio::test]
    async fn test_collect_snapshots_progress() {
        let runtimes = crew(&["Alice", "Bob"]).await;
        let members = as_members(&runtimes);

        let script = ScenarioScript::new("two-snapshots")
            .step(ScenarioStep::CreateRooms {
                name_template: Some("{name}'s desk".to_string()),
            })
            .send(0, "first")
            .collect()
            .send(1, "second")
            .collect();

        let outcome = ScenarioRunner::new().run(&script, &members).await.unwrap();

        assert_eq!(outcome.logs.len(), 2);
        assert_eq!(outcome.logs[0].message_count(), 2);
        assert_eq!(outcome.logs[1].message_count(), 4);

        let rooms = runtimes[0].rooms().await;
        assert!(rooms.iter().any(|r| r.name == "Bob's desk"));
    }

    #[tokio::test]
    async fn test_messages_without_rooms_are_skipped() {
        let runtimes = crew(&["Alice", "Bob"]).await;
        let members = as_members(&runtimes);

        let script = ScenarioScript::new("no-rooms")
            .save(0, "into the void")
            .send(1, "anyone?")
            .collect();

        let outcome = ScenarioRunner::new().run(&script, &members).await.unwrap();

        assert_eq!(outcome.messages_saved, 0);
        assert_eq!(outcome.messages_sent, 0);
        assert_eq!(outcome.last_log().unwrap().message_count(), 0);
    }
}
