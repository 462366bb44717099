//! End-to-end integration tests for the dispatcher and receive loop.

mod common;

use common::{group_message, Harness, RecordingAi, FIXED, GROUP, USER};
use intent_router::Intent;
use std::sync::Arc;
use std::time::Duration;
use whatsapp_bot::{
    run, Collaborators, Dispatcher, DispatcherSettings, DropReason, Outcome,
};
use whatsapp_client::WhatsAppClient;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_authorization_lifecycle() {
    let h = Harness::new().await;

    // Absent file is recreated empty on open.
    assert_eq!(h.store_file().await, "[]");

    // Unknown sender is dropped without a reply.
    let outcome = h.dispatcher.dispatch(&group_message(USER, "!ping")).await;
    assert_eq!(outcome, Outcome::Dropped(DropReason::Unauthorized));
    assert!(h.sender.replies().is_empty());

    // A fixed number authorizes USER.
    h.dispatcher
        .dispatch(&group_message(FIXED, "renan, adicione o número 5511999990000"))
        .await;
    assert_eq!(
        h.sender.last_reply().as_deref(),
        Some("✅ Número 5511999990000 adicionado à lista de autorizados.")
    );
    assert_eq!(h.store_file().await, r#"["5511999990000"]"#);
    assert_eq!(h.sender.direct().len(), 1);
    assert_eq!(h.sender.direct()[0].0, USER);

    // The very next message from USER sees the change.
    let outcome = h.dispatcher.dispatch(&group_message(USER, "!ping")).await;
    assert_eq!(outcome, Outcome::Executed(Intent::Ping));
    assert_eq!(h.sender.last_reply().as_deref(), Some("🏓 Pong!"));

    // Adding again is a no-op.
    h.dispatcher
        .dispatch(&group_message(FIXED, "renan adicione o número 5511999990000"))
        .await;
    assert_eq!(
        h.sender.last_reply().as_deref(),
        Some("ℹ️ Número 5511999990000 já estava autorizado.")
    );
    assert_eq!(h.store_file().await, r#"["5511999990000"]"#);

    // USER cannot revoke itself.
    h.dispatcher
        .dispatch(&group_message(USER, "renan remova o número 5511999990000"))
        .await;
    assert_eq!(
        h.sender.last_reply().as_deref(),
        Some("⚠️ Você não pode remover o seu próprio número.")
    );

    // Nobody can revoke a fixed number.
    h.dispatcher
        .dispatch(&group_message(USER, "renan remova o número 5500000000000"))
        .await;
    assert_eq!(
        h.sender.last_reply().as_deref(),
        Some("⚠️ O número 5500000000000 é fixo e não pode ser removido.")
    );

    // The fixed number revokes USER.
    h.dispatcher
        .dispatch(&group_message(FIXED, "renan remova o número 5511999990000"))
        .await;
    assert_eq!(
        h.sender.last_reply().as_deref(),
        Some("🗑️ Número 5511999990000 removido da lista de autorizados.")
    );
    assert_eq!(h.store_file().await, "[]");

    let outcome = h.dispatcher.dispatch(&group_message(USER, "!ping")).await;
    assert_eq!(outcome, Outcome::Dropped(DropReason::Unauthorized));

    // Admin phrases never reached the AI.
    assert!(h.ai.prompts().is_empty());
}

#[tokio::test]
async fn test_fixed_number_cannot_be_added() {
    let h = Harness::new().await;

    h.dispatcher
        .dispatch(&group_message(FIXED, "renan adicione o número 5500000000000"))
        .await;

    assert_eq!(
        h.sender.last_reply().as_deref(),
        Some("⚠️ Número 5500000000000 é fixo, não pode ser adicionado via comando.")
    );
    assert_eq!(h.store_file().await, "[]");
}

#[tokio::test]
async fn test_routes_to_collaborators() {
    let h = Harness::new().await;

    for text in ["!btc", "!cryptonews", "renan, tudo bem?", "bom dia", "isso não é comando"] {
        h.dispatcher.dispatch(&group_message(FIXED, text)).await;
    }

    assert_eq!(
        h.sender.reply_texts(),
        vec![
            "quote:btc".to_string(),
            "📰 digest".to_string(),
            "ai:renan, tudo bem?".to_string(),
            "🌞 Bom dia, guerreiro!".to_string(),
        ]
    );
    assert!(h.sender.replies().iter().all(|(chat, _)| chat == GROUP));
    assert_eq!(h.ai.prompts(), vec!["renan, tudo bem?"]);
}

#[tokio::test]
async fn test_run_loop_serializes_concurrent_admin_commands() {
    let h = Harness::new().await;

    let numbers: Vec<String> = (0..20).map(|i| format!("55219888877{:02}", i)).collect();
    let messages: Vec<_> = numbers
        .iter()
        .map(|n| group_message(FIXED, &format!("renan adicione o número {}", n)))
        .collect();

    let stats = run(
        tokio_stream::iter(messages),
        h.dispatcher.clone(),
        std::future::pending::<()>(),
        Duration::from_secs(5),
    )
    .await;

    assert_eq!(stats.received, 20);
    assert_eq!(stats.completed, 20);
    assert_eq!(stats.aborted, 0);

    let persisted: Vec<String> = serde_json::from_str(&h.store_file().await).unwrap();
    assert_eq!(persisted, numbers);
}

#[tokio::test]
async fn test_shutdown_waits_for_in_flight_dispatch() {
    let h = Harness::with_ai(RecordingAi::with_delay(Duration::from_millis(200))).await;

    let messages = tokio_stream::StreamExt::chain(
        tokio_stream::iter(vec![group_message(FIXED, "renan, me conta uma piada")]),
        tokio_stream::pending(),
    );

    let stats = run(
        messages,
        h.dispatcher.clone(),
        tokio::time::sleep(Duration::from_millis(50)),
        Duration::from_secs(5),
    )
    .await;

    assert_eq!(stats.received, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(
        h.sender.last_reply().as_deref(),
        Some("ai:renan, me conta uma piada")
    );
}

#[tokio::test]
async fn test_shutdown_aborts_after_grace() {
    let h = Harness::with_ai(RecordingAi::with_delay(Duration::from_secs(30))).await;

    let messages = tokio_stream::StreamExt::chain(
        tokio_stream::iter(vec![group_message(FIXED, "renan, pense bastante")]),
        tokio_stream::pending(),
    );

    let stats = run(
        messages,
        h.dispatcher.clone(),
        tokio::time::sleep(Duration::from_millis(50)),
        Duration::from_millis(50),
    )
    .await;

    assert_eq!(stats.received, 1);
    assert_eq!(stats.completed, 0);
    assert_eq!(stats.aborted, 1);
    assert!(h.sender.replies().is_empty());
}

#[tokio::test]
async fn test_group_restriction_with_real_transport() {
    let bridge = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages/send"))
        .and(body_json(serde_json::json!({
            "to": GROUP,
            "text": "🏓 Pong!"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&bridge)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(
        authorized_store::AuthorizedStore::open([FIXED], dir.path().join("authorized.json")).await,
    );
    let dispatcher = Dispatcher::new(
        DispatcherSettings {
            bot_name: "TestBot".into(),
            restrict_to_group: true,
            ..DispatcherSettings::default()
        },
        store,
        Collaborators {
            sender: Arc::new(WhatsAppClient::new(bridge.uri()).unwrap()),
            prices: Arc::new(common::StaticPrices),
            news: Arc::new(common::StaticNews),
            ai: None,
        },
    );

    let mut direct = group_message(FIXED, "!ping");
    direct.is_group = false;
    direct.chat = format!("{}@s.whatsapp.net", FIXED);

    assert_eq!(
        dispatcher.dispatch(&direct).await,
        Outcome::Dropped(DropReason::NotGroup)
    );
    assert_eq!(
        dispatcher.dispatch(&group_message(FIXED, "!ping")).await,
        Outcome::Executed(Intent::Ping)
    );
}
