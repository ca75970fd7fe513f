mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;

use aidagent_core::{ChatConfig, ChatError, ChatSessionManager};
use aidagent_llm::{ResponderError, TurnRole};
use aidagent_types::ChatRole;

use common::{stored_alert, InMemoryAlertStore, InMemoryChatStore, ScriptedResponder};

fn manager(
    store: Arc<InMemoryAlertStore>,
    sessions: Arc<InMemoryChatStore>,
    responder: Arc<ScriptedResponder>,
) -> ChatSessionManager {
    ChatSessionManager::new(store, sessions, responder, ChatConfig::default())
}

fn store_with_alert() -> Arc<InMemoryAlertStore> {
    Arc::new(InMemoryAlertStore::seeded(
        vec![stored_alert("alert123", "Flood warning in your area")],
        Some(Utc::now()),
    ))
}

#[tokio::test]
async fn converse_appends_both_turns_in_order() {
    let sessions = Arc::new(InMemoryChatStore::new());
    let responder = Arc::new(ScriptedResponder::new());
    responder.push_reply("No new updates.");

    let mgr = manager(store_with_alert(), sessions, responder);
    let reply = mgr.converse("alert123", "user1", "any update?").await.unwrap();
    assert_eq!(reply, "No new updates.");

    let history = mgr.get_history("alert123", "user1").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, ChatRole::Participant);
    assert_eq!(history[0].text, "any update?");
    assert_eq!(history[1].role, ChatRole::Assistant);
    assert_eq!(history[1].text, "No new updates.");
}

#[tokio::test]
async fn repeated_converses_alternate_strictly() {
    let sessions = Arc::new(InMemoryChatStore::new());
    let responder = Arc::new(ScriptedResponder::new());
    for round in 0..4 {
        responder.push_reply(format!("reply {round}"));
    }

    let mgr = manager(store_with_alert(), sessions, responder);
    for round in 0..4 {
        mgr.converse("alert123", "user1", &format!("question {round}"))
            .await
            .unwrap();
    }

    let history = mgr.get_history("alert123", "user1").await.unwrap();
    assert_eq!(history.len(), 8);
    for (i, message) in history.iter().enumerate() {
        let expected_role = if i % 2 == 0 {
            ChatRole::Participant
        } else {
            ChatRole::Assistant
        };
        assert_eq!(message.role, expected_role);
        let expected_text = if i % 2 == 0 {
            format!("question {}", i / 2)
        } else {
            format!("reply {}", i / 2)
        };
        assert_eq!(message.text, expected_text);
    }
}

#[tokio::test]
async fn responder_failure_keeps_participant_message() {
    let sessions = Arc::new(InMemoryChatStore::new());
    let responder = Arc::new(ScriptedResponder::new());
    responder.push_error(ResponderError::Unavailable("down".to_string()));

    let mgr = manager(store_with_alert(), sessions, responder);
    let err = mgr
        .converse("alert123", "user1", "any update?")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::ResponderUnavailable(_)));

    // the question was asked; the history must say so even without a reply
    let history = mgr.get_history("alert123", "user1").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role, ChatRole::Participant);
}

#[tokio::test]
async fn context_window_is_bounded_but_history_is_not() {
    let sessions = Arc::new(InMemoryChatStore::new());
    let responder = Arc::new(ScriptedResponder::new());

    let mgr = manager(store_with_alert(), sessions, responder.clone());
    for round in 0..5 {
        mgr.converse("alert123", "user1", &format!("question {round}"))
            .await
            .unwrap();
    }

    let contexts = responder.contexts();
    let last = contexts.last().unwrap();
    // system preamble plus at most the five most recent messages
    assert_eq!(last.len(), 6);
    assert_eq!(last[0].role, TurnRole::System);
    assert!(last[0].text.contains("Flood warning in your area"));
    assert_eq!(last[5].text, "question 4");

    // full history retained regardless of the window
    let history = mgr.get_history("alert123", "user1").await.unwrap();
    assert_eq!(history.len(), 10);
}

#[tokio::test]
async fn converse_on_unknown_alert_fails() {
    let sessions = Arc::new(InMemoryChatStore::new());
    let responder = Arc::new(ScriptedResponder::new());

    let mgr = manager(
        Arc::new(InMemoryAlertStore::new()),
        sessions,
        responder,
    );
    let err = mgr.converse("nope", "user1", "hello").await.unwrap_err();
    assert!(matches!(err, ChatError::AlertNotFound(id) if id == "nope"));
}

#[tokio::test]
async fn history_of_unknown_session_is_not_found() {
    let sessions = Arc::new(InMemoryChatStore::new());
    let responder = Arc::new(ScriptedResponder::new());

    let mgr = manager(store_with_alert(), sessions, responder);
    let err = mgr.get_history("alert123", "stranger").await.unwrap_err();
    assert!(matches!(err, ChatError::SessionNotFound { .. }));
}

#[tokio::test]
async fn sessions_are_created_lazily_and_kept_separate() {
    let sessions = Arc::new(InMemoryChatStore::new());
    let responder = Arc::new(ScriptedResponder::new());

    let mgr = manager(store_with_alert(), sessions, responder);
    mgr.converse("alert123", "user1", "hello").await.unwrap();
    mgr.converse("alert123", "user2", "hi there").await.unwrap();

    let first = mgr.get_history("alert123", "user1").await.unwrap();
    let second = mgr.get_history("alert123", "user2").await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(first[0].text, "hello");
    assert_eq!(second[0].text, "hi there");
}

#[tokio::test]
async fn concurrent_converses_on_one_session_are_serialized() {
    let sessions = Arc::new(InMemoryChatStore::new());
    let responder =
        Arc::new(ScriptedResponder::new().with_delay(Duration::from_millis(50)));

    let mgr = manager(store_with_alert(), sessions, responder);
    let results = join_all([
        mgr.converse("alert123", "user1", "first"),
        mgr.converse("alert123", "user1", "second"),
    ])
    .await;
    for result in results {
        result.unwrap();
    }

    // serialized exchanges: each question is directly followed by its reply
    let history = mgr.get_history("alert123", "user1").await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, ChatRole::Participant);
    assert_eq!(history[1].role, ChatRole::Assistant);
    assert_eq!(history[2].role, ChatRole::Participant);
    assert_eq!(history[3].role, ChatRole::Assistant);
}
