//! End-to-end submit flow against a mocked completion endpoint.

use pen2pdf::config::Config;
use pen2pdf::document::NotesContext;
use pen2pdf::gemini::GeminiClient;
use pen2pdf::ui::chat::ChatManager;
use pen2pdf::ui::chat::manager::{EMPTY_REPLY_FALLBACK, GREETING, REQUEST_FAILED_FALLBACK};
use serde_json::{Value, json};
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager(base_url: &str, notes: NotesContext) -> ChatManager {
    let config = Config {
        api_key: Some("test-key".to_string()),
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        ..Config::default()
    };
    let client = GeminiClient::new(&config).unwrap();
    ChatManager::new(client, notes)
}

async fn drain_until_len(manager: &mut ChatManager, len: usize) {
    for _ in 0..300 {
        manager.drain_replies();
        if manager.history().len() == len {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "timed out waiting for {len} messages, have {}",
        manager.history().len()
    );
}

fn notes_with(text: &str) -> NotesContext {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{text}").unwrap();
    NotesContext::from_file(&path).unwrap()
}

fn generate_route() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .and(query_param("key", "test-key"))
}

#[tokio::test]
async fn successful_round_trip_appends_one_user_and_one_assistant_message() {
    let server = MockServer::start().await;
    generate_route()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "A **resistor** limits current." } ] } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = manager(&server.uri(), notes_with("Ohm's law: V = IR"));
    manager.open();
    manager.submit("what is a resistor?".to_string());
    assert!(manager.is_typing());

    drain_until_len(&mut manager, 3).await;

    let messages = manager.history().messages();
    assert_eq!(messages[0].text, GREETING);
    assert_eq!(messages[1].text, "what is a resistor?");
    assert_eq!(messages[2].text, "A **resistor** limits current.");
    // Raw text stores exactly what arrived; formatting is render-only.
    assert_eq!(messages[2].raw_text, messages[2].text);
    assert!(!manager.is_typing());
}

#[tokio::test]
async fn outgoing_prompt_carries_context_history_and_question() {
    let server = MockServer::start().await;
    generate_route()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [ { "content": { "parts": [ { "text": "ok" } ] } } ]
        })))
        .mount(&server)
        .await;

    let mut manager = manager(&server.uri(), notes_with("Kirchhoff's current law"));
    manager.open();
    manager.submit("first question".to_string());
    drain_until_len(&mut manager, 3).await;
    manager.submit("second question".to_string());
    drain_until_len(&mut manager, 5).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let body: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();

    assert!(prompt.contains("Kirchhoff's current law"));
    assert!(prompt.contains(&format!("assistant: {GREETING}")));
    assert!(prompt.contains("user: first question"));
    assert!(prompt.contains("assistant: ok"));
    // The new question travels in its own section, not in the history.
    assert!(prompt.contains("### User's question:\n\"second question\""));
    assert!(!prompt.contains("user: second question"));
}

#[tokio::test]
async fn history_section_is_capped_at_five_messages() {
    let server = MockServer::start().await;
    generate_route()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [ { "content": { "parts": [ { "text": "reply" } ] } } ]
        })))
        .mount(&server)
        .await;

    let mut manager = manager(&server.uri(), NotesContext::empty());
    manager.open();
    for (i, expected_len) in (0..4).map(|i| (i, 3 + 2 * i)) {
        manager.submit(format!("question {i}"));
        drain_until_len(&mut manager, expected_len).await;
    }

    // The log stood at 7 messages when "question 3" was submitted; the
    // prompt window keeps the trailing five: reply, question 1, reply,
    // question 2, reply. The new question itself is not part of history.
    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests.last().unwrap().body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    let section = prompt
        .split("### Conversation history:\n")
        .nth(1)
        .unwrap()
        .split("\n\n---")
        .next()
        .unwrap();

    assert_eq!(section.lines().count(), 5);
    assert!(section.contains("user: question 1"));
    assert!(section.contains("user: question 2"));
    assert!(!section.contains("user: question 3"));
    assert!(!section.contains("user: question 0"));
    assert!(!section.contains(&format!("assistant: {GREETING}")));
}

#[tokio::test]
async fn response_without_candidates_yields_the_fixed_fallback() {
    let server = MockServer::start().await;
    generate_route()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let mut manager = manager(&server.uri(), NotesContext::empty());
    manager.open();
    manager.submit("anyone home?".to_string());
    drain_until_len(&mut manager, 3).await;

    assert_eq!(manager.history().messages()[2].text, EMPTY_REPLY_FALLBACK);
    assert!(!manager.is_typing());
}

#[tokio::test]
async fn server_error_yields_the_apology_fallback() {
    let server = MockServer::start().await;
    generate_route()
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut manager = manager(&server.uri(), NotesContext::empty());
    manager.open();
    manager.submit("still there?".to_string());
    drain_until_len(&mut manager, 3).await;

    assert_eq!(manager.history().messages()[2].text, REQUEST_FAILED_FALLBACK);
    assert!(!manager.is_typing());
}
