//! Chat endpoint integration tests
//!
//! - POST /chat with and without history
//! - `action` + `parameters` selecting a templated operation
//! - Fallback to plain chat for unknown actions or incomplete parameters

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::test_server;
use crate::mocks::MockCompletionServer;

#[tokio::test]
async fn test_plain_chat_forwards_message_and_history() {
    let mock = MockCompletionServer::start().await;
    mock.mock_reply("Sure, here is a draft.").await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/chat")
        .json(&json!({
            "message": "Can you help me reply to my boss?",
            "history": [
                {"role": "user", "content": "Hello"},
                {"role": "assistant", "content": "Hi! How can I help?"}
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["code"], 200);
    assert_eq!(body["data"], "Sure, here is a draft.");

    let sent = &mock.received_bodies().await[0];
    let messages = sent["messages"].as_array().unwrap();
    let roles: Vec<&str> = messages.iter().map(|m| m["role"].as_str().unwrap()).collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    assert_eq!(messages[1]["content"], "Hello");
    assert_eq!(messages[3]["content"], "Can you help me reply to my boss?");
}

#[tokio::test]
async fn test_action_with_parameters_runs_operation() {
    let mock = MockCompletionServer::start().await;
    mock.mock_reply("Translated.").await;
    let server = test_server(&mock.completions_url());

    server
        .post("/chat")
        .json(&json!({
            "message": "ignored for templated actions",
            "history": [{"role": "user", "content": "dropped"}],
            "action": "translate",
            "parameters": {"email_content": "Bonjour Marie", "target_language": "English"}
        }))
        .await
        .assert_status_ok();

    let sent = &mock.received_bodies().await[0];
    let messages = sent["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    let prompt = messages[1]["content"].as_str().unwrap();
    assert!(prompt.contains("Bonjour Marie"));
    assert!(prompt.contains("English"));
    assert!(!prompt.contains("ignored for templated actions"));
}

#[tokio::test]
async fn test_missing_parameter_falls_back_to_plain_chat() {
    let mock = MockCompletionServer::start().await;
    mock.mock_reply("Fallback reply").await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/chat")
        .json(&json!({
            "message": "make this formal please",
            "action": "rewrite",
            "parameters": {"email_content": "hey send it"}
        }))
        .await;

    let body: Value = response.json();
    assert_eq!(body["code"], 200);
    assert_eq!(body["data"], "Fallback reply");

    let sent = &mock.received_bodies().await[0];
    assert_eq!(sent["messages"][1]["content"], "make this formal please");
}

#[tokio::test]
async fn test_unknown_action_falls_back_to_plain_chat() {
    let mock = MockCompletionServer::start().await;
    mock.mock_reply("ok").await;
    let server = test_server(&mock.completions_url());

    server
        .post("/chat")
        .json(&json!({"message": "just chat", "action": "summarize", "parameters": {}}))
        .await
        .assert_status_ok();

    let sent = &mock.received_bodies().await[0];
    assert_eq!(sent["messages"][1]["content"], "just chat");
}

#[tokio::test]
async fn test_chat_without_message_is_rejected() {
    let mock = MockCompletionServer::start().await;
    let server = test_server(&mock.completions_url());

    let response = server.post("/chat").json(&json!({"history": []})).await;

    let body: Value = response.json();
    assert_eq!(body["code"], 422);
    assert!(body["msg"].as_str().unwrap().contains("message"));
}
