//! Buffered operation endpoint tests
//!
//! - POST /analyze, /rewrite, /translate, /template, /follow_up
//! - Envelope shape on success and on every failure class
//! - Outbound request shape (model parameters, conversation, credentials)

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{constants::TEST_MODEL, test_config, test_server, test_server_with};
use crate::mocks::MockCompletionServer;

#[tokio::test]
async fn test_analyze_returns_reply_in_envelope() {
    let mock = MockCompletionServer::start().await;
    mock.mock_reply("SUMMARY:...").await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/analyze")
        .json(&json!({"email_content": "Hi, pls send the report asap."}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({"code": 200, "data": "SUMMARY:...", "msg": "Success"}));
}

#[tokio::test]
async fn test_outbound_request_shape() {
    let mock = MockCompletionServer::start().await;
    mock.mock_reply("ok").await;
    let server = test_server(&mock.completions_url());

    server
        .post("/rewrite")
        .json(&json!({"email_content": "hey send it", "requirements": "more formal"}))
        .await
        .assert_status_ok();

    let bodies = mock.received_bodies().await;
    assert_eq!(bodies.len(), 1);
    let sent = &bodies[0];

    assert_eq!(sent["model"], TEST_MODEL);
    assert_eq!(sent["temperature"], 0.7);
    assert_eq!(sent["max_tokens"], 2000);
    assert_eq!(sent["stream"], false);

    let messages = sent["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    let user_turn = messages[1]["content"].as_str().unwrap();
    assert!(user_turn.contains("hey send it"));
    assert!(user_turn.contains("more formal"));
}

#[tokio::test]
async fn test_every_operation_endpoint_answers_with_envelope() {
    let mock = MockCompletionServer::start().await;
    mock.mock_reply("done").await;
    let server = test_server(&mock.completions_url());

    let cases = vec![
        ("/analyze", json!({"email_content": "e"})),
        ("/rewrite", json!({"email_content": "e", "requirements": "r"})),
        ("/translate", json!({"email_content": "e", "target_language": "German"})),
        ("/template", json!({"scenario": "meeting request"})),
        ("/follow_up", json!({"previous_email": "p", "instruction": "remind politely"})),
    ];

    for (route, body) in cases {
        let response = server.post(route).json(&body).await;
        response.assert_status_ok();
        let envelope: Value = response.json();
        assert_eq!(envelope["code"], 200, "route {}", route);
        assert_eq!(envelope["data"], "done", "route {}", route);
    }

    let bodies = mock.received_bodies().await;
    let prompts: Vec<&str> = bodies
        .iter()
        .map(|b| b["messages"][1]["content"].as_str().unwrap())
        .collect();
    assert!(prompts[2].contains("German"));
    assert!(prompts[3].contains("meeting request"));
    assert!(prompts[4].contains("remind politely"));
}

#[tokio::test]
async fn test_upstream_500_maps_to_failure_envelope() {
    let mock = MockCompletionServer::start().await;
    mock.mock_error(500, "upstream exploded").await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/analyze")
        .json(&json!({"email_content": "Hi"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["code"], 400);
    assert_eq!(body["data"], Value::Null);
    let msg = body["msg"].as_str().unwrap();
    assert!(msg.contains("500"));
    assert!(msg.contains("upstream exploded"));
}

#[tokio::test]
async fn test_wrong_credentials_surface_provider_status() {
    // The mock only answers requests carrying the expected key; anything else is a 404.
    let mock = MockCompletionServer::start().await;
    mock.mock_reply("never returned").await;
    let mut config = test_config(&mock.completions_url());
    config.completion_api_key = "some-other-key".to_string();
    let server = test_server_with(config);

    let response = server
        .post("/template")
        .json(&json!({"scenario": "s"}))
        .await;

    let body: Value = response.json();
    assert_eq!(body["code"], 400);
    assert!(body["msg"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn test_connection_failure_maps_to_failure_envelope() {
    let server = test_server("http://127.0.0.1:1/v1/chat/completions");

    let response = server
        .post("/translate")
        .json(&json!({"email_content": "Hallo", "target_language": "English"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["code"], 400);
    assert_eq!(body["data"], Value::Null);
    assert!(body["msg"].as_str().unwrap().starts_with("An error occurred"));
}

#[tokio::test]
async fn test_reply_without_choices_is_a_failure() {
    let mock = MockCompletionServer::start().await;
    mock.mock_raw_json(json!({"choices": []})).await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/analyze")
        .json(&json!({"email_content": "Hi"}))
        .await;

    let body: Value = response.json();
    assert_eq!(body["code"], 400);
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn test_invalid_body_rejected_with_envelope() {
    let mock = MockCompletionServer::start().await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/rewrite")
        .json(&json!({"email_content": "missing requirements"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], 422);
    assert_eq!(body["data"], Value::Null);
    assert!(body["msg"].as_str().unwrap().contains("requirements"));

    assert!(mock.received_bodies().await.is_empty());
}
