//! Streaming integration tests
//!
//! - `stream: true` on the buffered routes and the forced `/stream` variants
//! - Line-delimited chunk body shape and headers
//! - Failure chunks for provider errors

use axum::http::header;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{parse_chunks, test_server};
use crate::mocks::{delta_frame, finish_frame, MockCompletionServer};

fn chunk(data: &str, full: &str, done: bool) -> Value {
    json!({"code": 200, "data": data, "full": full, "msg": "Success", "done": done})
}

#[tokio::test]
async fn test_stream_hi_there() {
    let mock = MockCompletionServer::start().await;
    mock.mock_stream(&["Hi", " there"]).await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/chat")
        .json(&json!({"message": "greet me", "stream": true}))
        .await;

    response.assert_status_ok();
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    let cache_control = response.headers().get(header::CACHE_CONTROL).unwrap();
    assert_eq!(cache_control.to_str().unwrap(), "no-cache");

    let body = response.text();
    assert!(body.ends_with('\n'));
    assert_eq!(
        parse_chunks(&body),
        vec![
            chunk("Hi", "Hi", false),
            chunk(" there", "Hi there", false),
            chunk("", "Hi there", true),
        ]
    );

    let sent = &mock.received_bodies().await[0];
    assert_eq!(sent["stream"], true);
}

#[tokio::test]
async fn test_forced_stream_routes() {
    let mock = MockCompletionServer::start().await;
    mock.mock_stream(&["ok"]).await;
    let server = test_server(&mock.completions_url());

    let cases = vec![
        ("/chat/stream", json!({"message": "m", "stream": false})),
        ("/analyze/stream", json!({"email_content": "e"})),
        ("/rewrite/stream", json!({"email_content": "e", "requirements": "r"})),
        ("/translate/stream", json!({"email_content": "e", "target_language": "Spanish"})),
        ("/template/stream", json!({"scenario": "s"})),
        ("/follow_up/stream", json!({"previous_email": "p", "instruction": "i"})),
    ];

    for (route, body) in cases {
        let response = server.post(route).json(&body).await;
        response.assert_status_ok();
        let chunks = parse_chunks(&response.text());
        assert_eq!(chunks.len(), 2, "route {}", route);
        assert_eq!(chunks[0], chunk("ok", "ok", false), "route {}", route);
        assert_eq!(chunks[1], chunk("", "ok", true), "route {}", route);
    }

    for sent in mock.received_bodies().await {
        assert_eq!(sent["stream"], true);
    }
}

#[tokio::test]
async fn test_stream_flag_on_operation_body() {
    let mock = MockCompletionServer::start().await;
    mock.mock_stream(&["Sum", "mary"]).await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/analyze")
        .json(&json!({"email_content": "Hi, pls send the report asap.", "stream": true}))
        .await;

    let chunks = parse_chunks(&response.text());
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[2], chunk("", "Summary", true));
}

#[tokio::test]
async fn test_malformed_frame_is_skipped() {
    let mock = MockCompletionServer::start().await;
    let body = format!(
        "{}data: {{\"choices\":[{{\"delta\":{{\"content\"\n\n{}data: [DONE]\n\n",
        delta_frame("A"),
        delta_frame("B"),
    );
    mock.mock_stream_body(body).await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/chat/stream")
        .json(&json!({"message": "m"}))
        .await;

    assert_eq!(
        parse_chunks(&response.text()),
        vec![chunk("A", "A", false), chunk("B", "AB", false), chunk("", "AB", true)]
    );
}

#[tokio::test]
async fn test_finish_reason_ends_stream_without_terminator() {
    let mock = MockCompletionServer::start().await;
    let body = format!("{}{}{}", delta_frame("x"), finish_frame("stop"), delta_frame("ignored"));
    mock.mock_stream_body(body).await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/template/stream")
        .json(&json!({"scenario": "s"}))
        .await;

    assert_eq!(
        parse_chunks(&response.text()),
        vec![chunk("x", "x", false), chunk("", "x", true)]
    );
}

#[tokio::test]
async fn test_stream_end_without_terminator_still_done() {
    let mock = MockCompletionServer::start().await;
    mock.mock_stream_body(delta_frame("partial")).await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/chat/stream")
        .json(&json!({"message": "m"}))
        .await;

    let chunks = parse_chunks(&response.text());
    assert_eq!(chunks.last().unwrap(), &chunk("", "partial", true));
    assert_eq!(chunks.iter().filter(|c| c["done"] == true).count(), 1);
}

#[tokio::test]
async fn test_stream_error_status_yields_single_failure_chunk() {
    let mock = MockCompletionServer::start().await;
    mock.mock_error(401, "invalid api key").await;
    let server = test_server(&mock.completions_url());

    let response = server
        .post("/chat/stream")
        .json(&json!({"message": "m"}))
        .await;

    response.assert_status_ok();
    let chunks = parse_chunks(&response.text());
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0]["code"], 400);
    assert_eq!(chunks[0]["data"], Value::Null);
    assert_eq!(chunks[0]["done"], true);
    let msg = chunks[0]["msg"].as_str().unwrap();
    assert!(msg.contains("401"));
    assert!(msg.contains("invalid api key"));
}

#[tokio::test]
async fn test_stream_connection_failure_yields_single_failure_chunk() {
    let server = test_server("http://127.0.0.1:1/v1/chat/completions");

    let response = server
        .post("/analyze/stream")
        .json(&json!({"email_content": "e"}))
        .await;

    let chunks = parse_chunks(&response.text());
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0]["code"], 400);
    assert_eq!(chunks[0]["done"], true);
    assert!(chunks[0]["msg"].as_str().unwrap().starts_with("An error occurred"));
}
