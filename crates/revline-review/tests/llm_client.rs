use std::time::Duration;

use revline_core::{LlmConfig, RevlineError};
use revline_review::llm::{ChatCompletion, ChatMessage, LlmClient};
use revline_review::retry::RetryPolicy;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }
        ]
    })
}

fn client_for(server: &MockServer, max_retries: u32) -> LlmClient {
    let config = LlmConfig {
        api_key: Some("test-key".into()),
        base_url: Some(server.uri()),
        model: "gpt-4-turbo".into(),
        timeout_secs: 5,
        max_retries,
        ..LlmConfig::default()
    };
    LlmClient::new(&config).unwrap().with_retry_policy(
        RetryPolicy::new(max_retries)
            .with_intervals(Duration::from_millis(1), Duration::from_millis(5)),
    )
}

#[tokio::test]
async fn sends_bearer_key_and_single_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4-turbo",
            "messages": [{ "role": "user", "content": "review me" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("looks fine")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 0);
    let text = client
        .complete(vec![ChatMessage::user("review me")])
        .await
        .unwrap();
    assert_eq!(text, "looks fine");
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let err = client
        .complete(vec![ChatMessage::user("x")])
        .await
        .unwrap_err();
    assert!(!err.is_transient());
    assert!(err.to_string().contains("401"));
    assert!(err.to_string().contains("invalid api key"));
}

#[tokio::test]
async fn server_errors_are_retried_then_succeed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 2);
    let text = client.complete(vec![ChatMessage::user("x")]).await.unwrap();
    assert_eq!(text, "recovered");
}

#[tokio::test]
async fn rate_limit_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let err = client
        .complete(vec![ChatMessage::user("x")])
        .await
        .unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn malformed_body_is_an_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server, 0);
    let err = client.chat(&[ChatMessage::user("x")]).await.unwrap_err();
    assert!(matches!(err, RevlineError::Llm { transient: false, .. }));
    assert!(err.to_string().contains("unexpected response structure"));
}

#[tokio::test]
async fn refused_connection_is_transient() {
    // Grab a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = LlmConfig {
        api_key: Some("test-key".into()),
        base_url: Some(format!("http://127.0.0.1:{port}")),
        timeout_secs: 2,
        max_retries: 0,
        ..LlmConfig::default()
    };
    let client = LlmClient::new(&config).unwrap();
    let err = client.chat(&[ChatMessage::user("x")]).await.unwrap_err();
    assert!(matches!(err, RevlineError::Llm { transient: true, .. }), "got {err}");
}
