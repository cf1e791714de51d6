//! End-to-end tests for the HTTP relay against mocked upstream providers

use std::time::{Duration, Instant};

use dayplanner::config::{ApiConfig, Config, Provider};
use dayplanner::server::{self, AppState};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPLY: &str = "EXPLANATION: Focus work first, then exercise.\nSCHEDULE:\n9:00 AM: Write report\n11:00 AM: Gym\nThanks!";

fn api(provider: Provider, key: &str, mock: bool) -> ApiConfig {
    ApiConfig {
        api_key: key.to_string(),
        api_provider: provider,
        use_mock_responses: mock,
    }
}

fn config_for(upstream: &MockServer) -> Config {
    let mut config = Config::default();
    config.llm.openai.base_url = Some(upstream.uri());
    config.llm.anthropic.base_url = Some(upstream.uri());
    config.image.base_url = upstream.uri();
    config.server.rate_limit_delay_ms = 0;
    config
}

async fn start_relay(config: &Config, api: ApiConfig, image_key: &str) -> String {
    let state = AppState::new(config, api, image_key).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::run(listener, state));
    format!("http://{}", addr)
}

fn tasks_body() -> Value {
    json!({
        "tasks": [
            { "id": "1", "description": "Write report" },
            { "id": "2", "description": "Gym" }
        ]
    })
}

async fn post(url: String, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new().post(url).json(&body).send().await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

fn openai_reply(text: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 40 }
    })
}

#[tokio::test]
async fn test_health() {
    let upstream = MockServer::start().await;
    let relay = start_relay(&config_for(&upstream), api(Provider::OpenAI, "", true), "").await;

    let response = reqwest::get(format!("{}/api/health", relay)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_config_redacts_key() {
    let upstream = MockServer::start().await;
    let relay = start_relay(&config_for(&upstream), api(Provider::Anthropic, "sk-secret", false), "").await;

    let text = reqwest::get(format!("{}/api/config", relay))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!text.contains("sk-secret"));

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["openaiApiKey"], "configured");
    assert_eq!(body["apiProvider"], "anthropic");
    assert_eq!(body["useMockResponses"], false);
}

#[tokio::test]
async fn test_config_without_key() {
    let upstream = MockServer::start().await;
    let relay = start_relay(&config_for(&upstream), api(Provider::OpenAI, "", true), "").await;

    let body: Value = reqwest::get(format!("{}/api/config", relay))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["openaiApiKey"], "");
    assert_eq!(body["useMockResponses"], true);
}

#[tokio::test]
async fn test_openai_schedule() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_reply(REPLY)))
        .expect(1)
        .mount(&upstream)
        .await;

    let relay = start_relay(&config_for(&upstream), api(Provider::OpenAI, "sk-test", false), "").await;
    let (status, body) = post(format!("{}/api/generate-schedule", relay), tasks_body()).await;

    assert_eq!(status, 200);
    assert_eq!(body["explanation"], "Focus work first, then exercise.");
    let schedule = body["schedule"].as_array().unwrap();
    assert_eq!(schedule.len(), 2);
    assert_eq!(schedule[0]["time"], "9:00 AM");
    assert_eq!(schedule[0]["taskDescription"], "Write report");
    assert_eq!(schedule[1]["time"], "11:00 AM");

    let requests = upstream.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["model"], "gpt-4o");
    assert_eq!(sent["max_tokens"], 800);
    assert_eq!(sent["messages"][0]["role"], "system");
    assert!(sent["messages"][1]["content"].as_str().unwrap().contains("- Write report\n- Gym"));
}

#[tokio::test]
async fn test_anthropic_schedule() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "text", "text": REPLY }],
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 100, "output_tokens": 30 }
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let relay = start_relay(&config_for(&upstream), api(Provider::Anthropic, "sk-ant", false), "").await;
    let (status, body) = post(format!("{}/api/generate-schedule", relay), tasks_body()).await;

    assert_eq!(status, 200);
    assert_eq!(body["schedule"].as_array().unwrap().len(), 2);

    let requests = upstream.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["model"], "claude-3-opus-20240229");
    assert_eq!(sent["messages"].as_array().unwrap().len(), 1);
    assert_eq!(sent["messages"][0]["role"], "user");
    assert!(sent.get("temperature").is_none());
}

#[tokio::test]
async fn test_rate_limit_reported_as_429_after_delay() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached for gpt-4o", "type": "requests" }
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let mut config = config_for(&upstream);
    config.server.rate_limit_delay_ms = 100;
    let relay = start_relay(&config, api(Provider::OpenAI, "sk-test", false), "").await;

    let started = Instant::now();
    let (status, body) = post(format!("{}/api/generate-schedule", relay), tasks_body()).await;

    assert_eq!(status, 429);
    assert_eq!(body["error"], "OpenAI rate limit exceeded");
    assert!(body["details"].is_string());
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_auth_error_maps_to_401() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": { "type": "authentication_error", "message": "invalid x-api-key" }
        })))
        .mount(&upstream)
        .await;

    let relay = start_relay(&config_for(&upstream), api(Provider::Anthropic, "bad", false), "").await;
    let (status, body) = post(format!("{}/api/generate-schedule", relay), tasks_body()).await;

    assert_eq!(status, 401);
    assert_eq!(body["error"], "Invalid Anthropic API key");
}

#[tokio::test]
async fn test_upstream_timeout_maps_to_504() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(openai_reply(REPLY))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&upstream)
        .await;

    let mut config = config_for(&upstream);
    config.llm.timeout_ms = 100;
    let relay = start_relay(&config, api(Provider::OpenAI, "sk-test", false), "").await;
    let (status, body) = post(format!("{}/api/generate-schedule", relay), tasks_body()).await;

    assert_eq!(status, 504);
    assert_eq!(body["error"], "Request to OpenAI timed out");
}

#[tokio::test]
async fn test_mock_mode_makes_no_upstream_call() {
    for provider in [Provider::OpenAI, Provider::Anthropic] {
        let upstream = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&upstream)
            .await;

        let relay = start_relay(&config_for(&upstream), api(provider, "sk-test", true), "").await;
        let (status, body) = post(format!("{}/api/generate-schedule", relay), tasks_body()).await;

        assert_eq!(status, 200);
        assert_eq!(body["schedule"].as_array().unwrap().len(), 2);
        assert_eq!(body["schedule"][0]["time"], "9:00 AM");
        assert!(upstream.received_requests().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_missing_key_is_500() {
    let upstream = MockServer::start().await;
    let relay = start_relay(&config_for(&upstream), api(Provider::OpenAI, "", false), "").await;
    let (status, body) = post(format!("{}/api/generate-schedule", relay), tasks_body()).await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "OpenAI API key is missing");
    assert_eq!(body["details"], "Please check the environment variables");
}

#[tokio::test]
async fn test_invalid_schedule_requests() {
    let upstream = MockServer::start().await;
    let relay = start_relay(&config_for(&upstream), api(Provider::OpenAI, "", true), "").await;
    let url = format!("{}/api/generate-schedule", relay);

    let (status, body) = post(url.clone(), json!({ "tasks": [] })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Tasks array is required and must not be empty");

    let (status, _) = post(url.clone(), json!({ "items": 3 })).await;
    assert_eq!(status, 400);

    let (status, body) = post(url.clone(), json!({ "tasks": [{ "id": "1", "description": "  " }] })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Task descriptions cannot be empty");

    let response = reqwest::Client::new()
        .post(url.clone())
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = reqwest::get(url).await.unwrap();
    assert_eq!(response.status().as_u16(), 405);

    let response = reqwest::get(format!("{}/api/nope", relay)).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_generate_image() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(header("authorization", "Bearer sk-img"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1,
            "data": [{ "url": "https://images.example.com/gym.png" }]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let relay = start_relay(&config_for(&upstream), api(Provider::OpenAI, "", true), "sk-img").await;
    let (status, body) = post(
        format!("{}/api/generate-image", relay),
        json!({ "taskDescription": "Go to the gym" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["imageUrl"], "https://images.example.com/gym.png");
    assert!(body.get("isMock").is_none());

    let requests = upstream.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["model"], "dall-e-3");
    assert_eq!(sent["n"], 1);
    assert!(sent["prompt"].as_str().unwrap().contains("\"Go to the gym\""));
}

#[tokio::test]
async fn test_generate_image_mock_and_validation() {
    let upstream = MockServer::start().await;
    let mut config = config_for(&upstream);
    config.mock.images = true;
    let relay = start_relay(&config, api(Provider::OpenAI, "", true), "").await;
    let url = format!("{}/api/generate-image", relay);

    let (status, body) = post(url.clone(), json!({ "taskDescription": "Cook dinner" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["isMock"], true);
    assert_eq!(body["imageUrl"], "https://placehold.co/600x400/f59e0b/white?text=FOOD");

    let (status, body) = post(url.clone(), json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Task description is required");

    let (status, _) = post(url, json!({ "taskDescription": "   " })).await;
    assert_eq!(status, 400);
}
