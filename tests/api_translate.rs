use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use assert_json_diff::{assert_json_eq, assert_json_include};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use oss_translator::server::api::{router, AppState};
use oss_translator::{Translator, TranslatorConfig, UsageLog, UsageRecord};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Upstream {
    calls: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<String>>>,
}

async fn completions(
    State(upstream): State<Upstream>,
    headers: axum::http::HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    upstream.calls.fetch_add(1, Ordering::SeqCst);
    upstream.bodies.lock().unwrap().push(body.clone());
    if let Some(value) = headers.get("authorization") {
        upstream
            .auth
            .lock()
            .unwrap()
            .push(value.to_str().unwrap_or_default().to_string());
    }

    let prompt = body["messages"][1]["content"].as_str().unwrap_or_default();
    if prompt.ends_with("\n\nfail") {
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": { "message": "model overloaded" } })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": "chatcmpl_mock",
            "object": "chat.completion",
            "model": body["model"],
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": "  Hola\n" },
                    "finish_reason": "stop"
                }
            ],
            "usage": { "prompt_tokens": 5, "completion_tokens": 7, "total_tokens": 12 }
        })),
    )
}

struct Harness {
    base: String,
    upstream_base: String,
    upstream: Upstream,
    tokens_file: std::path::PathBuf,
    _dir: tempfile::TempDir,
    servers: Vec<tokio::task::JoinHandle<()>>,
}

impl Drop for Harness {
    fn drop(&mut self) {
        for server in &self.servers {
            server.abort();
        }
    }
}

async fn start() -> Harness {
    let upstream = Upstream::default();
    let mock = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(upstream.clone());

    let mock_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let mock_addr = mock_listener.local_addr().expect("local addr");
    let mock_server = tokio::spawn(async move {
        let _ = axum::serve(mock_listener, mock).await;
    });

    let upstream_base = format!("http://{mock_addr}/v1");

    let dir = tempfile::tempdir().expect("tempdir");
    let tokens_file = dir.path().join("tokens.json");
    let config = TranslatorConfig {
        api_key: "hf-test".to_string(),
        api_base_url: upstream_base.clone(),
        tokens_file: tokens_file.clone(),
        ..Default::default()
    };
    let translator = Translator::new(&config).expect("translator");
    let app = router(AppState::new(translator, UsageLog::new(&tokens_file)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind api");
    let addr = listener.local_addr().expect("local addr");
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Harness {
        base: format!("http://{addr}"),
        upstream_base,
        upstream,
        tokens_file,
        _dir: dir,
        servers: vec![mock_server, server],
    }
}

async fn post_translate(harness: &Harness, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/api/translate", harness.base))
        .json(&body)
        .send()
        .await
        .expect("send request");
    let status = response.status().as_u16();
    let payload = response.json::<Value>().await.expect("json payload");
    (status, payload)
}

#[tokio::test]
async fn test_translate_end_to_end() {
    let harness = start().await;

    let (status, payload) = post_translate(
        &harness,
        json!({ "text": "Hello", "sourceLang": "English", "targetLang": "Spanish" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_json_eq!(
        payload,
        json!({
            "success": true,
            "translatedText": "Hola",
            "sourceLang": "English",
            "targetLang": "Spanish",
            "usage": { "input": 5, "output": 7 }
        })
    );

    let bodies = harness.upstream.bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_json_include!(
        actual: bodies[0].clone(),
        expected: json!({
            "model": "openai/gpt-oss-120b:groq",
            "temperature": 0.3,
            "messages": [
                { "role": "system" },
                {
                    "role": "user",
                    "content": "Translate the following text from English to Spanish. Only provide the translation, no explanations or additional text:\n\nHello"
                }
            ]
        })
    );
    assert_eq!(
        harness.upstream.auth.lock().unwrap().as_slice(),
        ["Bearer hf-test".to_string()]
    );

    let records = UsageLog::new(&harness.tokens_file).read_all().await;
    assert_eq!(records, vec![UsageRecord { input: 5, output: 7 }]);
}

#[tokio::test]
async fn test_omitted_source_lang_is_auto() {
    let harness = start().await;

    let (_, omitted) = post_translate(&harness, json!({ "text": "Salut", "targetLang": "English" })).await;
    let (_, auto) = post_translate(
        &harness,
        json!({ "text": "Salut", "sourceLang": "auto", "targetLang": "English" }),
    )
    .await;

    assert_json_eq!(omitted, auto);
    assert_eq!(omitted["sourceLang"], "auto");

    let bodies = harness.upstream.bodies.lock().unwrap().clone();
    assert_eq!(bodies[0], bodies[1]);
    assert!(bodies[0]["messages"][1]["content"]
        .as_str()
        .unwrap()
        .starts_with("Translate the following text to English."));
}

#[tokio::test]
async fn test_missing_fields_are_rejected_without_upstream_call() {
    let harness = start().await;

    for body in [
        json!({ "targetLang": "Spanish" }),
        json!({ "text": "Hello" }),
        json!({ "text": "", "targetLang": "Spanish" }),
        json!({}),
    ] {
        let (status, payload) = post_translate(&harness, body).await;
        assert_eq!(status, 400);
        assert_json_eq!(
            payload,
            json!({ "error": "Missing required fields: text and targetLang are required" })
        );
    }

    assert_eq!(harness.upstream.calls.load(Ordering::SeqCst), 0);
    assert!(UsageLog::new(&harness.tokens_file).read_all().await.is_empty());
}

#[tokio::test]
async fn test_upstream_failure_is_server_error() {
    let harness = start().await;

    let (status, payload) =
        post_translate(&harness, json!({ "text": "fail", "targetLang": "Spanish" })).await;

    assert_eq!(status, 500);
    assert_eq!(payload["error"], "Translation failed");
    let message = payload["message"].as_str().unwrap();
    assert!(message.contains("502"));
    assert!(message.contains("model overloaded"));
    assert!(UsageLog::new(&harness.tokens_file).read_all().await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let harness = start().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/translate", harness.base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("send request");

    assert_eq!(response.status().as_u16(), 400);
    let payload = response.json::<Value>().await.expect("json payload");
    assert_eq!(payload["error"], "Invalid request body");
    assert_eq!(harness.upstream.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_health() {
    let harness = start().await;

    let payload = reqwest::get(format!("{}/health", harness.base))
        .await
        .expect("send request")
        .json::<Value>()
        .await
        .expect("json payload");

    assert_json_include!(actual: payload, expected: json!({ "status": "ok", "service": "oss-translator" }));
}

#[tokio::test]
async fn test_batch_against_upstream_keeps_order_and_aborts() {
    let harness = start().await;
    let config = TranslatorConfig {
        api_key: "hf-test".to_string(),
        api_base_url: harness.upstream_base.clone(),
        ..Default::default()
    };
    let translator = Translator::new(&config).expect("translator");

    let texts: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    let results = translator
        .translate_batch(&texts, "English", "Spanish")
        .await
        .expect("batch");
    assert_eq!(results, vec!["Hola", "Hola", "Hola"]);

    let texts: Vec<String> = ["a", "fail", "c"].iter().map(|s| s.to_string()).collect();
    assert!(translator
        .translate_batch(&texts, "English", "Spanish")
        .await
        .is_err());

    // 3 for the first batch, 2 for the aborted one
    assert_eq!(harness.upstream.calls.load(Ordering::SeqCst), 5);
}
