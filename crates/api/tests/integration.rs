//! Integration tests for the API layer.
//!
//! These tests spin up a real HTTP server on a random port, backed by a
//! coordinator with scripted LLM and handler doubles.

use alchemy_api::{AppState, create_router};
use alchemy_common::{AlchemyError, ContentHandler, IntentLabel, Result, ResultEnvelope};
use alchemy_coordinator::{CapabilitySet, Coordinator, CoordinatorConfig, HandlerRegistry};
use alchemy_llm::{LlmClient, LlmRequest, LlmResponse};
use async_trait::async_trait;
use std::sync::Arc;

struct FixedLlm(&'static str);

#[async_trait]
impl LlmClient for FixedLlm {
    async fn complete(&self, _request: LlmRequest) -> Result<LlmResponse> {
        Ok(LlmResponse {
            content: self.0.to_string(),
            model: "fixed".into(),
            usage: None,
            finish_reason: None,
        })
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

struct LabelHandler(IntentLabel);

#[async_trait]
impl ContentHandler for LabelHandler {
    fn id(&self) -> &str {
        self.0.as_str()
    }

    fn name(&self) -> &str {
        "Label"
    }

    async fn produce(&self, query: &str) -> Result<ResultEnvelope> {
        if query.contains("explode") {
            return Err(AlchemyError::Agent("generator crashed".into()));
        }
        Ok(ResultEnvelope::new(self.0.as_str()).with_field("content", query))
    }
}

fn test_state() -> Arc<AppState> {
    let registry: HandlerRegistry = [IntentLabel::Research, IntentLabel::Article, IntentLabel::SocialPost]
        .into_iter()
        .map(|label| (label, Arc::new(LabelHandler(label)) as Arc<dyn ContentHandler>))
        .collect();
    let coordinator = Coordinator::new(CapabilitySet::default(), Arc::new(FixedLlm("social_post")), registry);
    Arc::new(AppState::with_coordinator(coordinator))
}

/// Spin up a test server on a random port and return the base URL.
async fn start_test_server(state: Arc<AppState>) -> String {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Helper to GET a URL and return (status, body as JSON).
async fn get(base: &str, path: &str) -> (u16, serde_json::Value) {
    let resp = reqwest::Client::new()
        .get(format!("{}{}", base, path))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

/// Helper to POST JSON and return (status, body_string).
async fn post_json(base: &str, path: &str, json: &str) -> (u16, String) {
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .header("content-type", "application/json")
        .body(json.to_string())
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap();
    (status, body)
}

// ============================================================================
// Health and capabilities
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let base = start_test_server(test_state()).await;
    let (status, json) = get(&base, "/health").await;

    assert_eq!(status, 200);
    assert_eq!(json["status"], "healthy");
    assert_eq!(
        json["handlers"],
        serde_json::json!(["research", "article", "social_post"])
    );
}

#[tokio::test]
async fn test_capabilities_endpoint() {
    let base = start_test_server(test_state()).await;
    let (status, json) = get(&base, "/api/v1/capabilities").await;

    assert_eq!(status, 200);
    let caps = json["capabilities"].as_array().unwrap();
    assert_eq!(caps.len(), 5);
    assert_eq!(caps[3]["label"], "image");
    assert_eq!(caps[3]["registered"], false);
    assert!(
        caps[0]["triggers"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("find information"))
    );
}

// ============================================================================
// Generate endpoint
// ============================================================================

#[tokio::test]
async fn test_generate_single_label() {
    let base = start_test_server(test_state()).await;
    let (status, body) = post_json(
        &base,
        "/api/v1/generate",
        r#"{"query": "Write a blog about AI trends"}"#,
    )
    .await;

    assert_eq!(status, 200);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "done");
    assert!(json["error"].is_null());
    assert_eq!(json["decision"]["label"], "article");
    assert_eq!(json["result"]["type"], "article");
    assert_eq!(json["trace"][1], "Routing to article agent");
}

#[tokio::test]
async fn test_generate_with_tie_break() {
    let base = start_test_server(test_state()).await;
    let (status, body) = post_json(
        &base,
        "/api/v1/generate",
        r#"{"query": "Write a blog and LinkedIn post about productivity"}"#,
    )
    .await;

    assert_eq!(status, 200);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["decision"]["label"], "social_post");
    assert_eq!(json["result"]["type"], "social_post");
}

#[tokio::test]
async fn test_generate_failure_is_still_200() {
    let base = start_test_server(test_state()).await;

    let (status, body) =
        post_json(&base, "/api/v1/generate", r#"{"query": "Draw a picture of a fox"}"#).await;
    assert_eq!(status, 200);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "failed");
    assert!(json["error"].as_str().unwrap().contains("image"));

    let (status, body) =
        post_json(&base, "/api/v1/generate", r#"{"query": "explode the research"}"#).await;
    assert_eq!(status, 200);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["result"]["agent"], "research");
    assert_eq!(json["error"], "Agent error: generator crashed");
}

#[tokio::test]
async fn test_generate_rejects_bad_queries() {
    let base = start_test_server(test_state()).await;

    let (status, body) = post_json(&base, "/api/v1/generate", r#"{"query": "   "}"#).await;
    assert_eq!(status, 400);
    assert!(body.contains("EMPTY_QUERY"));

    let long = format!(r#"{{"query": "{}"}}"#, "a".repeat(10_001));
    let (status, body) = post_json(&base, "/api/v1/generate", &long).await;
    assert_eq!(status, 400);
    assert!(body.contains("QUERY_TOO_LONG"));
}

#[tokio::test]
async fn test_generate_rejects_malformed_body() {
    let base = start_test_server(test_state()).await;
    let (status, _) = post_json(&base, "/api/v1/generate", r#"{"content": "hi"}"#).await;
    assert!(status == 400 || status == 422, "status was {status}");
}

// ============================================================================
// Classify endpoint
// ============================================================================

#[tokio::test]
async fn test_classify_does_not_generate() {
    let base = start_test_server(test_state()).await;
    let (status, body) = post_json(
        &base,
        "/api/v1/classify",
        r#"{"query": "Please explode this linkedin social post"}"#,
    )
    .await;

    assert_eq!(status, 200);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["decision"]["label"], "social_post");
    assert_eq!(json["decision"]["confidence"].as_f64().map(|c| (c * 100.0).round()), Some(85.0));
    assert_eq!(json["tie_break"]["label"], "social_post");
    assert_eq!(json["trace"][0], "Matched candidates: article, social_post");
    assert!(json.get("result").is_none());
}

// ============================================================================
// State built from configuration
// ============================================================================

#[tokio::test]
async fn test_state_from_default_config() {
    let state = AppState::new(&CoordinatorConfig::default()).unwrap();
    assert_eq!(state.coordinator.handler_labels(), IntentLabel::ALL.to_vec());
    assert_eq!(state.uptime_seconds(), 0);
}
