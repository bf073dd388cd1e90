//! HTTP route handlers for the API.

use crate::AppState;
use alchemy_common::IntentLabel;
use alchemy_coordinator::{Classification, WorkflowState};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Queries longer than this are rejected before classification.
pub const MAX_QUERY_BYTES: usize = 10_000;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub handlers: Vec<IntentLabel>,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
        handlers: state.coordinator.handler_labels(),
    })
}

/// Body for `generate` and `classify`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: &'static str,
}

impl ErrorResponse {
    pub fn bad_request(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            code,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

fn validate_query(query: &str) -> Result<(), ErrorResponse> {
    if query.trim().is_empty() {
        return Err(ErrorResponse::bad_request("Query must not be empty", "EMPTY_QUERY"));
    }
    if query.len() > MAX_QUERY_BYTES {
        warn!(bytes = query.len(), "Rejected oversized query");
        return Err(ErrorResponse::bad_request(
            format!("Query exceeds {MAX_QUERY_BYTES} bytes"),
            "QUERY_TOO_LONG",
        ));
    }
    Ok(())
}

/// Run the full workflow. Failed runs are still `200`: the error is in the body.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<WorkflowState>, ErrorResponse> {
    validate_query(&request.query)?;

    info!(
        query_preview = %request.query.chars().take(50).collect::<String>(),
        "Received generate request"
    );

    Ok(Json(state.coordinator.run(&request.query).await))
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    #[serde(flatten)]
    pub classification: Classification,
    pub trace: Vec<String>,
}

/// Classify without generating.
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<ClassifyResponse>, ErrorResponse> {
    validate_query(&request.query)?;

    let classification = state.coordinator.classify(&request.query).await;
    let trace = classification.trace_notes();
    Ok(Json(ClassifyResponse {
        classification,
        trace,
    }))
}

#[derive(Debug, Serialize)]
pub struct CapabilityEntry {
    pub label: IntentLabel,
    pub triggers: Vec<String>,
    pub registered: bool,
}

#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub capabilities: Vec<CapabilityEntry>,
}

/// Labels, their trigger phrases, and whether a handler serves them.
pub async fn capabilities(State(state): State<Arc<AppState>>) -> Json<CapabilitiesResponse> {
    let registered = state.coordinator.handler_labels();
    let caps = state.coordinator.capabilities();

    Json(CapabilitiesResponse {
        capabilities: IntentLabel::ALL
            .into_iter()
            .map(|label| CapabilityEntry {
                label,
                triggers: caps.triggers(label).to_vec(),
                registered: registered.contains(&label),
            })
            .collect(),
    })
}
