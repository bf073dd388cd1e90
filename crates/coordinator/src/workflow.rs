//! The workflow coordinator: classify, dispatch, finish.

use crate::capabilities::CapabilitySet;
use crate::config::CoordinatorConfig;
use crate::registry::HandlerRegistry;
use crate::router::Router;
use crate::tiebreak::TieBreaker;
use crate::triage::{Classification, Triage};
use crate::routing::RouteDecision;
use alchemy_common::{AgentConfig, IntentLabel, Result};
use alchemy_llm::{LlmClient, build_llm_client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Position of a run in `START -> CLASSIFYING -> DISPATCHING -> {DONE, FAILED}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Start,
    Classifying,
    Dispatching,
    Done,
    Failed,
}

impl WorkflowStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Everything one `run` produced. Success is the absence of `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub query: String,
    pub status: WorkflowStatus,
    pub decision: Option<RouteDecision>,
    pub trace: Vec<String>,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl WorkflowState {
    fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            status: WorkflowStatus::Start,
            decision: None,
            trace: Vec::new(),
            result: None,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    fn advance(&mut self, status: WorkflowStatus) {
        debug!(from = ?self.status, to = ?status, "Workflow transition");
        self.status = status;
    }

    fn fail(&mut self, message: String, result: Option<Value>) {
        self.trace.push(format!("Error: {message}"));
        self.error = Some(message);
        self.result = result;
        self.advance(WorkflowStatus::Failed);
    }
}

/// Holds only immutable configuration; runs share nothing else.
pub struct Coordinator {
    triage: Triage,
    router: Router,
}

impl Coordinator {
    /// Assemble a coordinator from injected parts, with default confidence
    /// and tie-break temperature.
    pub fn new(capabilities: CapabilitySet, llm: Arc<dyn LlmClient>, registry: HandlerRegistry) -> Self {
        Self::from_parts(
            Triage::new(Arc::new(capabilities), TieBreaker::new(llm)),
            Router::new(Arc::new(registry)),
        )
    }

    pub fn from_parts(triage: Triage, router: Router) -> Self {
        Self { triage, router }
    }

    /// Build the LLM client and the generator set described by `config`.
    pub fn from_config(config: &CoordinatorConfig) -> Result<Self> {
        info!("Initializing content coordinator");

        let llm = build_llm_client(&config.llm)?;

        let base = AgentConfig {
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            ..Default::default()
        };
        let registry = config.build_registry(llm.clone(), &base)?;
        info!(handlers = ?registry.labels(), "Handler registry ready");

        let tie_breaker =
            TieBreaker::new(llm).with_temperature(config.routing.tie_break_temperature);
        let triage = Triage::new(Arc::new(config.capability_set()), tie_breaker)
            .with_confidence(config.routing.confidence);

        Ok(Self::from_parts(triage, Router::new(Arc::new(registry))))
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        self.triage.capabilities()
    }

    pub fn handler_labels(&self) -> Vec<IntentLabel> {
        self.router.registry().labels()
    }

    /// Classification only, no generation.
    pub async fn classify(&self, query: &str) -> Classification {
        self.triage.classify(query).await
    }

    /// Classify and dispatch one query. Never returns an error: every failure
    /// ends up in the returned state's `error` field.
    pub async fn run(&self, query: &str) -> WorkflowState {
        let started = Instant::now();
        let mut state = WorkflowState::new(query);

        state.advance(WorkflowStatus::Classifying);
        let classification = self.triage.classify(query).await;
        state.trace.extend(classification.trace_notes());
        let label = classification.decision.label;
        state.decision = Some(classification.decision);
        state.trace.push(format!("Routing to {label} agent"));

        state.advance(WorkflowStatus::Dispatching);
        match self.router.dispatch(label, query).await {
            Ok(envelope) => match envelope.error() {
                Some(message) => {
                    warn!(label = %label, error = %message, "Handler reported an error");
                    state.fail(message, Some(envelope.to_value()));
                }
                None => {
                    state.result = Some(envelope.to_value());
                    state.trace.push("Content generated successfully".to_string());
                    state.advance(WorkflowStatus::Done);
                }
            },
            Err(e) => state.fail(e.to_string(), Some(e.to_envelope())),
        }

        state.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            label = %label,
            status = ?state.status,
            duration_ms = state.duration_ms,
            "Workflow finished"
        );
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(WorkflowStatus::Done.is_terminal());
        assert!(WorkflowStatus::Failed.is_terminal());
        assert!(!WorkflowStatus::Dispatching.is_terminal());
    }

    #[test]
    fn failing_records_error_in_trace() {
        let mut state = WorkflowState::new("q");
        state.fail("boom".into(), None);

        assert_eq!(state.status, WorkflowStatus::Failed);
        assert_eq!(state.trace, vec!["Error: boom".to_string()]);
        assert!(!state.is_success());
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(WorkflowStatus::Classifying).unwrap(),
            "classifying"
        );
    }
}
