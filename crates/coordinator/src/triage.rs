//! Classification: keyword matching plus an optional tie-break.

use crate::capabilities::{self, CapabilitySet};
use crate::routing::{DEFAULT_CONFIDENCE, RouteDecision};
use crate::tiebreak::{TieBreakOutcome, TieBreaker};
use alchemy_common::IntentLabel;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

fn label_list(labels: &BTreeSet<IntentLabel>) -> String {
    labels
        .iter()
        .map(IntentLabel::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A decision plus what happened on the way to it.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub decision: RouteDecision,

    /// Present only when the matcher proposed more than one label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tie_break: Option<TieBreakOutcome>,
}

impl Classification {
    /// Human-readable trace lines for this classification.
    pub fn trace_notes(&self) -> Vec<String> {
        let mut notes = vec![format!(
            "Matched candidates: {}",
            label_list(&self.decision.candidates)
        )];
        match &self.tie_break {
            Some(TieBreakOutcome {
                label,
                degraded: None,
            }) => notes.push(format!("Tie-break selected {label}")),
            Some(TieBreakOutcome {
                label,
                degraded: Some(reason),
            }) => notes.push(format!("Tie-break degraded ({reason}), falling back to {label}")),
            None => {}
        }
        notes
    }
}

pub struct Triage {
    capabilities: Arc<CapabilitySet>,
    tie_breaker: TieBreaker,
    confidence: f32,
}

impl Triage {
    pub fn new(capabilities: Arc<CapabilitySet>, tie_breaker: TieBreaker) -> Self {
        Self {
            capabilities,
            tie_breaker,
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Classify a query. Always resolves to some label.
    pub async fn classify(&self, query: &str) -> Classification {
        info!(
            query_preview = %query.chars().take(50).collect::<String>(),
            "Classifying query"
        );

        let matched = self.capabilities.matches(query);
        let defaulted = matched.is_empty();
        let candidates = capabilities::or_default(matched);

        let (label, reasoning, tie_break) = if candidates.len() > 1 {
            let outcome = self.tie_breaker.resolve(query, &candidates).await;
            let reasoning = match &outcome.degraded {
                None => format!(
                    "Tie-break between {} chose {}",
                    label_list(&candidates),
                    outcome.label
                ),
                Some(_) => format!(
                    "Tie-break between {} failed; kept first candidate {}",
                    label_list(&candidates),
                    outcome.label
                ),
            };
            (outcome.label, reasoning, Some(outcome))
        } else {
            // match_query is never empty
            let label = candidates.first().copied().unwrap_or(IntentLabel::DEFAULT);
            let reasoning = if defaulted {
                format!("No trigger phrases matched; defaulting to {label}")
            } else {
                format!("Matched trigger phrases for {label}")
            };
            (label, reasoning, None)
        };

        debug!(label = %label, candidates = candidates.len(), "Classification complete");

        Classification {
            decision: RouteDecision::new(label, query, self.confidence)
                .with_reasoning(reasoning)
                .with_candidates(candidates),
            tie_break,
        }
    }
}
