//! Routing decision types.

use alchemy_common::IntentLabel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fixed confidence attached to every decision; there is no calibration.
pub const DEFAULT_CONFIDENCE: f32 = 0.85;

/// The result of classifying one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDecision {
    /// The chosen label
    pub label: IntentLabel,

    /// The query that was classified
    pub query: String,

    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,

    /// Reasoning for the decision
    pub reasoning: String,

    /// Labels the keyword matcher proposed, in canonical order
    #[serde(default)]
    pub candidates: BTreeSet<IntentLabel>,
}

impl RouteDecision {
    pub fn new(label: IntentLabel, query: impl Into<String>, confidence: f32) -> Self {
        Self {
            label,
            query: query.into(),
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: String::new(),
            candidates: BTreeSet::from([label]),
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_candidates(mut self, candidates: BTreeSet<IntentLabel>) -> Self {
        self.candidates = candidates;
        self
    }
}
