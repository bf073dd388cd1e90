//! LLM tie-break between several keyword candidates.

use alchemy_common::IntentLabel;
use alchemy_llm::{LlmClient, LlmRequest};
use serde::Serialize;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Why a tie-break fell back to the first candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ClassificationDegraded {
    #[error("tie-break call failed: {0}")]
    ProviderFailed(String),

    #[error("tie-break returned unrecognized label '{0}'")]
    UnrecognizedLabel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TieBreakOutcome {
    pub label: IntentLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<ClassificationDegraded>,
}

fn system_prompt() -> String {
    let choices = IntentLabel::TIE_BREAK
        .iter()
        .map(IntentLabel::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You are a query routing expert. Determine the primary content type the user wants to create. \
         Return ONLY one word: {choices}."
    )
}

/// Accept a reply only if, once trimmed and lower-cased, it names a tie-break label.
pub fn parse_label(reply: &str) -> Option<IntentLabel> {
    let normalized = reply.trim().to_lowercase();
    IntentLabel::from_str(&normalized)
        .ok()
        .filter(IntentLabel::is_tie_break_choice)
}

pub struct TieBreaker {
    llm: Arc<dyn LlmClient>,
    temperature: f32,
}

impl TieBreaker {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Pick one label. Makes exactly one LLM call and never fails: any
    /// problem resolves to the first candidate in canonical order.
    pub async fn resolve(&self, query: &str, candidates: &BTreeSet<IntentLabel>) -> TieBreakOutcome {
        let fallback = candidates.first().copied().unwrap_or(IntentLabel::DEFAULT);

        let request =
            LlmRequest::instructed(system_prompt(), query).with_temperature(self.temperature);

        let degraded = match self.llm.complete(request).await {
            Ok(response) => match parse_label(&response.content) {
                Some(label) => {
                    debug!(label = %label, "Tie-break resolved");
                    return TieBreakOutcome {
                        label,
                        degraded: None,
                    };
                }
                None => ClassificationDegraded::UnrecognizedLabel(response.content.trim().to_string()),
            },
            Err(e) => ClassificationDegraded::ProviderFailed(e.to_string()),
        };

        warn!(fallback = %fallback, reason = %degraded, "Tie-break degraded");
        TieBreakOutcome {
            label: fallback,
            degraded: Some(degraded),
        }
    }
}
