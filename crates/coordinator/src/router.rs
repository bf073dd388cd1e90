//! Dispatch of a classified query to its handler.

use crate::registry::HandlerRegistry;
use alchemy_common::{IntentLabel, ResultEnvelope};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Why a dispatch produced no usable envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Agent type '{label}' not found")]
    UnregisteredHandler { label: IntentLabel },

    #[error("{message}")]
    HandlerFailure { label: IntentLabel, message: String },
}

impl DispatchError {
    pub fn label(&self) -> IntentLabel {
        match self {
            Self::UnregisteredHandler { label } | Self::HandlerFailure { label, .. } => *label,
        }
    }

    /// Boundary shape for callers expecting a plain mapping: `{error, agent}`.
    pub fn to_envelope(&self) -> Value {
        json!({
            "error": self.to_string(),
            "agent": self.label().as_str(),
        })
    }
}

/// Stateless apart from the shared registry.
#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<HandlerRegistry>,
}

impl Router {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Run the handler for `label`. Handler errors come back as
    /// [`DispatchError::HandlerFailure`]; the envelope is passed through untouched.
    pub async fn dispatch(&self, label: IntentLabel, query: &str) -> Result<ResultEnvelope, DispatchError> {
        let Some(handler) = self.registry.get(label) else {
            warn!(label = %label, "No handler registered");
            return Err(DispatchError::UnregisteredHandler { label });
        };

        debug!(label = %label, handler = %handler.id(), "Dispatching");

        handler.produce(query).await.map_err(|e| {
            error!(label = %label, error = %e, "Handler failed");
            DispatchError::HandlerFailure {
                label,
                message: e.to_string(),
            }
        })
    }
}
