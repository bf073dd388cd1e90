//! Core handler trait and configuration.
//!
//! These are defined in `alchemy-common` so that both the coordinator and
//! the generator crate can reference them without circular dependencies.

use crate::{Result, ResultEnvelope};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A content handler the router can dispatch a query to.
///
/// Failures are signalled through the `Err` variant; the router converts
/// them into data and never lets them escape a workflow run.
#[async_trait]
pub trait ContentHandler: Send + Sync {
    /// Get the handler's unique identifier.
    fn id(&self) -> &str;

    /// Get the handler's human-readable name.
    fn name(&self) -> &str;

    /// Produce content for a query.
    async fn produce(&self, query: &str) -> Result<ResultEnvelope>;
}

/// Per-agent generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent ID
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Custom system prompt (optional, uses default if not set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Temperature for LLM responses
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens for responses
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

impl AgentConfig {
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            id: "agent".into(),
            name: "Agent".into(),
            system_prompt: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}
