//! Content strategist: restructures free text into a target format.

use crate::generate;
use alchemy_common::{AgentConfig, ContentHandler, IntentLabel, Result, ResultEnvelope};
use alchemy_llm::LlmClient;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_FORMAT: &str = "markdown";

#[derive(Debug, Clone, Serialize)]
pub struct FormattedContent {
    pub formatted_content: String,
    pub format_type: String,
}

pub struct FormatAgent {
    config: AgentConfig,
    llm: Arc<dyn LlmClient>,
    format_type: String,
}

impl FormatAgent {
    pub fn new(config: AgentConfig, llm: Arc<dyn LlmClient>, format_type: impl Into<String>) -> Self {
        Self {
            config,
            llm,
            format_type: format_type.into(),
        }
    }

    pub fn with_default_config(llm: Arc<dyn LlmClient>) -> Self {
        Self::new(
            AgentConfig::named("format", "Content Strategist"),
            llm,
            DEFAULT_FORMAT,
        )
    }

    fn system_prompt(&self) -> String {
        match &self.config.system_prompt {
            Some(custom) => custom.clone(),
            None => format!(
                "You are a content strategist. Format the provided content into well-structured {} with:\n\
                 - Clear hierarchy\n\
                 - Proper formatting\n\
                 - Readable sections\n\
                 - Professional presentation",
                self.format_type
            ),
        }
    }

    pub async fn format_content(&self, raw: &str) -> Result<FormattedContent> {
        let formatted = generate(
            self.llm.as_ref(),
            &self.config,
            &self.system_prompt(),
            format!("Format this content:\n\n{raw}"),
        )
        .await?;

        Ok(FormattedContent {
            formatted_content: formatted,
            format_type: self.format_type.clone(),
        })
    }
}

#[async_trait]
impl ContentHandler for FormatAgent {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    async fn produce(&self, query: &str) -> Result<ResultEnvelope> {
        info!(agent = %self.id(), format = %self.format_type, "Processing format request");
        let formatted = self.format_content(query).await?;
        ResultEnvelope::from_content(IntentLabel::Format.as_str(), &formatted)
    }
}
