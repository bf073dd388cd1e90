//! Research agent - web search followed by an LLM synthesis pass.

use crate::generate;
use crate::search::{SearchProvider, SearchResult};
use alchemy_common::{AgentConfig, ContentHandler, IntentLabel, Result, ResultEnvelope};
use alchemy_llm::LlmClient;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

const RESEARCH_SYSTEM_PROMPT: &str = r#"You are an expert researcher. Analyze the provided search results
and create a comprehensive research report with key insights, analysis, and sources.
"#;

pub const DEFAULT_NUM_RESULTS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub content: String,
    pub sources: Vec<SearchResult>,
    pub topic: String,
}

pub struct ResearchAgent {
    config: AgentConfig,
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchProvider>,
    num_results: usize,
}

impl ResearchAgent {
    pub fn new(
        config: AgentConfig,
        llm: Arc<dyn LlmClient>,
        search: Arc<dyn SearchProvider>,
        num_results: usize,
    ) -> Self {
        Self {
            config,
            llm,
            search,
            num_results,
        }
    }

    pub fn with_default_config(llm: Arc<dyn LlmClient>, search: Arc<dyn SearchProvider>) -> Self {
        Self::new(
            AgentConfig::named("research", "Research Agent"),
            llm,
            search,
            DEFAULT_NUM_RESULTS,
        )
    }

    fn system_prompt(&self) -> &str {
        self.config
            .system_prompt
            .as_deref()
            .unwrap_or(RESEARCH_SYSTEM_PROMPT)
    }

    /// Search errors are not fatal: the report is written without sources.
    async fn gather_sources(&self, topic: &str) -> Vec<SearchResult> {
        match self.search.search(topic, self.num_results).await {
            Ok(sources) => sources,
            Err(e) => {
                warn!(provider = %self.search.name(), error = %e, "Search failed, continuing without sources");
                Vec::new()
            }
        }
    }

    pub async fn conduct_research(&self, topic: &str) -> Result<ResearchReport> {
        let sources = self.gather_sources(topic).await;

        let context = sources
            .iter()
            .enumerate()
            .map(|(i, s)| format!("Source {}: {}\n{}", i + 1, s.title, s.snippet))
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!(
            "Research Topic: {topic}\n\nSearch Results:\n{context}\n\n\
             Create a detailed research report with:\n\
             1. Executive Summary\n\
             2. Key Insights (3-5 main points)\n\
             3. Detailed Analysis\n\
             4. Sources and References\n\
             5. Recommendations"
        );

        let content = generate(self.llm.as_ref(), &self.config, self.system_prompt(), prompt).await?;

        Ok(ResearchReport {
            content,
            sources,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl ContentHandler for ResearchAgent {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    async fn produce(&self, query: &str) -> Result<ResultEnvelope> {
        info!(agent = %self.id(), provider = %self.search.name(), "Processing research request");
        let report = self.conduct_research(query).await?;
        ResultEnvelope::from_content(IntentLabel::Research.as_str(), &report)
    }
}
