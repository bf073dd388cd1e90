//! Content generators for Content Alchemy.
//!
//! One agent per intent label, each implementing
//! [`ContentHandler`](alchemy_common::ContentHandler):
//!
//! - **Research Agent**: web search plus an LLM-written report
//! - **Article Writer**: keyword planning, long-form post, SEO metrics
//! - **Social Post Writer**: short professional post with hashtags
//! - **Image Generator**: prompt optimisation and rendering
//! - **Content Strategist**: restructures text into a target format
//!
//! ```text
//!            ┌──────────────────────────────────────────┐
//!  query ──▶ │  Research │ Article │ Social │ Image │ Format │
//!            └─────┬──────────┬─────────┬───────┬───────┬───┘
//!                  ▼          ▼         ▼       ▼       ▼
//!            SearchProvider  ──── LlmClient ────  ImageRenderer
//! ```

pub mod article;
pub mod config;
pub mod format;
pub mod image;
pub mod quality;
pub mod research;
pub mod search;
pub mod social;

pub use article::{Article, ArticleAgent};
pub use config::{AgentsConfig, ImageConfig, ResearchConfig, ScoringConfig};
pub use format::{FormatAgent, FormattedContent};
pub use image::{GeneratedImage, ImageAgent, ImageRenderer, OpenAiImageRenderer, PlaceholderRenderer};
pub use research::{ResearchAgent, ResearchReport};
pub use search::{PlaceholderSearch, SearchProvider, SearchResult, SerpApiSearch};
pub use social::{SocialPost, SocialPostAgent};

use alchemy_common::{AgentConfig, Result};
use alchemy_llm::{LlmClient, LlmRequest};

/// One instructed completion using the agent's generation settings.
pub(crate) async fn generate(
    llm: &dyn LlmClient,
    config: &AgentConfig,
    system: &str,
    user: String,
) -> Result<String> {
    let request = LlmRequest::instructed(system, user)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);
    Ok(llm.complete(request).await?.content)
}

/// Split a comma-separated model reply, dropping empty entries.
pub(crate) fn split_list(raw: &str, limit: usize) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .take(limit)
        .map(String::from)
        .collect()
}
