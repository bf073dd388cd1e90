//! Long-form article writer with keyword planning and SEO metrics.

use crate::quality::{self, QualityReport, SeoAnalysis};
use crate::{generate, split_list};
use alchemy_common::{AgentConfig, ContentHandler, IntentLabel, Result, ResultEnvelope};
use alchemy_llm::LlmClient;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

const KEYWORD_SYSTEM_PROMPT: &str =
    "You are an SEO expert. Generate 5-8 relevant keywords for the topic. Return as comma-separated list.";

const ARTICLE_SYSTEM_PROMPT: &str = r#"You are an expert content writer specializing in SEO-optimized blog posts.
Create engaging, well-structured content with:
- Compelling headline
- Clear introduction
- Multiple H2/H3 subheadings
- Actionable insights
- Strong conclusion
- Natural keyword integration
"#;

const MAX_KEYWORDS: usize = 8;
const WORDS_PER_MINUTE: usize = 200;
const META_DESCRIPTION_LEN: usize = 160;

pub const DEFAULT_SEO_SCORE: u32 = 85;

#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub content: String,
    pub keywords: Vec<String>,
    pub word_count: usize,
    pub read_time: String,
    pub seo_score: u32,
    pub meta_description: String,
    pub seo: SeoAnalysis,
    pub quality: QualityReport,
}

pub struct ArticleAgent {
    config: AgentConfig,
    llm: Arc<dyn LlmClient>,
    seo_score: u32,
}

impl ArticleAgent {
    pub fn new(config: AgentConfig, llm: Arc<dyn LlmClient>, seo_score: u32) -> Self {
        Self {
            config,
            llm,
            seo_score,
        }
    }

    pub fn with_default_config(llm: Arc<dyn LlmClient>) -> Self {
        Self::new(
            AgentConfig::named("article", "Article Writer"),
            llm,
            DEFAULT_SEO_SCORE,
        )
    }

    fn system_prompt(&self) -> &str {
        self.config
            .system_prompt
            .as_deref()
            .unwrap_or(ARTICLE_SYSTEM_PROMPT)
    }

    pub async fn generate_keywords(&self, topic: &str) -> Result<Vec<String>> {
        let raw = generate(
            self.llm.as_ref(),
            &self.config,
            KEYWORD_SYSTEM_PROMPT,
            format!("Topic: {topic}"),
        )
        .await?;
        Ok(split_list(&raw, MAX_KEYWORDS))
    }

    pub async fn write_article(&self, topic: &str) -> Result<Article> {
        let keywords = self.generate_keywords(topic).await?;
        debug!(agent = %self.id(), keywords = keywords.len(), "Keywords planned");

        let prompt = format!(
            "Topic: {topic}\nKeywords: {}\n\nWrite a comprehensive 1500-2000 word blog post optimized for SEO.",
            keywords.join(", ")
        );
        let content = generate(self.llm.as_ref(), &self.config, self.system_prompt(), prompt).await?;

        let word_count = quality::word_count(&content);
        let read_time = (word_count / WORDS_PER_MINUTE).max(1);

        Ok(Article {
            meta_description: quality::meta_description(&content, META_DESCRIPTION_LEN),
            seo: quality::seo_analysis(&content, &keywords),
            quality: quality::validate_article(&content),
            read_time: format!("{read_time} min"),
            seo_score: self.seo_score,
            word_count,
            keywords,
            content,
        })
    }
}

#[async_trait]
impl ContentHandler for ArticleAgent {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    async fn produce(&self, query: &str) -> Result<ResultEnvelope> {
        info!(agent = %self.id(), "Processing article request");
        let article = self.write_article(query).await?;
        ResultEnvelope::from_content(IntentLabel::Article.as_str(), &article)
    }
}
