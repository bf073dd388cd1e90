//! Short professional social posts with hashtags.

use crate::quality::{self, EngagementAnalysis, QualityReport, IDEAL_POST_CHARS};
use crate::{generate, split_list};
use alchemy_common::{AgentConfig, ContentHandler, IntentLabel, Result, ResultEnvelope};
use alchemy_llm::LlmClient;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

const HASHTAG_SYSTEM_PROMPT: &str =
    "Generate 5-7 professional hashtags for LinkedIn. Return as comma-separated list without # symbols.";

const MAX_HASHTAGS: usize = 7;

pub const DEFAULT_TONE: &str = "professional";
pub const DEFAULT_ENGAGEMENT_SCORE: u32 = 78;

#[derive(Debug, Clone, Serialize)]
pub struct SocialPost {
    pub content: String,
    pub hashtags: Vec<String>,
    pub character_count: usize,
    pub engagement_score: u32,
    pub ideal_length: bool,
    pub engagement: EngagementAnalysis,
    pub quality: QualityReport,
}

pub struct SocialPostAgent {
    config: AgentConfig,
    llm: Arc<dyn LlmClient>,
    tone: String,
    engagement_score: u32,
}

impl SocialPostAgent {
    pub fn new(
        config: AgentConfig,
        llm: Arc<dyn LlmClient>,
        tone: impl Into<String>,
        engagement_score: u32,
    ) -> Self {
        Self {
            config,
            llm,
            tone: tone.into(),
            engagement_score,
        }
    }

    pub fn with_default_config(llm: Arc<dyn LlmClient>) -> Self {
        Self::new(
            AgentConfig::named("social_post", "Social Post Writer"),
            llm,
            DEFAULT_TONE,
            DEFAULT_ENGAGEMENT_SCORE,
        )
    }

    fn system_prompt(&self) -> String {
        if let Some(custom) = &self.config.system_prompt {
            return custom.clone();
        }
        format!(
            "You are a LinkedIn content expert. Create an engaging post that:\n\
             - Starts with a hook (emoji + compelling statement)\n\
             - Uses short paragraphs for readability\n\
             - Includes 3-5 key insights or takeaways\n\
             - Encourages engagement with a question\n\
             - Maintains {} tone\n\
             - Stays under {IDEAL_POST_CHARS} characters\n\
             - Uses emojis strategically",
            self.tone
        )
    }

    pub async fn generate_hashtags(&self, topic: &str) -> Result<Vec<String>> {
        let raw = generate(
            self.llm.as_ref(),
            &self.config,
            HASHTAG_SYSTEM_PROMPT,
            format!("Topic: {topic}"),
        )
        .await?;

        Ok(split_list(&raw.replace('#', ""), MAX_HASHTAGS)
            .into_iter()
            .map(|tag| format!("#{tag}"))
            .collect())
    }

    pub async fn write_post(&self, topic: &str) -> Result<SocialPost> {
        let hashtags = self.generate_hashtags(topic).await?;

        let body = generate(
            self.llm.as_ref(),
            &self.config,
            &self.system_prompt(),
            format!("Topic: {topic}\n\nCreate a high-engagement LinkedIn post."),
        )
        .await?;

        let content = format!("{}\n\n{}", body.trim(), hashtags.join(" "));
        let character_count = content.chars().count();

        Ok(SocialPost {
            engagement: quality::engagement_analysis(&content),
            quality: quality::validate_social_post(&content),
            ideal_length: character_count < IDEAL_POST_CHARS,
            engagement_score: self.engagement_score,
            character_count,
            hashtags,
            content,
        })
    }
}

#[async_trait]
impl ContentHandler for SocialPostAgent {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    async fn produce(&self, query: &str) -> Result<ResultEnvelope> {
        info!(agent = %self.id(), tone = %self.tone, "Processing social post request");
        let post = self.write_post(query).await?;
        ResultEnvelope::from_content(IntentLabel::SocialPost.as_str(), &post)
    }
}
