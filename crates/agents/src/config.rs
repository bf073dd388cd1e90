//! `[agents]` configuration and construction of the handler set.

use crate::article::{ArticleAgent, DEFAULT_SEO_SCORE};
use crate::format::{DEFAULT_FORMAT, FormatAgent};
use crate::image::{DEFAULT_SIZE, ImageAgent, ImageRenderer, OpenAiImageRenderer, PlaceholderRenderer};
use crate::research::{DEFAULT_NUM_RESULTS, ResearchAgent};
use crate::search::{PlaceholderSearch, SearchProvider, SerpApiSearch};
use crate::social::{DEFAULT_ENGAGEMENT_SCORE, DEFAULT_TONE, SocialPostAgent};
use alchemy_common::{AgentConfig, AlchemyError, ContentHandler, IntentLabel, Result};
use alchemy_llm::LlmClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// SerpAPI key; placeholder sources are used when unset
    #[serde(default)]
    pub serp_api_key: Option<String>,

    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_num_results")]
    pub num_results: usize,
}

fn default_num_results() -> usize {
    DEFAULT_NUM_RESULTS
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            serp_api_key: None,
            endpoint: None,
            num_results: default_num_results(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// "placeholder" or "openai"
    #[serde(default = "default_renderer")]
    pub renderer: String,

    #[serde(default = "default_image_model")]
    pub model: String,

    #[serde(default = "default_size")]
    pub size: String,

    #[serde(default = "default_quality")]
    pub quality: String,

    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_renderer() -> String {
    "placeholder".into()
}

fn default_image_model() -> String {
    "dall-e-3".into()
}

fn default_size() -> String {
    DEFAULT_SIZE.into()
}

fn default_quality() -> String {
    "standard".into()
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            renderer: default_renderer(),
            model: default_image_model(),
            size: default_size(),
            quality: default_quality(),
            api_url: None,
            api_key: None,
        }
    }
}

/// Fixed scores reported alongside generated content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_seo_score")]
    pub seo_score: u32,

    #[serde(default = "default_engagement_score")]
    pub engagement_score: u32,
}

fn default_seo_score() -> u32 {
    DEFAULT_SEO_SCORE
}

fn default_engagement_score() -> u32 {
    DEFAULT_ENGAGEMENT_SCORE
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            seo_score: default_seo_score(),
            engagement_score: default_engagement_score(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default)]
    pub research: ResearchConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default = "default_tone")]
    pub social_tone: String,

    #[serde(default = "default_format_type")]
    pub format_type: String,
}

fn default_tone() -> String {
    DEFAULT_TONE.into()
}

fn default_format_type() -> String {
    DEFAULT_FORMAT.into()
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            research: ResearchConfig::default(),
            image: ImageConfig::default(),
            scoring: ScoringConfig::default(),
            social_tone: default_tone(),
            format_type: default_format_type(),
        }
    }
}

impl AgentsConfig {
    pub fn search_provider(&self) -> Arc<dyn SearchProvider> {
        match &self.research.serp_api_key {
            Some(key) if !key.is_empty() => Arc::new(SerpApiSearch::new(
                self.research.endpoint.clone(),
                key.clone(),
            )),
            _ => Arc::new(PlaceholderSearch),
        }
    }

    pub fn image_renderer(&self) -> Result<Arc<dyn ImageRenderer>> {
        let image = &self.image;
        match image.renderer.as_str() {
            "placeholder" => Ok(Arc::new(PlaceholderRenderer)),
            "openai" => {
                let key = image.api_key.clone().ok_or_else(|| {
                    AlchemyError::Config("agents.image.api_key is required for the openai renderer".into())
                })?;
                Ok(Arc::new(OpenAiImageRenderer::new(
                    image.api_url.clone(),
                    key,
                    image.model.clone(),
                    image.quality.clone(),
                )))
            }
            other => Err(AlchemyError::Config(format!("Unknown image renderer: {other}"))),
        }
    }

    /// Build one generator per label in `selected`, each sharing `llm`.
    ///
    /// `base` supplies the generation settings (temperature, max tokens)
    /// every agent starts from. The search provider and image renderer are
    /// only built when their generator is selected, so an unusable
    /// `[agents.image]` section does not block a registry without `image`.
    pub fn build_handlers(
        &self,
        llm: Arc<dyn LlmClient>,
        base: &AgentConfig,
        selected: &[IntentLabel],
    ) -> Result<Vec<(IntentLabel, Arc<dyn ContentHandler>)>> {
        let agent_config = |id: &str, name: &str| AgentConfig {
            id: id.into(),
            name: name.into(),
            ..base.clone()
        };

        let mut handlers = Vec::with_capacity(selected.len());
        for label in IntentLabel::ALL.into_iter().filter(|label| selected.contains(label)) {
            let handler: Arc<dyn ContentHandler> = match label {
                IntentLabel::Research => {
                    let search = self.search_provider();
                    info!(search = %search.name(), "Building research handler");
                    Arc::new(ResearchAgent::new(
                        agent_config("research", "Research Agent"),
                        llm.clone(),
                        search,
                        self.research.num_results,
                    ))
                }
                IntentLabel::Article => Arc::new(ArticleAgent::new(
                    agent_config("article", "Article Writer"),
                    llm.clone(),
                    self.scoring.seo_score,
                )),
                IntentLabel::SocialPost => Arc::new(SocialPostAgent::new(
                    agent_config("social_post", "Social Post Writer"),
                    llm.clone(),
                    self.social_tone.clone(),
                    self.scoring.engagement_score,
                )),
                IntentLabel::Image => {
                    let renderer = self.image_renderer()?;
                    info!(renderer = %renderer.name(), "Building image handler");
                    Arc::new(ImageAgent::new(
                        agent_config("image", "Image Generator"),
                        llm.clone(),
                        renderer,
                        self.image.size.clone(),
                    ))
                }
                IntentLabel::Format => Arc::new(FormatAgent::new(
                    agent_config("format", "Content Strategist"),
                    llm.clone(),
                    self.format_type.clone(),
                )),
            };
            handlers.push((label, handler));
        }

        Ok(handlers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let config: AgentsConfig = toml::from_str("").unwrap();
        assert_eq!(config.research.num_results, 5);
        assert_eq!(config.image.renderer, "placeholder");
        assert_eq!(config.image.size, "1024x1024");
        assert_eq!(config.scoring.seo_score, 85);
        assert_eq!(config.scoring.engagement_score, 78);
        assert_eq!(config.social_tone, "professional");
        assert_eq!(config.format_type, "markdown");
    }

    #[test]
    fn nested_sections_parse() {
        let config: AgentsConfig = toml::from_str(
            r#"
            social_tone = "casual"

            [research]
            serp_api_key = "serp-123"
            num_results = 3

            [image]
            renderer = "openai"
            api_key = "sk-img"

            [scoring]
            seo_score = 90
        "#,
        )
        .unwrap();

        assert_eq!(config.research.serp_api_key.as_deref(), Some("serp-123"));
        assert_eq!(config.research.num_results, 3);
        assert_eq!(config.social_tone, "casual");
        assert_eq!(config.scoring.seo_score, 90);
        assert_eq!(config.scoring.engagement_score, 78);
        assert_eq!(config.search_provider().name(), "serpapi");
        assert_eq!(config.image_renderer().unwrap().name(), "openai");
    }

    #[test]
    fn openai_renderer_requires_key() {
        let mut config = AgentsConfig::default();
        config.image.renderer = "openai".into();
        assert!(matches!(config.image_renderer(), Err(AlchemyError::Config(_))));

        config.image.renderer = "midjourney".into();
        assert!(matches!(config.image_renderer(), Err(AlchemyError::Config(_))));
    }

    #[test]
    fn empty_serp_key_falls_back_to_placeholder() {
        let mut config = AgentsConfig::default();
        config.research.serp_api_key = Some(String::new());
        assert_eq!(config.search_provider().name(), "placeholder");
    }

    #[test]
    fn unusable_renderer_is_ignored_without_image_handler() {
        let mut config = AgentsConfig::default();
        config.image.renderer = "openai".into();
        let llm: Arc<dyn LlmClient> = Arc::new(alchemy_llm::OpenAiClient::new(
            Some("http://127.0.0.1:1".into()),
            "test".into(),
            None,
        ));
        let base = AgentConfig::default();

        let handlers = config
            .build_handlers(llm.clone(), &base, &[IntentLabel::Research, IntentLabel::Format])
            .unwrap();
        let labels: Vec<_> = handlers.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec![IntentLabel::Research, IntentLabel::Format]);

        let err = config
            .build_handlers(llm, &base, &IntentLabel::ALL)
            .err()
            .unwrap();
        assert!(matches!(err, AlchemyError::Config(_)));
    }
}
