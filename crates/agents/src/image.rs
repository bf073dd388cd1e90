//! Image agent: prompt optimisation plus a pluggable renderer.

use crate::generate;
use alchemy_common::{AgentConfig, AlchemyError, ContentHandler, IntentLabel, Result, ResultEnvelope};
use alchemy_llm::LlmClient;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

const PROMPT_SYSTEM_PROMPT: &str = r#"You are an expert at creating image generation prompts.
Enhance the user's request with artistic details, style, lighting, and composition.
Keep it under 400 characters. Return only the optimized prompt.
"#;

const MAX_PROMPT_CHARS: usize = 400;
const CAPTION_CHARS: usize = 50;

pub const DEFAULT_SIZE: &str = "1024x1024";
pub const OPENAI_IMAGES_URL: &str = "https://api.openai.com";

/// Turns a finished prompt into an image URL.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    fn name(&self) -> &str;

    /// `caption` is the user's original request, for renderers that label output.
    async fn render(&self, prompt: &str, caption: &str, size: &str) -> Result<String>;
}

/// Gradient SVG with the request as caption, returned as a data URL.
pub struct PlaceholderRenderer;

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl PlaceholderRenderer {
    fn svg(caption: &str) -> String {
        let caption: String = caption.chars().take(CAPTION_CHARS).collect();
        format!(
            r##"<svg width="800" height="600" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:#6366f1;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#8e2de2;stop-opacity:1" />
    </linearGradient>
  </defs>
  <rect width="800" height="600" fill="url(#grad)"/>
  <text x="400" y="280" font-family="Arial" font-size="36" font-weight="bold" fill="white" text-anchor="middle">{}</text>
  <text x="400" y="340" font-family="Arial" font-size="24" fill="white" text-anchor="middle">AI Generated Content</text>
</svg>"##,
            escape_xml(&caption)
        )
    }
}

#[async_trait]
impl ImageRenderer for PlaceholderRenderer {
    fn name(&self) -> &str {
        "placeholder"
    }

    async fn render(&self, _prompt: &str, caption: &str, _size: &str) -> Result<String> {
        let encoded = STANDARD.encode(Self::svg(caption));
        Ok(format!("data:image/svg+xml;base64,{encoded}"))
    }
}

#[derive(Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u32,
}

#[derive(Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    url: Option<String>,
    b64_json: Option<String>,
}

/// OpenAI-compatible `/v1/images/generations` backend.
pub struct OpenAiImageRenderer {
    api_url: String,
    api_key: String,
    model: String,
    quality: String,
    http_client: reqwest::Client,
}

impl OpenAiImageRenderer {
    pub fn new(
        api_url: Option<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        quality: impl Into<String>,
    ) -> Self {
        let api_url = api_url.unwrap_or_else(|| OPENAI_IMAGES_URL.to_string());
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            quality: quality.into(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ImageRenderer for OpenAiImageRenderer {
    fn name(&self) -> &str {
        "openai"
    }

    async fn render(&self, prompt: &str, _caption: &str, size: &str) -> Result<String> {
        let url = format!("{}/v1/images/generations", self.api_url);
        debug!(url = %url, model = %self.model, size, "Requesting image");

        let body = ImagesRequest {
            model: &self.model,
            prompt,
            size,
            quality: &self.quality,
            n: 1,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AlchemyError::Provider(format!("image request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AlchemyError::Provider(format!("image API returned {status}: {text}")));
        }

        let parsed: ImagesResponse = response
            .json()
            .await
            .map_err(|e| AlchemyError::Provider(format!("invalid image response: {e}")))?;

        match parsed.data.into_iter().next() {
            Some(ImageDatum { url: Some(url), .. }) => Ok(url),
            Some(ImageDatum {
                b64_json: Some(b64),
                ..
            }) => Ok(format!("data:image/png;base64,{b64}")),
            _ => Err(AlchemyError::Provider("image API returned no image".into())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedImage {
    pub image_url: String,
    pub prompt: String,
    pub original_request: String,
    pub size: String,
}

pub struct ImageAgent {
    config: AgentConfig,
    llm: Arc<dyn LlmClient>,
    renderer: Arc<dyn ImageRenderer>,
    size: String,
}

impl ImageAgent {
    pub fn new(
        config: AgentConfig,
        llm: Arc<dyn LlmClient>,
        renderer: Arc<dyn ImageRenderer>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            config,
            llm,
            renderer,
            size: size.into(),
        }
    }

    pub fn with_default_config(llm: Arc<dyn LlmClient>) -> Self {
        Self::new(
            AgentConfig::named("image", "Image Generator"),
            llm,
            Arc::new(PlaceholderRenderer),
            DEFAULT_SIZE,
        )
    }

    fn system_prompt(&self) -> &str {
        self.config
            .system_prompt
            .as_deref()
            .unwrap_or(PROMPT_SYSTEM_PROMPT)
    }

    pub async fn optimize_prompt(&self, request: &str) -> Result<String> {
        let raw = generate(
            self.llm.as_ref(),
            &self.config,
            self.system_prompt(),
            format!("User request: {request}"),
        )
        .await?;
        Ok(raw.trim().chars().take(MAX_PROMPT_CHARS).collect())
    }

    pub async fn generate_image(&self, description: &str) -> Result<GeneratedImage> {
        let prompt = self.optimize_prompt(description).await?;
        let image_url = self.renderer.render(&prompt, description, &self.size).await?;

        Ok(GeneratedImage {
            image_url,
            prompt,
            original_request: description.to_string(),
            size: self.size.clone(),
        })
    }
}

#[async_trait]
impl ContentHandler for ImageAgent {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    async fn produce(&self, query: &str) -> Result<ResultEnvelope> {
        info!(agent = %self.id(), renderer = %self.renderer.name(), "Processing image request");
        let image = self.generate_image(query).await?;
        ResultEnvelope::from_content(IntentLabel::Image.as_str(), &image)
    }
}
