use async_trait::async_trait;
use alchemy_common::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmRequest {
    pub system_prompt: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    /// A single-turn request: system instructions plus one user message.
    pub fn instructed(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system_prompt: Some(system.into()),
            messages: vec![ChatMessage::user(user)],
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
    pub finish_reason: Option<String>,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse>;

    fn model_name(&self) -> &str;
}

#[async_trait]
impl LlmClient for Box<dyn LlmClient> {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        (**self).complete(request).await
    }
    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn instructed_request_has_system_and_one_user_turn() {
        let request = LlmRequest::instructed("Pick a label.", "Write a blog").with_temperature(0.0);

        assert_eq!(request.system_prompt.as_deref(), Some("Pick a label."));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
        assert_eq!(request.messages[0].content, "Write a blog");
        assert_eq!(request.temperature, Some(0.0));
        assert!(request.max_tokens.is_none());
    }

    #[test]
    fn request_serialization_keeps_optional_fields() {
        let request = LlmRequest::instructed("You are helpful.", "Hi").with_max_tokens(256);
        let json = serde_json::to_string(&request).unwrap();
        let back: LlmRequest = serde_json::from_str(&json).unwrap();

        assert_eq!(back.system_prompt.as_deref(), Some("You are helpful."));
        assert_eq!(back.max_tokens, Some(256));
        assert!(back.temperature.is_none());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    struct RecordingClient {
        seen: Mutex<Vec<LlmRequest>>,
    }

    #[async_trait]
    impl LlmClient for RecordingClient {
        async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(LlmResponse {
                content: " article \n".into(),
                model: "recording".into(),
                usage: None,
                finish_reason: Some("stop".into()),
            })
        }
        fn model_name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn boxed_client_forwards_request_and_raw_reply() {
        let client: Box<dyn LlmClient> = Box::new(RecordingClient {
            seen: Mutex::new(Vec::new()),
        });
        let response = client
            .complete(LlmRequest::instructed("system text", "user text"))
            .await
            .unwrap();

        // Normalisation is the caller's job.
        assert_eq!(response.content, " article \n");
        assert_eq!(client.model_name(), "recording");
    }
}
