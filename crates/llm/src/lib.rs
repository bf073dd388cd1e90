//! Generative text collaborator for Content Alchemy.
//!
//! Everything the routing core and the generators need from a language model
//! goes through [`LlmClient`]. Backends are wrapped in a retry layer and a
//! concurrency cap by [`build_llm_client`].

pub mod anthropic;
pub mod client;
pub mod config;
pub mod openai;
pub mod retry;

pub use anthropic::AnthropicClient;
pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, Role, TokenUsage};
pub use config::{LlmConfig, SemaphoredClient, build_llm_client};
pub use openai::OpenAiClient;
pub use retry::{RetryConfig, RetryingClient};
