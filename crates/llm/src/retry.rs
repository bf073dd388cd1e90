use async_trait::async_trait;
use alchemy_common::{AlchemyError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::client::{LlmClient, LlmRequest, LlmResponse};

/// Markers of transient provider failures worth another attempt.
const TRANSIENT_MARKERS: &[&str] = &[
    "429",
    "rate limit",
    "500",
    "502",
    "503",
    "504",
    "overloaded",
    "timed out",
    "connection",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Retries transient provider failures with exponential backoff.
///
/// Only `AlchemyError::Provider` failures are considered; anything else is
/// returned on the first attempt.
pub struct RetryingClient<T: LlmClient> {
    inner: T,
    config: RetryConfig,
}

impl<T: LlmClient> RetryingClient<T> {
    pub fn new(inner: T, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    fn is_retryable(error: &AlchemyError) -> bool {
        let AlchemyError::Provider(message) = error else {
            return false;
        };
        let lower = message.to_lowercase();
        TRANSIENT_MARKERS.iter().any(|marker| lower.contains(marker))
    }

    /// Delay before retry number `attempt` (zero-based), capped at `max_delay_ms`.
    fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.config.backoff_multiplier.powi(attempt as i32);
        let millis = (self.config.initial_delay_ms as f64 * exp) as u64;
        Duration::from_millis(millis.min(self.config.max_delay_ms))
    }
}

#[async_trait]
impl<T: LlmClient> LlmClient for RetryingClient<T> {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let mut attempt = 0;
        loop {
            match self.inner.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.config.max_retries && Self::is_retryable(&e) => {
                    let delay = self.backoff(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying LLM request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with the given error for the first `failures` calls.
    struct FlakyClient {
        failures: u32,
        message: &'static str,
        calls: AtomicU32,
    }

    impl FlakyClient {
        fn new(failures: u32, message: &'static str) -> Self {
            Self {
                failures,
                message,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmClient for FlakyClient {
        async fn complete(&self, _request: LlmRequest) -> Result<LlmResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(AlchemyError::Provider(self.message.to_string()));
            }
            Ok(LlmResponse {
                content: "ok".to_string(),
                model: "flaky".to_string(),
                usage: None,
                finish_reason: None,
            })
        }
        fn model_name(&self) -> &str {
            "flaky"
        }
    }

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            backoff_multiplier: 2.0,
        }
    }

    #[test]
    fn only_transient_provider_errors_are_retryable() {
        type C = RetryingClient<FlakyClient>;
        assert!(C::is_retryable(&AlchemyError::Provider(
            "OpenAI API error 429 Too Many Requests".into()
        )));
        assert!(C::is_retryable(&AlchemyError::Provider(
            "Anthropic API error 529: overloaded".into()
        )));
        assert!(!C::is_retryable(&AlchemyError::Provider(
            "OpenAI API error 401 Unauthorized".into()
        )));
        assert!(!C::is_retryable(&AlchemyError::Config("503".into())));
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        let client = RetryingClient::new(
            FlakyClient::new(0, ""),
            RetryConfig {
                max_retries: 5,
                initial_delay_ms: 100,
                max_delay_ms: 1_000,
                backoff_multiplier: 3.0,
            },
        );
        assert_eq!(client.backoff(0), Duration::from_millis(100));
        assert_eq!(client.backoff(1), Duration::from_millis(300));
        assert_eq!(client.backoff(4), Duration::from_millis(1_000));
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let client = RetryingClient::new(FlakyClient::new(2, "503 Service Unavailable"), fast_config(3));
        let response = client.complete(LlmRequest::default()).await.unwrap();
        assert_eq!(response.content, "ok");
        assert_eq!(client.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let client = RetryingClient::new(FlakyClient::new(10, "502 bad gateway"), fast_config(2));
        assert!(client.complete(LlmRequest::default()).await.is_err());
        assert_eq!(client.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_fail_fast() {
        let client = RetryingClient::new(FlakyClient::new(10, "401 Unauthorized"), fast_config(3));
        assert!(client.complete(LlmRequest::default()).await.is_err());
        assert_eq!(client.inner.calls.load(Ordering::SeqCst), 1);
    }
}
