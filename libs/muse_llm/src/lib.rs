use async_trait::async_trait;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::timeout;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;

pub mod error;
pub mod gemini;
pub mod openai;

pub use error::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LLMProvider {
    Gemini,
    OpenAI,
}

impl FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAI),
            other => Err(format!("Unknown model provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 300,
        }
    }
}

/// A text-completion backend. Implementations return the raw completion text.
#[async_trait]
pub trait LLMService {
    async fn generate(
        &self,
        prompt: &str,
        sampling: &SamplingConfig,
    ) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LLMClientConfig {
    pub timeout: Duration,
    pub retry_config: RetryConfig,
    pub sampling: SamplingConfig,
}

impl Default for LLMClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
            sampling: SamplingConfig::default(),
        }
    }
}

impl LLMClientConfig {
    /// Upper bound on how long `LLMClient::generate` can take, backoff included.
    pub fn total_budget(&self) -> Duration {
        let attempts = self.retry_config.max_retries + 1;
        let backoff: Duration = backoff_strategy(&self.retry_config).sum();
        self.timeout * attempts + backoff
    }
}

fn backoff_strategy(retry_config: &RetryConfig) -> impl Iterator<Item = Duration> {
    // base 2 with factor d/2 yields d, 2d, 4d, ...
    let factor = (retry_config.base_delay.as_millis() as u64 / 2).max(1);
    ExponentialBackoff::from_millis(2)
        .factor(factor)
        .max_delay(Duration::from_secs(30))
        .take(retry_config.max_retries as usize)
}

pub struct LLMClient {
    service: Box<dyn LLMService + Send + Sync>,
    config: LLMClientConfig,
}

impl LLMClient {
    pub fn new(
        provider: LLMProvider,
        credentials: ProviderCredentials,
        config: Option<LLMClientConfig>,
    ) -> Self {
        let service: Box<dyn LLMService + Send + Sync> = match provider {
            LLMProvider::Gemini => Box::new(gemini::GeminiService::new(
                credentials.api_key,
                credentials.model,
            )),
            LLMProvider::OpenAI => Box::new(openai::OpenAIService::new(
                credentials.api_key,
                credentials.model,
            )),
        };

        Self {
            service,
            config: config.unwrap_or_default(),
        }
    }

    pub fn from_service<S>(service: S, config: Option<LLMClientConfig>) -> Self
    where
        S: LLMService + Send + Sync + 'static,
    {
        Self {
            service: Box::new(service),
            config: config.unwrap_or_default(),
        }
    }

    /// Sends `prompt` to the provider. Every attempt is bounded by the configured
    /// timeout; rate limits and timeouts are retried with exponential backoff.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let max_attempts = self.config.retry_config.max_retries + 1;
        let mut attempt = 0;

        let text = RetryIf::spawn(
            backoff_strategy(&self.config.retry_config),
            || {
                attempt += 1;
                let current = attempt;
                async move {
                    let result = match timeout(
                        self.config.timeout,
                        self.service.generate(prompt, &self.config.sampling),
                    )
                    .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(GenerationError::Timeout(format!(
                            "no response within {:?}",
                            self.config.timeout
                        ))),
                    };

                    if let Err(e) = &result {
                        if e.is_retryable() && current < max_attempts {
                            tracing::warn!(
                                "Generation failed (attempt {}/{}): {}. Retrying...",
                                current,
                                max_attempts,
                                e
                            );
                        } else {
                            tracing::error!(
                                "Generation failed after {} attempt(s): {}",
                                current,
                                e
                            );
                        }
                    }
                    result
                }
            },
            GenerationError::is_retryable,
        )
        .await?;

        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::Unknown(
                "provider returned an empty completion".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct ScriptedService {
        calls: Arc<AtomicU32>,
        failures: Vec<GenerationError>,
        reply: String,
    }

    #[async_trait]
    impl LLMService for ScriptedService {
        async fn generate(
            &self,
            _prompt: &str,
            _sampling: &SamplingConfig,
        ) -> Result<String, GenerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            match self.failures.get(call) {
                Some(err) => Err(err.clone()),
                None => Ok(self.reply.clone()),
            }
        }
    }

    struct SlowService;

    #[async_trait]
    impl LLMService for SlowService {
        async fn generate(
            &self,
            _prompt: &str,
            _sampling: &SamplingConfig,
        ) -> Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    fn fast_config(max_retries: u32) -> LLMClientConfig {
        LLMClientConfig {
            timeout: Duration::from_millis(50),
            retry_config: RetryConfig {
                max_retries,
                base_delay: Duration::from_millis(2),
            },
            sampling: SamplingConfig::default(),
        }
    }

    fn scripted(failures: Vec<GenerationError>, reply: &str) -> (ScriptedService, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let service = ScriptedService {
            calls: Arc::clone(&calls),
            failures,
            reply: reply.to_string(),
        };
        (service, calls)
    }

    #[test]
    fn parses_provider_names() {
        assert_eq!("Gemini".parse::<LLMProvider>(), Ok(LLMProvider::Gemini));
        assert_eq!(" openai ".parse::<LLMProvider>(), Ok(LLMProvider::OpenAI));
        assert!("claude".parse::<LLMProvider>().is_err());
    }

    #[tokio::test]
    async fn retries_rate_limits_then_succeeds() {
        let (service, calls) = scripted(
            vec![GenerationError::RateLimited("busy".into())],
            "  Dream big.  ",
        );
        let client = LLMClient::from_service(service, Some(fast_config(2)));

        let text = client.generate("prompt").await.unwrap();

        assert_eq!(text, "Dream big.");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn auth_failures_are_not_retried() {
        let (service, calls) = scripted(
            vec![GenerationError::AuthFailed("bad key".into())],
            "unused",
        );
        let client = LLMClient::from_service(service, Some(fast_config(3)));

        let err = client.generate("prompt").await.unwrap_err();

        assert!(matches!(err, GenerationError::AuthFailed(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let failures = vec![GenerationError::RateLimited("busy".into()); 5];
        let (service, calls) = scripted(failures, "unused");
        let client = LLMClient::from_service(service, Some(fast_config(2)));

        let err = client.generate("prompt").await.unwrap_err();

        assert!(matches!(err, GenerationError::RateLimited(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let client = LLMClient::from_service(SlowService, Some(fast_config(0)));

        let err = client.generate("prompt").await.unwrap_err();

        assert!(matches!(err, GenerationError::Timeout(_)));
    }

    #[tokio::test]
    async fn empty_completion_is_an_error() {
        let (service, _) = scripted(Vec::new(), "   ");
        let client = LLMClient::from_service(service, Some(fast_config(0)));

        let err = client.generate("prompt").await.unwrap_err();

        assert!(matches!(err, GenerationError::Unknown(_)));
    }

    #[test]
    fn total_budget_covers_every_attempt() {
        let config = fast_config(2);
        assert!(config.total_budget() >= Duration::from_millis(150));
    }
}
