use std::env;
use std::path::PathBuf;
use std::time::Duration;

use muse_history::DEFAULT_HISTORY_FILE;
use muse_llm::{LLMClientConfig, LLMProvider, ProviderCredentials, RetryConfig, SamplingConfig};

use crate::error::ConfigError;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Process configuration, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub environment: String,
    pub bind_address: String,
    pub history_file: PathBuf,
    pub provider: LLMProvider,
    pub credentials: ProviderCredentials,
    pub generation_timeout: Duration,
    pub max_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let provider = var("MODEL_PROVIDER")
            .unwrap_or_else(|| "gemini".to_string())
            .parse::<LLMProvider>()?;

        let (key_var, model_var, default_model) = match provider {
            LLMProvider::Gemini => ("GEMINI_API_KEY", "GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            LLMProvider::OpenAI => ("OPENAI_API_KEY", "OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
        };

        let api_key = var(key_var)
            .map(|key| strip_quotes(&key).to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing(key_var.to_string()))?;

        let generation_timeout = match var("GENERATION_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number(&raw, "GENERATION_TIMEOUT_SECS")?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let max_retries = match var("GENERATION_MAX_RETRIES") {
            Some(raw) => parse_number(&raw, "GENERATION_MAX_RETRIES")?,
            None => DEFAULT_MAX_RETRIES,
        };

        Ok(Self {
            environment: var("APP_ENVIRONMENT").unwrap_or_else(|| "dev".to_string()),
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            history_file: var("HISTORY_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE)),
            provider,
            credentials: ProviderCredentials {
                api_key,
                model: var(model_var).unwrap_or_else(|| default_model.to_string()),
            },
            generation_timeout,
            max_retries,
        })
    }

    pub fn is_dev(&self) -> bool {
        self.environment == "dev"
    }

    pub fn llm_client_config(&self) -> LLMClientConfig {
        LLMClientConfig {
            timeout: self.generation_timeout,
            retry_config: RetryConfig {
                max_retries: self.max_retries,
                ..RetryConfig::default()
            },
            sampling: SamplingConfig::default(),
        }
    }

    /// Outer HTTP timeout: the whole generation budget plus headroom for the store.
    pub fn request_timeout(&self) -> Duration {
        self.llm_client_config().total_budget() + Duration::from_secs(10)
    }
}

fn strip_quotes(value: &str) -> &str {
    value.trim().trim_matches(|c| c == '"' || c == '\'')
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::Invalid(format!("{} must be a number, got '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_gemini() {
        let config = config_from(&[("GEMINI_API_KEY", "abc")]).unwrap();

        assert_eq!(config.provider, LLMProvider::Gemini);
        assert_eq!(config.credentials.model, "gemini-2.0-flash");
        assert_eq!(config.history_file, PathBuf::from("content_history.json"));
        assert_eq!(config.generation_timeout, Duration::from_secs(30));
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert!(config.is_dev());
    }

    #[test]
    fn strips_quotes_from_keys() {
        let config = config_from(&[
            ("MODEL_PROVIDER", "OpenAI"),
            ("OPENAI_API_KEY", " \"sk-123\" "),
            ("OPENAI_MODEL", "gpt-4o-mini"),
        ])
        .unwrap();

        assert_eq!(config.provider, LLMProvider::OpenAI);
        assert_eq!(config.credentials.api_key, "sk-123");
        assert_eq!(config.credentials.model, "gpt-4o-mini");
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = config_from(&[("MODEL_PROVIDER", "openai"), ("GEMINI_API_KEY", "abc")])
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::Missing(key) if key == "OPENAI_API_KEY"));

        let err = config_from(&[("GEMINI_API_KEY", "''")]).err().unwrap();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn rejects_unknown_provider_and_bad_numbers() {
        let err = config_from(&[("MODEL_PROVIDER", "llama")]).err().unwrap();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = config_from(&[("GEMINI_API_KEY", "abc"), ("GENERATION_TIMEOUT_SECS", "soon")])
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn request_timeout_exceeds_generation_budget() {
        let config = config_from(&[("GEMINI_API_KEY", "abc")]).unwrap();
        assert!(config.request_timeout() > config.generation_timeout * (config.max_retries + 1));
    }
}
