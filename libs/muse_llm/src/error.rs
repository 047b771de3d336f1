use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Generation timed out: {0}")]
    Timeout(String),

    #[error("Generation failed: {0}")]
    Unknown(String),
}

impl GenerationError {
    /// Rate limits and timeouts are transient; everything else fails fast.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Timeout(_))
    }

    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => Self::RateLimited(body),
            401 | 403 => Self::AuthFailed(body),
            408 | 504 => Self::Timeout(format!("provider returned {}", status)),
            _ => Self::Unknown(format!("API returned error status: {}, body: {}", status, body)),
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), err.to_string())
        } else {
            Self::Unknown(format!("Failed to send request: {}", err))
        }
    }
}
