use reqwest::header::InvalidHeaderValue;
use shared_utils::env::EnvError;
use thiserror::Error;

/// Errors that can occur while creating a provider instance.
#[derive(Debug, Error)]
pub enum ProviderInitError {
    /// A credential is not configured.
    #[error("{0}")]
    MissingEnvVar(#[from] EnvError),

    /// Failed to build the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// API key contains characters that cannot go into a header.
    #[error("Invalid API key format: {0}")]
    InvalidApiKey(#[from] InvalidHeaderValue),
}

/// Errors that can occur within a `BarStore` implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider's API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request parameters were invalid for this specific provider.
    #[error("Invalid parameters for provider: {0}")]
    Validation(String),

    /// Provider data could not be decoded.
    #[error("Malformed provider data: {0}")]
    Parse(String),

    /// An internal error occurred while processing data within the provider.
    #[error("Internal provider error: {0}")]
    Internal(String),

    /// An error during provider configuration or initialization.
    #[error("Provider initialization error: {0}")]
    Init(#[from] ProviderInitError),
}

impl ProviderError {
    /// Whether trying the same request again may succeed: timeouts, dropped
    /// connections, rate limiting and server-side failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Request(e) => e.is_timeout() || e.is_connect(),
            ProviderError::Api { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses() {
        let api = |status| ProviderError::Api {
            status,
            message: String::new(),
        };
        assert!(api(429).is_retryable());
        assert!(api(503).is_retryable());
        assert!(!api(401).is_retryable());
        assert!(!api(404).is_retryable());
        assert!(!ProviderError::Validation("bad".into()).is_retryable());
    }
}
