//! Error types for LLM operations

use brief_core::GatewayError;
use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Whether a later attempt might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimitExceeded(_) | Self::RequestFailed(_) => true,
            Self::HttpError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Every provider failure surfaces to the pipeline as a language model gateway error
impl From<LLMError> for GatewayError {
    fn from(err: LLMError) -> Self {
        let transient = err.is_transient();
        let gateway_err = GatewayError::language_model(err.to_string());
        if transient {
            gateway_err.retryable()
        } else {
            gateway_err
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::GatewayKind;

    #[test]
    fn test_error_display() {
        let err = LLMError::ModelNotFound("gpt-9".to_string());
        assert_eq!(err.to_string(), "Model not found: gpt-9");
    }

    #[test]
    fn test_gateway_conversion() {
        let err: GatewayError = LLMError::AuthenticationFailed.into();
        assert_eq!(err.kind(), GatewayKind::LanguageModel);
        assert!(!err.is_retryable());
        assert!(err.message().contains("authentication"));

        let err: GatewayError = LLMError::RateLimitExceeded("slow down".to_string()).into();
        assert!(err.is_retryable());
        assert!(err.message().contains("slow down"));
    }
}
