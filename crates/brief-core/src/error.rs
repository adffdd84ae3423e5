//! Error types for gateway operations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for gateway calls
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Which external service raised a [`GatewayError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayKind {
    /// Language model completions
    LanguageModel,
    /// Web search
    Search,
    /// Market data lookups
    MarketData,
}

impl GatewayKind {
    /// Stable identifier used in logs and error messages
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LanguageModel => "language_model",
            Self::Search => "search",
            Self::MarketData => "market_data",
        }
    }
}

impl fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of an external service call
///
/// One error kind covers every gateway. Network, auth,
/// quota and unknown-entity failures are told apart only by the gateway that
/// raised them and their message. The `retryable` flag marks transient
/// failures (timeouts, connection resets, rate limits) so that resilience
/// decorators can decide whether another attempt makes sense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} gateway error: {message}")]
pub struct GatewayError {
    kind: GatewayKind,
    message: String,
    retryable: bool,
}

impl GatewayError {
    /// Create a non-retryable error for the given gateway
    pub fn new(kind: GatewayKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: false,
        }
    }

    /// Error raised by the language model gateway
    pub fn language_model(message: impl Into<String>) -> Self {
        Self::new(GatewayKind::LanguageModel, message)
    }

    /// Error raised by the search gateway
    pub fn search(message: impl Into<String>) -> Self {
        Self::new(GatewayKind::Search, message)
    }

    /// Error raised by the market data gateway
    pub fn market_data(message: impl Into<String>) -> Self {
        Self::new(GatewayKind::MarketData, message)
    }

    /// Mark this error as transient
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    /// Gateway that raised the error
    pub fn kind(&self) -> GatewayKind {
        self.kind
    }

    /// Human-readable failure description
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

/// A value that must be non-empty was empty (or whitespace only)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} must not be empty")]
pub struct EmptyValueError(pub &'static str);
