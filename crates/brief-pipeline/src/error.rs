//! Error types for pipeline runs

use brief_core::GatewayError;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can end a pipeline run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A gateway call failed; the error is passed through unchanged
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A prompt template failed to compile or render
    #[error("Prompt template '{name}' failed: {detail}")]
    Prompt { name: &'static str, detail: String },

    /// Pipeline configuration is invalid
    #[error("Invalid pipeline configuration: {0}")]
    Config(String),

    /// A run state machine was asked to make an illegal move
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),
}

impl PipelineError {
    /// The gateway failure behind this error, if any
    pub fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(err) => Some(err),
            _ => None,
        }
    }
}

