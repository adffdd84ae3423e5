//! LLM provider abstraction layer for market-brief
//!
//! This crate provides provider-agnostic abstractions for talking to Large
//! Language Models. It includes:
//!
//! - Message types for single-turn requests
//! - Completion request/response types
//! - Provider trait for LLM implementations
//! - [`ProviderGateway`], which exposes any provider as a
//!   [`brief_core::LanguageModelGateway`]
//! - An OpenAI-compatible provider (behind the `openai` feature)

pub mod completion;
pub mod error;
pub mod gateway;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use gateway::ProviderGateway;
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "openai")]
pub mod providers;
