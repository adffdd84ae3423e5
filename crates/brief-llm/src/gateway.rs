//! Adapter exposing an [`LLMProvider`] as a language model gateway

use crate::{CompletionRequest, LLMProvider, Message, StopReason};
use async_trait::async_trait;
use brief_core::{GatewayError, LanguageModelGateway};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Language model gateway backed by an [`LLMProvider`]
///
/// Each call becomes one stateless, single-turn completion request carrying
/// the prompt as the only user message.
///
/// # Example
///
/// ```no_run
/// use brief_llm::ProviderGateway;
/// use brief_llm::providers::OpenAIProvider;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = Arc::new(OpenAIProvider::from_env()?);
/// let gateway = ProviderGateway::new(provider, "gpt-3.5-turbo");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProviderGateway {
    provider: Arc<dyn LLMProvider>,
    model: String,
    temperature: Option<f32>,
    system_prompt: Option<String>,
}

impl ProviderGateway {
    /// Create a gateway that sends requests for `model` to `provider`
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            system_prompt: None,
        }
    }

    /// Set a sampling temperature for every request
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Attach a system prompt to every request
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Model used for requests
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: &str, max_output_tokens: usize) -> CompletionRequest {
        let mut builder = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt))
            .max_tokens(max_output_tokens);

        if let Some(system) = &self.system_prompt {
            builder = builder.system(system.clone());
        }
        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }

        builder.build()
    }
}

#[async_trait]
impl LanguageModelGateway for ProviderGateway {
    #[instrument(skip(self, prompt), fields(provider = self.provider.name(), model = %self.model))]
    async fn complete(
        &self,
        prompt: &str,
        max_output_tokens: usize,
    ) -> Result<String, GatewayError> {
        let request = self.build_request(prompt, max_output_tokens);
        let response = self.provider.complete(request).await?;

        if response.stop_reason == StopReason::MaxTokens {
            warn!(max_output_tokens, "completion truncated at output cap");
        }
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "completion received"
        );

        Ok(response.message.content)
    }
}
