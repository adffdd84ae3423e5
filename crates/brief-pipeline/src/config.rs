//! Pipeline configuration

use crate::{PipelineError, PromptTemplates, Result};
use serde::{Deserialize, Serialize};

/// How the two enrichment branches are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Both branches in flight at once; the first failure cancels the other
    #[default]
    Concurrent,
    /// Web branch first, then market branch
    Sequential,
}

/// Tunables for a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Output cap for keyword derivation
    pub keyword_max_tokens: usize,

    /// Output cap for ticker derivation
    pub ticker_max_tokens: usize,

    /// Output cap for the summary
    pub summary_max_tokens: usize,

    /// Hits requested from the search gateway
    pub max_search_results: usize,

    /// Branch scheduling
    pub execution_mode: ExecutionMode,

    /// Instruction templates
    pub prompts: PromptTemplates,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            keyword_max_tokens: 50,
            ticker_max_tokens: 10,
            summary_max_tokens: 1000,
            max_search_results: 5,
            execution_mode: ExecutionMode::default(),
            prompts: PromptTemplates::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a builder starting from the defaults
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Check caps are non-zero and templates compile
    pub fn validate(&self) -> Result<()> {
        let caps = [
            ("keyword_max_tokens", self.keyword_max_tokens),
            ("ticker_max_tokens", self.ticker_max_tokens),
            ("summary_max_tokens", self.summary_max_tokens),
            ("max_search_results", self.max_search_results),
        ];
        if let Some((name, _)) = caps.iter().find(|(_, value)| *value == 0) {
            return Err(PipelineError::Config(format!("{name} must be greater than 0")));
        }

        self.prompts.validate()
    }
}

/// Builder for [`PipelineConfig`]
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Set the keyword derivation output cap
    pub fn keyword_max_tokens(mut self, tokens: usize) -> Self {
        self.config.keyword_max_tokens = tokens;
        self
    }

    /// Set the ticker derivation output cap
    pub fn ticker_max_tokens(mut self, tokens: usize) -> Self {
        self.config.ticker_max_tokens = tokens;
        self
    }

    /// Set the summary output cap
    pub fn summary_max_tokens(mut self, tokens: usize) -> Self {
        self.config.summary_max_tokens = tokens;
        self
    }

    /// Set how many hits to request from the search gateway
    pub fn max_search_results(mut self, results: usize) -> Self {
        self.config.max_search_results = results;
        self
    }

    /// Set branch scheduling
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }

    /// Replace the instruction templates
    pub fn prompts(mut self, prompts: PromptTemplates) -> Self {
        self.config.prompts = prompts;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.keyword_max_tokens, 50);
        assert_eq!(config.ticker_max_tokens, 10);
        assert_eq!(config.summary_max_tokens, 1000);
        assert_eq!(config.max_search_results, 5);
        assert_eq!(config.execution_mode, ExecutionMode::Concurrent);
        config.validate().unwrap();
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::builder()
            .summary_max_tokens(500)
            .max_search_results(3)
            .execution_mode(ExecutionMode::Sequential)
            .build()
            .unwrap();

        assert_eq!(config.summary_max_tokens, 500);
        assert_eq!(config.max_search_results, 3);
        assert_eq!(config.execution_mode, ExecutionMode::Sequential);
        assert_eq!(config.keyword_max_tokens, 50);
    }

    #[test]
    fn test_zero_cap_rejected() {
        let err = PipelineConfig::builder()
            .ticker_max_tokens(0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Config("ticker_max_tokens must be greater than 0".to_string())
        );
    }

    #[test]
    fn test_broken_template_rejected() {
        let err = PipelineConfig::builder()
            .prompts(PromptTemplates::default().with_keyword("{% if %}"))
            .build()
            .unwrap_err();
        assert!(matches!(err, PipelineError::Prompt { name: "keyword", .. }));
    }

    #[test]
    fn test_execution_mode_serde() {
        let mode: ExecutionMode = serde_json::from_str("\"sequential\"").unwrap();
        assert_eq!(mode, ExecutionMode::Sequential);
    }
}
