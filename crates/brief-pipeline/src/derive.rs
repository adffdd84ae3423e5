//! Keyword and ticker derivation
//!
//! Both derivers render one instruction, make one completion call, and trim
//! the answer. Failures propagate unchanged; nothing is retried here.

use crate::{PipelineConfig, PipelineError, Result};
use brief_core::{
    EmptyValueError, GatewayError, LanguageModelGateway, Query, SearchKeyword, TickerSymbol,
};
use tracing::debug;

/// Ask the language model for a search keyword describing `query`
pub async fn derive_keyword(
    llm: &dyn LanguageModelGateway,
    config: &PipelineConfig,
    query: &Query,
) -> Result<SearchKeyword> {
    let prompt = config.prompts.keyword_prompt(query)?;
    let text = complete_trimmed(llm, &prompt, config.keyword_max_tokens).await?;
    debug!(keyword = %text, "derived search keyword");
    SearchKeyword::new(text).map_err(empty_completion)
}

/// Ask the language model for the ticker symbol mentioned in `query`
///
/// The answer is not checked against any listing.
pub async fn derive_ticker(
    llm: &dyn LanguageModelGateway,
    config: &PipelineConfig,
    query: &Query,
) -> Result<TickerSymbol> {
    let prompt = config.prompts.ticker_prompt(query)?;
    let text = complete_trimmed(llm, &prompt, config.ticker_max_tokens).await?;
    debug!(ticker = %text, "derived ticker symbol");
    TickerSymbol::new(text).map_err(empty_completion)
}

/// One completion with surrounding whitespace removed
///
/// A blank answer is reported as a language model gateway error.
pub(crate) async fn complete_trimmed(
    llm: &dyn LanguageModelGateway,
    prompt: &str,
    max_output_tokens: usize,
) -> Result<String> {
    let text = llm.complete(prompt, max_output_tokens).await?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::language_model("empty completion").into());
    }
    Ok(trimmed.to_string())
}

fn empty_completion(err: EmptyValueError) -> PipelineError {
    GatewayError::language_model(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::MockLanguageModelGateway;

    #[tokio::test]
    async fn test_keyword_prompt_and_cap() {
        let mut llm = MockLanguageModelGateway::new();
        llm.expect_complete()
            .withf(|prompt, max_tokens| {
                prompt == "Generate a search keyword for the query: NVIDIA stock price"
                    && *max_tokens == 50
            })
            .times(1)
            .returning(|_, _| Ok("  NVIDIA latest news\n".to_string()));

        let query = Query::new("NVIDIA stock price").unwrap();
        let keyword = derive_keyword(&llm, &PipelineConfig::default(), &query)
            .await
            .unwrap();
        assert_eq!(keyword.as_str(), "NVIDIA latest news");
    }

    #[tokio::test]
    async fn test_ticker_prompt_and_cap() {
        let mut llm = MockLanguageModelGateway::new();
        llm.expect_complete()
            .withf(|prompt, max_tokens| {
                prompt == "Extract the stock ticker code from the query: Apple shares"
                    && *max_tokens == 10
            })
            .times(1)
            .returning(|_, _| Ok("AAPL".to_string()));

        let query = Query::new("Apple shares").unwrap();
        let ticker = derive_ticker(&llm, &PipelineConfig::default(), &query)
            .await
            .unwrap();
        assert_eq!(ticker.as_str(), "AAPL");
    }

    #[test]
    fn test_ticker_not_validated() {
        let mut llm = MockLanguageModelGateway::new();
        llm.expect_complete()
            .returning(|_, _| Ok("The ticker is NVDA.".to_string()));

        let query = Query::new("NVIDIA").unwrap();
        let ticker =
            tokio_test::block_on(derive_ticker(&llm, &PipelineConfig::default(), &query)).unwrap();
        assert_eq!(ticker.as_str(), "The ticker is NVDA.");
    }

    #[tokio::test]
    async fn test_blank_completion_is_gateway_error() {
        let mut llm = MockLanguageModelGateway::new();
        llm.expect_complete().returning(|_, _| Ok(" \n\t".to_string()));

        let query = Query::new("NVIDIA").unwrap();
        let err = derive_keyword(&llm, &PipelineConfig::default(), &query)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Gateway(GatewayError::language_model("empty completion"))
        );
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates_unchanged() {
        let mut llm = MockLanguageModelGateway::new();
        llm.expect_complete()
            .times(1)
            .returning(|_, _| Err(GatewayError::language_model("invalid API key")));

        let query = Query::new("NVIDIA").unwrap();
        let err = derive_ticker(&llm, &PipelineConfig::default(), &query)
            .await
            .unwrap_err();
        assert_eq!(err.as_gateway().map(GatewayError::message), Some("invalid API key"));
    }
}
