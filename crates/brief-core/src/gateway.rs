//! Gateway traits for the external services a pipeline talks to
//!
//! Each gateway is a narrow request/response contract. Implementations must
//! be stateless from the caller's point of view so one handle can be shared
//! across concurrent calls without locking.

use crate::{MarketInfoRecord, Result, SearchHit};
use async_trait::async_trait;
use std::sync::Arc;

/// Single-turn text completion
///
/// No conversation history is kept between calls.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait LanguageModelGateway: Send + Sync {
    /// Complete `prompt`, generating at most `max_output_tokens` tokens
    async fn complete(&self, prompt: &str, max_output_tokens: usize) -> Result<String>;
}

/// Keyword web search
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Search for `keyword`, returning at most `max_results` hits in rank order
    ///
    /// An empty list is a valid answer, not an error.
    async fn search(&self, keyword: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

/// Market data lookup by ticker symbol
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Look up `symbol`
    ///
    /// Either returns a populated record or fails; unknown symbols are errors.
    async fn lookup(&self, symbol: &str) -> Result<MarketInfoRecord>;
}

#[async_trait]
impl<T: LanguageModelGateway + ?Sized> LanguageModelGateway for Arc<T> {
    async fn complete(&self, prompt: &str, max_output_tokens: usize) -> Result<String> {
        (**self).complete(prompt, max_output_tokens).await
    }
}

#[async_trait]
impl<T: SearchGateway + ?Sized> SearchGateway for Arc<T> {
    async fn search(&self, keyword: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        (**self).search(keyword, max_results).await
    }
}

#[async_trait]
impl<T: MarketDataGateway + ?Sized> MarketDataGateway for Arc<T> {
    async fn lookup(&self, symbol: &str) -> Result<MarketInfoRecord> {
        (**self).lookup(symbol).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GatewayError;

    #[tokio::test]
    async fn test_arc_delegates_to_inner_gateway() {
        let mut search = MockSearchGateway::new();
        search
            .expect_search()
            .times(1)
            .returning(|_, _| Ok(vec![SearchHit::new("first"), SearchHit::new("second")]));

        let shared: Arc<dyn SearchGateway> = Arc::new(search);
        let hits = shared.search("NVIDIA", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "first");
    }

    #[tokio::test]
    async fn test_errors_pass_through_arc() {
        let mut market = MockMarketDataGateway::new();
        market
            .expect_lookup()
            .returning(|_| Err(GatewayError::market_data("unknown symbol")));

        let shared = Arc::new(market);
        let err = shared.lookup("ZZZZ").await.unwrap_err();
        assert_eq!(err, GatewayError::market_data("unknown symbol"));
    }
}
