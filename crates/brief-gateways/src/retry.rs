//! Retry logic with exponential backoff
//!
//! [`RetryPolicy`] retries an async gateway call while it fails with a
//! retryable `GatewayError`. [`RetryingGateway`] applies a policy to every
//! call made through a wrapped gateway.

use async_trait::async_trait;
use brief_core::{
    LanguageModelGateway, MarketDataGateway, MarketInfoRecord, Result, SearchGateway, SearchHit,
};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    /// Initial backoff duration
    pub initial_backoff: Duration,

    /// Maximum backoff duration
    pub max_backoff: Duration,

    /// Backoff multiplier (typically 2.0 for exponential backoff)
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(
        max_attempts: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
        backoff_multiplier: f64,
    ) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff,
            backoff_multiplier,
        }
    }

    /// Default backoff with `retries` attempts after the first
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            ..Self::default()
        }
    }

    /// Create a policy with no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Create a policy with fast retries (for testing)
    pub fn fast() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(100),
            backoff_multiplier: 2.0,
        }
    }

    /// Backoff before the retry following failed attempt number `attempt`
    fn backoff_duration(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let backoff_ms = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);

        Duration::from_millis(backoff_ms as u64).min(self.max_backoff)
    }

    /// Execute an async operation with retry logic
    ///
    /// Non-retryable errors are returned immediately. After the last attempt
    /// the final error is returned unchanged.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(
                            "Operation '{}' succeeded after {} retries",
                            operation_name,
                            attempt - 1
                        );
                    }
                    return Ok(result);
                }
                Err(e) if !e.is_retryable() => {
                    debug!("Operation '{}' failed with non-retryable error", operation_name);
                    return Err(e);
                }
                Err(e) if attempt >= max_attempts => {
                    warn!(
                        "Operation '{}' failed after {} attempts: {}",
                        operation_name, max_attempts, e
                    );
                    return Err(e);
                }
                Err(e) => {
                    let backoff = self.backoff_duration(attempt);
                    warn!(
                        "Operation '{}' failed (attempt {}/{}): {}. Retrying in {:?}",
                        operation_name, attempt, max_attempts, e, backoff
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Gateway decorator that retries transient failures
///
/// Implements whichever gateway traits the wrapped gateway implements.
#[derive(Debug, Clone)]
pub struct RetryingGateway<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G> RetryingGateway<G> {
    /// Wrap `inner`, retrying according to `policy`
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The retry policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Unwrap the decorated gateway
    pub fn into_inner(self) -> G {
        self.inner
    }
}

#[async_trait]
impl<G: LanguageModelGateway> LanguageModelGateway for RetryingGateway<G> {
    async fn complete(&self, prompt: &str, max_output_tokens: usize) -> Result<String> {
        self.policy
            .execute("complete", || self.inner.complete(prompt, max_output_tokens))
            .await
    }
}

#[async_trait]
impl<G: SearchGateway> SearchGateway for RetryingGateway<G> {
    async fn search(&self, keyword: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.policy
            .execute("search", || self.inner.search(keyword, max_results))
            .await
    }
}

#[async_trait]
impl<G: MarketDataGateway> MarketDataGateway for RetryingGateway<G> {
    async fn lookup(&self, symbol: &str) -> Result<MarketInfoRecord> {
        self.policy
            .execute("lookup", || self.inner.lookup(symbol))
            .await
    }
}
