//! Request quota for search gateways

use async_trait::async_trait;
use brief_core::{Result, SearchGateway, SearchHit};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Search gateway decorator enforcing a requests-per-minute quota
///
/// Calls over quota wait until a slot frees up instead of failing.
pub struct RateLimitedSearch<G> {
    inner: G,
    rate_limiter: SharedRateLimiter,
}

impl<G> RateLimitedSearch<G> {
    /// Wrap `inner`, allowing `requests_per_minute` calls (at least one)
    pub fn new(inner: G, requests_per_minute: u32) -> Self {
        let quota =
            Quota::per_minute(NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            inner,
            rate_limiter,
        }
    }
}

impl<G: Clone> Clone for RateLimitedSearch<G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            rate_limiter: Arc::clone(&self.rate_limiter),
        }
    }
}

#[async_trait]
impl<G: SearchGateway> SearchGateway for RateLimitedSearch<G> {
    async fn search(&self, keyword: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.rate_limiter.until_ready().await;
        self.inner.search(keyword, max_results).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::MockSearchGateway;
    use std::time::Duration;

    #[tokio::test]
    async fn test_calls_within_quota_pass_through() {
        let mut search = MockSearchGateway::new();
        search
            .expect_search()
            .times(3)
            .returning(|_, _| Ok(vec![SearchHit::new("hit")]));

        let limited = RateLimitedSearch::new(search, 60);
        let all = async {
            for _ in 0..3 {
                limited.search("NVIDIA", 5).await.unwrap();
            }
        };
        tokio::time::timeout(Duration::from_secs(1), all)
            .await
            .expect("calls within quota should not wait");
    }

    #[tokio::test]
    async fn test_call_over_quota_waits() {
        let mut search = MockSearchGateway::new();
        search.expect_search().returning(|_, _| Ok(Vec::new()));

        let limited = RateLimitedSearch::new(search, 1);
        limited.search("NVIDIA", 5).await.unwrap();

        let second =
            tokio::time::timeout(Duration::from_millis(50), limited.search("NVIDIA", 5)).await;
        assert!(second.is_err(), "second call should wait for the next slot");
    }

    #[tokio::test]
    async fn test_zero_quota_clamped_to_one() {
        let mut search = MockSearchGateway::new();
        search.expect_search().times(1).returning(|_, _| Ok(Vec::new()));

        let limited = RateLimitedSearch::new(search, 0);
        assert!(limited.search("NVIDIA", 5).await.unwrap().is_empty());
    }
}
