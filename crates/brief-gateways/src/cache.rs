//! Caching layer for market data to reduce API calls

use async_trait::async_trait;
use brief_core::{MarketDataGateway, MarketInfoRecord, Result};
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Market data gateway decorator with a time-to-live cache
///
/// Records are keyed by the upper-cased symbol. Failed lookups are never
/// cached, so an unknown symbol fails on every call.
pub struct CachedMarketData<G> {
    inner: G,
    cache: Arc<RwLock<TimedCache<String, MarketInfoRecord>>>,
}

impl<G> CachedMarketData<G> {
    /// Wrap `inner`, keeping records for `ttl`
    pub fn new(inner: G, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Number of cached records (expired entries may still be counted)
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Clear all cached records
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    async fn get(&self, key: &String) -> Option<MarketInfoRecord> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    async fn insert(&self, key: String, record: MarketInfoRecord) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, record);
    }
}

impl<G: Clone> Clone for CachedMarketData<G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            cache: Arc::clone(&self.cache),
        }
    }
}

#[async_trait]
impl<G: MarketDataGateway> MarketDataGateway for CachedMarketData<G> {
    async fn lookup(&self, symbol: &str) -> Result<MarketInfoRecord> {
        let key = symbol.trim().to_uppercase();

        if let Some(record) = self.get(&key).await {
            debug!("Cache hit for symbol: {}", key);
            return Ok(record);
        }

        debug!("Cache miss for symbol: {}", key);
        let record = self.inner.lookup(symbol).await?;
        self.insert(key, record.clone()).await;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::{GatewayError, MockMarketDataGateway};
    use serde_json::json;

    fn record(price: f64) -> MarketInfoRecord {
        MarketInfoRecord::from_value(json!({"symbol": "NVDA", "price": price})).unwrap()
    }

    #[tokio::test]
    async fn test_second_lookup_served_from_cache() {
        let mut market = MockMarketDataGateway::new();
        market
            .expect_lookup()
            .times(1)
            .returning(|_| Ok(record(492.98)));

        let cached = CachedMarketData::new(market, Duration::from_secs(60));
        let first = cached.lookup("NVDA").await.unwrap();
        let second = cached.lookup("nvda").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.len().await, 1);
    }

    #[tokio::test]
    async fn test_failures_not_cached() {
        let mut market = MockMarketDataGateway::new();
        market
            .expect_lookup()
            .times(2)
            .returning(|_| Err(GatewayError::market_data("unknown symbol")));

        let cached = CachedMarketData::new(market, Duration::from_secs(60));
        assert!(cached.lookup("ZZZZ").await.is_err());
        assert!(cached.lookup("ZZZZ").await.is_err());
        assert!(cached.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let mut market = MockMarketDataGateway::new();
        market
            .expect_lookup()
            .times(2)
            .returning(|_| Ok(record(1.0)));

        let cached = CachedMarketData::new(market, Duration::from_secs(60));
        cached.lookup("NVDA").await.unwrap();
        cached.clear().await;
        cached.lookup("NVDA").await.unwrap();
    }
}
