//! Concrete gateways and gateway decorators for market-brief
//!
//! Two network-backed implementations of the `brief-core` gateway traits:
//!
//! - [`DuckDuckGoSearch`]: keyword search via the DuckDuckGo Instant Answer API
//! - [`YahooMarketData`]: latest daily quote from Yahoo Finance
//!
//! Plus decorators that wrap any gateway without changing its contract:
//!
//! - [`RetryingGateway`]: retries transient failures with exponential backoff
//! - [`CachedMarketData`]: TTL cache in front of a market data gateway
//! - [`RateLimitedSearch`]: request quota in front of a search gateway
//!
//! # Example
//!
//! ```no_run
//! use brief_core::MarketDataGateway;
//! use brief_gateways::{CachedMarketData, RetryPolicy, RetryingGateway, YahooMarketData};
//! use std::time::Duration;
//!
//! # async fn example() -> brief_core::Result<()> {
//! let market = RetryingGateway::new(
//!     CachedMarketData::new(YahooMarketData::new(), Duration::from_secs(60)),
//!     RetryPolicy::with_retries(2),
//! );
//! let record = market.lookup("NVDA").await?;
//! println!("{record}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod rate_limit;
pub mod retry;

pub use api::{DuckDuckGoSearch, LatestQuote, YahooMarketData};
pub use cache::CachedMarketData;
pub use rate_limit::RateLimitedSearch;
pub use retry::{RetryPolicy, RetryingGateway};
