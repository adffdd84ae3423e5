//! Network-backed gateway implementations

pub mod duckduckgo;
pub mod yahoo;

pub use duckduckgo::DuckDuckGoSearch;
pub use yahoo::{LatestQuote, YahooMarketData};
