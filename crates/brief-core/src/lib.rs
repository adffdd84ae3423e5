//! Core abstractions for market-brief
//!
//! This crate defines the types shared by every other crate in the workspace:
//!
//! - Domain values flowing through a pipeline run (`Query`, `SearchKeyword`,
//!   `TickerSymbol`, `SnippetResult`, `MarketInfoRecord`, `Summary`)
//! - The three gateway traits behind which all external services sit
//! - `GatewayError`, the single error kind raised by those services
//!
//! With the `mocks` feature enabled, `mockall` mocks of the gateway traits are
//! exported for use in other crates' tests.

pub mod error;
pub mod gateway;
pub mod types;

pub use error::{EmptyValueError, GatewayError, GatewayKind, Result};
pub use gateway::{LanguageModelGateway, MarketDataGateway, SearchGateway};
pub use types::{
    MarketInfoRecord, Query, SearchHit, SearchKeyword, SnippetResult, Summary, TickerSymbol,
};

#[cfg(any(test, feature = "mocks"))]
pub use gateway::{MockLanguageModelGateway, MockMarketDataGateway, MockSearchGateway};
