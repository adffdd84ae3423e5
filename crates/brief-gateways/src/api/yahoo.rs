//! Yahoo Finance market data gateway

use async_trait::async_trait;
use brief_core::{GatewayError, MarketDataGateway, MarketInfoRecord, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

/// Market data gateway answering with the latest daily quote
///
/// A fresh connector is created per lookup, so the gateway holds no state and
/// can be shared freely. Errors from the connector carry no transport detail,
/// so they are reported as non-retryable.
#[derive(Debug, Clone, Copy, Default)]
pub struct YahooMarketData;

impl YahooMarketData {
    /// Create a new Yahoo Finance gateway
    pub fn new() -> Self {
        Self
    }
}

/// Latest daily quote for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct LatestQuote {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
    /// Instrument details from the chart metadata, when Yahoo reports them
    pub currency: Option<String>,
    pub exchange_name: Option<String>,
    pub instrument_type: Option<String>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
}

impl LatestQuote {
    fn from_quote(symbol: &str, quote: &yahoo::Quote) -> Self {
        Self {
            symbol: symbol.to_string(),
            timestamp: DateTime::from_timestamp(quote.timestamp as i64, 0)
                .unwrap_or_else(Utc::now),
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume,
            adjclose: quote.adjclose,
            currency: None,
            exchange_name: None,
            instrument_type: None,
            long_name: None,
            short_name: None,
        }
    }

    fn with_metadata(mut self, meta: &yahoo::YMetaData) -> Self {
        self.currency = non_empty(meta.currency.clone());
        self.exchange_name = non_empty(meta.exchange_name.clone());
        self.instrument_type = non_empty(meta.instrument_type.clone());
        self.long_name = non_empty(meta.long_name.clone());
        self.short_name = non_empty(meta.short_name.clone());
        self
    }

    /// Flatten into a market info record
    ///
    /// The closing price is exposed as `price`; the timestamp is RFC 3339.
    /// Instrument details are only present when known.
    pub fn to_record(&self) -> MarketInfoRecord {
        let mut fields = Map::new();
        fields.insert("symbol".into(), Value::from(self.symbol.as_str()));
        fields.insert("price".into(), Value::from(self.close));
        fields.insert("open".into(), Value::from(self.open));
        fields.insert("high".into(), Value::from(self.high));
        fields.insert("low".into(), Value::from(self.low));
        fields.insert("volume".into(), Value::from(self.volume));
        fields.insert("adjusted_close".into(), Value::from(self.adjclose));
        fields.insert("timestamp".into(), Value::from(self.timestamp.to_rfc3339()));

        let details = [
            ("currency", &self.currency),
            ("exchange_name", &self.exchange_name),
            ("instrument_type", &self.instrument_type),
            ("long_name", &self.long_name),
            ("short_name", &self.short_name),
        ];
        for (key, value) in details {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                fields.insert(key.into(), Value::from(value));
            }
        }
        MarketInfoRecord::from_map(fields)
    }
}

#[async_trait]
impl MarketDataGateway for YahooMarketData {
    #[instrument(skip(self))]
    async fn lookup(&self, symbol: &str) -> Result<MarketInfoRecord> {
        let provider = yahoo::YahooConnector::new().map_err(|e| {
            GatewayError::market_data(format!("Failed to create Yahoo Finance connector: {e}"))
        })?;

        let response = provider
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| lookup_error(symbol, e))?;

        let quote = response.last_quote().map_err(|e| lookup_error(symbol, e))?;

        let mut latest = LatestQuote::from_quote(symbol, &quote);
        match response.metadata() {
            Ok(meta) => latest = latest.with_metadata(&meta),
            Err(e) => debug!(error = %e, "quote metadata unavailable"),
        }
        debug!(
            price = latest.close,
            currency = latest.currency.as_deref(),
            timestamp = %latest.timestamp,
            "quote received"
        );
        Ok(latest.to_record())
    }
}

fn non_empty(value: impl Into<Option<String>>) -> Option<String> {
    value.into().filter(|v| !v.trim().is_empty())
}

fn lookup_error(symbol: &str, e: yahoo::YahooError) -> GatewayError {
    GatewayError::market_data(format!("No market data for symbol '{symbol}': {e}"))
}
