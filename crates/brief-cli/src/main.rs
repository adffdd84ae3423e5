//! Command-line interface for market-brief
//!
//! Answers one financial query per invocation and prints the summary:
//!
//! ```text
//! $ market-brief "NVIDIA stock price"
//! Summary: ...
//! ```

mod output;

use anyhow::Context;
use brief_core::{LanguageModelGateway, MarketDataGateway, Query, SearchGateway};
use brief_gateways::{
    CachedMarketData, DuckDuckGoSearch, RateLimitedSearch, RetryPolicy, RetryingGateway,
    YahooMarketData,
};
use brief_llm::ProviderGateway;
use brief_llm::providers::{OpenAIConfig, OpenAIProvider};
use brief_pipeline::{ExecutionMode, Pipeline, PipelineConfig};
use brief_utils::{Settings, init_tracing};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "market-brief")]
#[command(about = "Summarize web news and market data for a financial query", long_about = None)]
struct Args {
    /// Natural-language question, e.g. "Apple shares"
    #[arg(default_value = "NVIDIA stock price")]
    query: String,

    /// Run the web branch to completion before starting the market branch
    #[arg(long)]
    sequential: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = Settings::load().context("Failed to load settings")?;
    init_tracing(settings.log_format);

    let query = Query::new(args.query).context("Invalid query")?;
    let mode = if args.sequential {
        ExecutionMode::Sequential
    } else {
        ExecutionMode::Concurrent
    };

    let pipeline = build_pipeline(&settings, mode)?;
    info!(query = %query, model = %settings.openai_model, "Starting market-brief");

    let summary = pipeline.run(&query).await?;

    output::print_summary(&mut std::io::stdout().lock(), &summary)?;
    Ok(())
}

/// Wire the concrete gateways and decorators selected by `settings`
fn build_pipeline(settings: &Settings, mode: ExecutionMode) -> anyhow::Result<Pipeline> {
    let mut openai = OpenAIConfig::new(settings.openai_api_key.clone());
    if let Some(base) = &settings.openai_api_base {
        openai = openai.with_api_base(base.clone());
    }
    if let Some(timeout) = settings.request_timeout_secs {
        openai = openai.with_timeout(timeout);
    }
    let provider = OpenAIProvider::with_config(openai).context("Failed to create LLM provider")?;

    let mut llm: Arc<dyn LanguageModelGateway> = Arc::new(ProviderGateway::new(
        Arc::new(provider),
        settings.openai_model.clone(),
    ));

    let search_client = match settings.request_timeout_secs {
        Some(secs) => DuckDuckGoSearch::with_timeout(Duration::from_secs(secs)),
        None => DuckDuckGoSearch::new(),
    }?;
    let mut search: Arc<dyn SearchGateway> = Arc::new(RateLimitedSearch::new(
        search_client,
        settings.search_requests_per_minute,
    ));

    let mut market: Arc<dyn MarketDataGateway> = match settings.cache_ttl() {
        Some(ttl) => Arc::new(CachedMarketData::new(YahooMarketData::new(), ttl)),
        None => Arc::new(YahooMarketData::new()),
    };

    if settings.max_retries > 0 {
        let policy = RetryPolicy::with_retries(settings.max_retries);
        llm = Arc::new(RetryingGateway::new(llm, policy.clone()));
        search = Arc::new(RetryingGateway::new(search, policy.clone()));
        market = Arc::new(RetryingGateway::new(market, policy));
    }

    let config = PipelineConfig::builder().execution_mode(mode).build()?;

    Ok(Pipeline::builder()
        .language_model(llm)
        .search(search)
        .market_data(market)
        .config(config)
        .build()?)
}
