//! The two enrichment branches
//!
//! The web branch turns an empty search into the "No results found" snippet.
//! The market branch has no such fallback: every failure ends the branch.

use crate::derive::{derive_keyword, derive_ticker};
use crate::state::{BranchState, StateLog};
use crate::{PipelineConfig, Result};
use brief_core::{
    LanguageModelGateway, MarketDataGateway, MarketInfoRecord, Query, SearchGateway,
    SnippetResult,
};
use tracing::{info, warn};

/// Derive a keyword, search for it, and keep the first hit's text
pub async fn fetch_web_snippet(
    llm: &dyn LanguageModelGateway,
    search: &dyn SearchGateway,
    config: &PipelineConfig,
    query: &Query,
) -> Result<SnippetResult> {
    let mut log = StateLog::new("web_branch", BranchState::NotStarted);
    web_branch(llm, search, config, query, &mut log).await
}

/// Derive a ticker and look up its market data
pub async fn fetch_market_info(
    llm: &dyn LanguageModelGateway,
    market: &dyn MarketDataGateway,
    config: &PipelineConfig,
    query: &Query,
) -> Result<MarketInfoRecord> {
    let mut log = StateLog::new("market_branch", BranchState::NotStarted);
    market_branch(llm, market, config, query, &mut log).await
}

pub(crate) async fn web_branch(
    llm: &dyn LanguageModelGateway,
    search: &dyn SearchGateway,
    config: &PipelineConfig,
    query: &Query,
    log: &mut StateLog<BranchState>,
) -> Result<SnippetResult> {
    let result = web_steps(llm, search, config, query, log).await;
    if result.is_err() {
        log.fail();
    }
    result
}

async fn web_steps(
    llm: &dyn LanguageModelGateway,
    search: &dyn SearchGateway,
    config: &PipelineConfig,
    query: &Query,
    log: &mut StateLog<BranchState>,
) -> Result<SnippetResult> {
    log.advance(BranchState::Deriving)?;
    let keyword = derive_keyword(llm, config, query).await?;

    log.advance(BranchState::Fetching)?;
    let hits = search
        .search(keyword.as_str(), config.max_search_results)
        .await?;

    let snippet = match hits.into_iter().next() {
        Some(hit) => SnippetResult::new(hit.text),
        None => {
            warn!(keyword = %keyword, "search returned no hits");
            SnippetResult::no_results()
        }
    };

    log.advance(BranchState::Done)?;
    info!(keyword = %keyword, "web branch complete");
    Ok(snippet)
}

pub(crate) async fn market_branch(
    llm: &dyn LanguageModelGateway,
    market: &dyn MarketDataGateway,
    config: &PipelineConfig,
    query: &Query,
    log: &mut StateLog<BranchState>,
) -> Result<MarketInfoRecord> {
    let result = market_steps(llm, market, config, query, log).await;
    if result.is_err() {
        log.fail();
    }
    result
}

async fn market_steps(
    llm: &dyn LanguageModelGateway,
    market: &dyn MarketDataGateway,
    config: &PipelineConfig,
    query: &Query,
    log: &mut StateLog<BranchState>,
) -> Result<MarketInfoRecord> {
    log.advance(BranchState::Deriving)?;
    let ticker = derive_ticker(llm, config, query).await?;

    log.advance(BranchState::Fetching)?;
    let record = market.lookup(ticker.as_str()).await?;

    log.advance(BranchState::Done)?;
    info!(ticker = %ticker, fields = record.len(), "market branch complete");
    Ok(record)
}
