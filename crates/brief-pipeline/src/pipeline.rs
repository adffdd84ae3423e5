//! Pipeline orchestrator
//!
//! Runs both enrichment branches, then hands their results to the
//! synthesizer. Nothing in here retries, times out, or caches; wrap the
//! gateways for that.

use crate::branch::{market_branch, web_branch};
use crate::state::{PipelineState, RunTrace};
use crate::synth::synthesize;
use crate::{ExecutionMode, PipelineConfig, PipelineError, Result};
use brief_core::{LanguageModelGateway, MarketDataGateway, Query, SearchGateway, Summary};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The outcome of a run together with the states it went through
#[derive(Debug)]
pub struct TracedRun {
    pub result: Result<Summary>,
    pub trace: RunTrace,
}

/// Two-branch enrichment pipeline
///
/// Holds one handle per gateway. The language model handle is shared
/// read-only by both branches and the synthesizer.
///
/// # Example
///
/// ```no_run
/// use brief_core::Query;
/// use brief_pipeline::Pipeline;
/// # use brief_core::{LanguageModelGateway, MarketDataGateway, SearchGateway};
/// # use std::sync::Arc;
///
/// # async fn example(
/// #     llm: Arc<dyn LanguageModelGateway>,
/// #     search: Arc<dyn SearchGateway>,
/// #     market: Arc<dyn MarketDataGateway>,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = Pipeline::builder()
///     .language_model(llm)
///     .search(search)
///     .market_data(market)
///     .build()?;
///
/// let summary = pipeline.run(&Query::new("NVIDIA stock price")?).await?;
/// println!("Summary: {summary}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Pipeline {
    llm: Arc<dyn LanguageModelGateway>,
    search: Arc<dyn SearchGateway>,
    market: Arc<dyn MarketDataGateway>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with the default configuration
    pub fn new(
        llm: Arc<dyn LanguageModelGateway>,
        search: Arc<dyn SearchGateway>,
        market: Arc<dyn MarketDataGateway>,
    ) -> Self {
        Self {
            llm,
            search,
            market,
            config: PipelineConfig::default(),
        }
    }

    /// Create a pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Configuration used for every run
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Answer `query` with a summary
    ///
    /// Fails with the first error raised by either branch or the
    /// synthesizer. The synthesizer is only called once both branches
    /// have succeeded.
    pub async fn run(&self, query: &Query) -> Result<Summary> {
        self.run_traced(query).await.result
    }

    /// Like [`run`](Self::run), also returning the recorded state transitions
    #[instrument(skip(self, query), fields(mode = ?self.config.execution_mode))]
    pub async fn run_traced(&self, query: &Query) -> TracedRun {
        let mut trace = RunTrace::new();
        let result = self.execute(query, &mut trace).await;

        if let Err(e) = &result {
            trace.pipeline.fail();
            warn!(error = %e, "pipeline run failed");
        }

        TracedRun { result, trace }
    }

    async fn execute(&self, query: &Query, trace: &mut RunTrace) -> Result<Summary> {
        let RunTrace {
            pipeline,
            web,
            market,
        } = trace;
        let llm = self.llm.as_ref();
        let config = &self.config;

        let (snippet, record) = match config.execution_mode {
            // try_join! drops the other branch as soon as one fails
            ExecutionMode::Concurrent => tokio::try_join!(
                web_branch(llm, self.search.as_ref(), config, query, web),
                market_branch(llm, self.market.as_ref(), config, query, market),
            )?,
            ExecutionMode::Sequential => {
                let snippet = web_branch(llm, self.search.as_ref(), config, query, web).await?;
                let record =
                    market_branch(llm, self.market.as_ref(), config, query, market).await?;
                (snippet, record)
            }
        };
        pipeline.advance(PipelineState::BranchesComplete)?;

        pipeline.advance(PipelineState::Synthesizing)?;
        let summary = synthesize(llm, config, query, &snippet, &record).await?;

        pipeline.advance(PipelineState::Done)?;
        info!("pipeline run complete");
        Ok(summary)
    }
}

/// Builder for [`Pipeline`]
#[derive(Default)]
pub struct PipelineBuilder {
    llm: Option<Arc<dyn LanguageModelGateway>>,
    search: Option<Arc<dyn SearchGateway>>,
    market: Option<Arc<dyn MarketDataGateway>>,
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Set the language model gateway
    pub fn language_model(mut self, llm: Arc<dyn LanguageModelGateway>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set the search gateway
    pub fn search(mut self, search: Arc<dyn SearchGateway>) -> Self {
        self.search = Some(search);
        self
    }

    /// Set the market data gateway
    pub fn market_data(mut self, market: Arc<dyn MarketDataGateway>) -> Self {
        self.market = Some(market);
        self
    }

    /// Set the pipeline configuration
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the pipeline
    ///
    /// Fails if a gateway is missing or the configuration is invalid.
    pub fn build(self) -> Result<Pipeline> {
        let llm = self
            .llm
            .ok_or_else(|| PipelineError::Config("language model gateway not set".to_string()))?;
        let search = self
            .search
            .ok_or_else(|| PipelineError::Config("search gateway not set".to_string()))?;
        let market = self
            .market
            .ok_or_else(|| PipelineError::Config("market data gateway not set".to_string()))?;
        self.config.validate()?;

        Ok(Pipeline {
            llm,
            search,
            market,
            config: self.config,
        })
    }
}
