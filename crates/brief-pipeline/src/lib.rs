//! Two-branch enrichment pipeline for market-brief
//!
//! A run answers one natural-language financial query:
//!
//! 1. The web branch derives a search keyword and keeps the first search hit
//!    (or "No results found" when there is none).
//! 2. The market branch derives a ticker symbol and looks up its market data.
//! 3. The synthesizer turns the query and both results into one summary.
//!
//! The branches share nothing but the language model handle. Each step is
//! also exposed as a free function so it can be called on its own.
//!
//! # Example
//!
//! ```no_run
//! use brief_core::Query;
//! use brief_pipeline::{ExecutionMode, Pipeline, PipelineConfig};
//! # use brief_core::{LanguageModelGateway, MarketDataGateway, SearchGateway};
//! # use std::sync::Arc;
//!
//! # async fn example(
//! #     llm: Arc<dyn LanguageModelGateway>,
//! #     search: Arc<dyn SearchGateway>,
//! #     market: Arc<dyn MarketDataGateway>,
//! # ) -> brief_pipeline::Result<()> {
//! let config = PipelineConfig::builder()
//!     .execution_mode(ExecutionMode::Sequential)
//!     .build()?;
//!
//! let pipeline = Pipeline::builder()
//!     .language_model(llm)
//!     .search(search)
//!     .market_data(market)
//!     .config(config)
//!     .build()?;
//!
//! let run = pipeline.run_traced(&Query::new("Apple shares").unwrap()).await;
//! println!("{:?}", run.trace.pipeline().history());
//! # Ok(())
//! # }
//! ```

pub mod branch;
pub mod config;
pub mod derive;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod state;
pub mod synth;

pub use branch::{fetch_market_info, fetch_web_snippet};
pub use config::{ExecutionMode, PipelineConfig, PipelineConfigBuilder};
pub use derive::{derive_keyword, derive_ticker};
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, PipelineBuilder, TracedRun};
pub use prompts::PromptTemplates;
pub use state::{BranchState, PipelineState, RunState, RunTrace, StateLog};
pub use synth::synthesize;
