//! Prompt templates for the three language model calls
//!
//! Templates use MiniJinja syntax. The keyword and ticker templates see a
//! `query` variable; the summary template additionally sees `web_result` and
//! `stock_info` (the market record as compact JSON).

use crate::{PipelineError, Result};
use brief_core::{MarketInfoRecord, Query, SnippetResult};
use minijinja::{Environment, context};

/// Default instruction for keyword derivation
pub const DEFAULT_KEYWORD_TEMPLATE: &str = "Generate a search keyword for the query: {{ query }}";

/// Default instruction for ticker derivation
pub const DEFAULT_TICKER_TEMPLATE: &str =
    "Extract the stock ticker code from the query: {{ query }}";

/// Default instruction for the summary
pub const DEFAULT_SUMMARY_TEMPLATE: &str = "Summarize the following web result with stock info for the query: {{ query }}\nWeb Result: {{ web_result }}\nStock Info: {{ stock_info }}";

/// The instruction templates used by a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    keyword: String,
    ticker: String,
    summary: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD_TEMPLATE.to_string(),
            ticker: DEFAULT_TICKER_TEMPLATE.to_string(),
            summary: DEFAULT_SUMMARY_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Replace the keyword template
    pub fn with_keyword(mut self, template: impl Into<String>) -> Self {
        self.keyword = template.into();
        self
    }

    /// Replace the ticker template
    pub fn with_ticker(mut self, template: impl Into<String>) -> Self {
        self.ticker = template.into();
        self
    }

    /// Replace the summary template
    pub fn with_summary(mut self, template: impl Into<String>) -> Self {
        self.summary = template.into();
        self
    }

    /// Check that every template compiles
    pub fn validate(&self) -> Result<()> {
        let env = Environment::new();
        for (name, source) in self.named() {
            env.template_from_str(source)
                .map_err(|e| PipelineError::Prompt {
                    name,
                    detail: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Instruction asking for a search keyword
    pub fn keyword_prompt(&self, query: &Query) -> Result<String> {
        render("keyword", &self.keyword, context! { query => query.as_str() })
    }

    /// Instruction asking for a ticker symbol
    pub fn ticker_prompt(&self, query: &Query) -> Result<String> {
        render("ticker", &self.ticker, context! { query => query.as_str() })
    }

    /// Instruction asking for the final summary
    pub fn summary_prompt(
        &self,
        query: &Query,
        web: &SnippetResult,
        market: &MarketInfoRecord,
    ) -> Result<String> {
        render(
            "summary",
            &self.summary,
            context! {
                query => query.as_str(),
                web_result => web.as_str(),
                stock_info => market.to_string(),
            },
        )
    }

    fn named(&self) -> [(&'static str, &str); 3] {
        [
            ("keyword", self.keyword.as_str()),
            ("ticker", self.ticker.as_str()),
            ("summary", self.summary.as_str()),
        ]
    }
}

fn render(name: &'static str, source: &str, ctx: minijinja::Value) -> Result<String> {
    Environment::new()
        .render_str(source, ctx)
        .map_err(|e| PipelineError::Prompt {
            name,
            detail: e.to_string(),
        })
}
