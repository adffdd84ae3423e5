//! Summary synthesis

use crate::derive::complete_trimmed;
use crate::{PipelineConfig, Result};
use brief_core::{
    GatewayError, LanguageModelGateway, MarketInfoRecord, Query, SnippetResult, Summary,
};
use tracing::info;

/// Combine the query and both branch results into one summary
///
/// The prompt embeds all three inputs verbatim, so identical inputs always
/// produce an identical prompt.
pub async fn synthesize(
    llm: &dyn LanguageModelGateway,
    config: &PipelineConfig,
    query: &Query,
    web: &SnippetResult,
    market: &MarketInfoRecord,
) -> Result<Summary> {
    let prompt = config.prompts.summary_prompt(query, web, market)?;
    let text = complete_trimmed(llm, &prompt, config.summary_max_tokens).await?;
    info!(chars = text.len(), "summary generated");
    Summary::new(text).map_err(|e| GatewayError::language_model(e.to_string()).into())
}
