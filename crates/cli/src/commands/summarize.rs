use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info};

use solscribe_summarizer::{
    ContractInput, InvocationRequest, SummarizerConfig, Summarizer, SummaryReport,
};

pub async fn execute(request: InvocationRequest) -> Result<SummaryReport> {
    let start = Instant::now();

    let input = request
        .into_input()
        .context("Failed to read code file")?;

    let config = SummarizerConfig::load()?;
    debug!(
        "Using model {} against {} ({})",
        config.provider.model, config.lookup.base_url, config.chain.network
    );

    let summarizer = Summarizer::from_config(&config)?;

    match &input {
        ContractInput::Address(address) => info!("Summarizing deployed contract {}", address),
        ContractInput::Code(code) => info!("Summarizing {} bytes of source", code.len()),
    }

    let report = summarizer.summarize(&input).await?;

    info!("Finished in {:.2}s", start.elapsed().as_secs_f64());
    Ok(report)
}
