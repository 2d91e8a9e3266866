use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::{
    chain::{AbiLookup, ChainClient, EtherscanClient, JsonRpcChainClient},
    config::SummarizerConfig,
    engine::{SummaryEngine, SummaryReport},
    error::SummaryError,
    input::{CanonicalInput, ContractInput},
    llm::{LLMProvider, OpenAIProvider},
    resolver::ContractResolver,
};

/// Address or code in, validated report out.
pub struct Summarizer {
    resolver: ContractResolver,
    engine: SummaryEngine,
}

impl Summarizer {
    pub fn new(resolver: ContractResolver, engine: SummaryEngine) -> Self {
        Self { resolver, engine }
    }

    /// Wires the production clients. Missing API keys are passed on as empty
    /// strings and surface as authentication failures.
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        let timeout = config.global.timeout();

        let chain: Arc<dyn ChainClient> = Arc::new(
            JsonRpcChainClient::new(config.chain.endpoint(), timeout)
                .context("Failed to build chain endpoint client")?,
        );
        let lookup: Arc<dyn AbiLookup> = Arc::new(
            EtherscanClient::new(
                config.lookup.base_url.clone(),
                config.lookup.api_key.clone().unwrap_or_default(),
                timeout,
            )
            .context("Failed to build ABI lookup client")?,
        );
        let provider: Arc<dyn LLMProvider> = Arc::new(
            OpenAIProvider::new(
                config.provider.api_key.clone().unwrap_or_default(),
                config.provider.model.clone(),
                config.provider.base_url.as_deref(),
                timeout,
            )
            .context("Failed to build completion client")?
            .with_max_retries(config.global.retry_attempts),
        );

        let resolver =
            ContractResolver::new(chain, lookup).with_network(config.chain.network.clone());
        let engine = SummaryEngine::new(provider)
            .with_sampling(config.global.temperature, config.global.max_tokens);

        Ok(Self::new(resolver, engine))
    }

    /// Formatted ABI listing for addresses, the source text itself for code.
    pub async fn canonical_input(
        &self,
        input: &ContractInput,
    ) -> Result<CanonicalInput, SummaryError> {
        match input {
            ContractInput::Address(address) => self.resolver.resolve_canonical(address).await,
            ContractInput::Code(code) => CanonicalInput::new(code.clone()),
        }
    }

    pub async fn summarize(&self, input: &ContractInput) -> Result<SummaryReport, SummaryError> {
        let canonical = self.canonical_input(input).await?;
        info!("Canonical input ready ({} bytes)", canonical.as_str().len());
        self.engine.summarize(&canonical).await
    }
}
