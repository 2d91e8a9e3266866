use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    error::SummaryError,
    input::CanonicalInput,
    llm::{
        prompts::{PromptTemplate, SUMMARY_HEADER},
        provider::{LLMProvider, LLMRequest},
    },
};

pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Model answer that passed the format check. Not parsed any further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReport {
    text: String,
}

impl SummaryReport {
    /// Trims `raw` and requires the `## Contract Summary` heading somewhere in it.
    pub fn parse(raw: &str) -> Result<Self, SummaryError> {
        let text = raw.trim();
        if !text.contains(SUMMARY_HEADER) {
            return Err(SummaryError::MalformedOutput);
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section_offset(name).is_some()
    }

    /// Byte offset of the `## {name}` heading.
    pub fn section_offset(&self, name: &str) -> Option<usize> {
        self.text.find(&format!("## {}", name))
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub struct SummaryEngine {
    provider: Arc<dyn LLMProvider>,
    template: PromptTemplate,
    temperature: f32,
    max_tokens: u32,
}

impl SummaryEngine {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            template: PromptTemplate::contract_summary(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn build_request(&self, input: &CanonicalInput) -> LLMRequest {
        let (system_prompt, user_prompt) = self.template.render(input.as_str());
        LLMRequest {
            system_prompt,
            user_prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    pub async fn summarize(&self, input: &CanonicalInput) -> Result<SummaryReport, SummaryError> {
        let start = Instant::now();
        let request = self.build_request(input);

        let estimated = self.provider.estimate_tokens(&request.user_prompt);
        if estimated + self.max_tokens as usize > self.provider.max_tokens() {
            warn!(
                "Prompt of ~{} tokens may exceed the {} token window of {}",
                estimated,
                self.provider.max_tokens(),
                self.provider.model_name()
            );
        }

        debug!(
            "Summarizing with prompt {} on {}",
            self.template.version,
            self.provider.model_name()
        );

        let response = self
            .provider
            .analyze(request)
            .await
            .map_err(|e| SummaryError::GenerationError(e.to_string()))?;

        info!(
            "Summary generated in {:?} ({} tokens)",
            start.elapsed(),
            response.usage.total_tokens
        );

        SummaryReport::parse(&response.content).map_err(|e| {
            warn!("Model output lacks the '{}' heading", SUMMARY_HEADER);
            debug!("Rejected output: {}", response.content);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{mock_provider::MockLLMProvider, REQUIRED_SECTIONS};

    fn input(text: &str) -> CanonicalInput {
        CanonicalInput::new(text).unwrap()
    }

    #[tokio::test]
    async fn test_request_uses_persona_and_sampling() {
        let provider = Arc::new(MockLLMProvider::new());
        let engine = SummaryEngine::new(provider.clone());

        engine.summarize(&input("pause()\nunpause()")).await.unwrap();

        let request = provider.last_request().unwrap();
        assert_eq!(request.system_prompt, "You are a Solidity contract analyst.");
        assert!(request.user_prompt.contains("**Input**:\npause()\nunpause()\n"));
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_tokens, 1500);
    }

    #[tokio::test]
    async fn test_report_is_trimmed() {
        let provider = Arc::new(
            MockLLMProvider::new().with_default_response("\n\n## Contract Summary\nA vault.\n  "),
        );

        let report = SummaryEngine::new(provider)
            .summarize(&input("deposit()"))
            .await
            .unwrap();

        assert_eq!(report.as_str(), "## Contract Summary\nA vault.");
    }

    #[tokio::test]
    async fn test_missing_header_is_malformed() {
        let provider = Arc::new(MockLLMProvider::new().with_default_response(
            "This contract is a token with owner-controlled minting. It looks fine.",
        ));

        let err = SummaryEngine::new(provider)
            .summarize(&input("mint(address to, uint256 amount)"))
            .await
            .unwrap_err();

        assert_eq!(err, SummaryError::MalformedOutput);
    }

    #[tokio::test]
    async fn test_provider_failure_is_generation_error() {
        let provider = Arc::new(MockLLMProvider::failing());

        let err = SummaryEngine::new(provider)
            .summarize(&input("pause()"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SummaryError::GenerationError("API error: Mock provider configured to fail".into())
        );
    }

    #[tokio::test]
    async fn test_custom_sampling_and_template() {
        let provider = Arc::new(MockLLMProvider::new());
        let template = PromptTemplate::new("terse")
            .with_system_prompt("Be brief.")
            .with_user_template("Summarize {contract_input}");

        SummaryEngine::new(provider.clone())
            .with_sampling(0.0, 400)
            .with_template(template)
            .summarize(&input("ERC721"))
            .await
            .unwrap();

        let request = provider.last_request().unwrap();
        assert_eq!(request.user_prompt, "Summarize ERC721");
        assert_eq!(request.max_tokens, 400);
    }

    #[test]
    fn test_report_sections() {
        let report = SummaryReport::parse(
            "## Contract Summary\nx\n\n## Key Functions\n- f\n\n## Permissions\n- none\n\n## Security Patterns\n- none",
        )
        .unwrap();

        let offsets: Vec<usize> = REQUIRED_SECTIONS
            .iter()
            .map(|s| report.section_offset(s).unwrap())
            .collect();
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        assert!(!report.has_section("Gas Usage"));
    }
}
