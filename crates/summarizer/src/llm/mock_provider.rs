use crate::llm::{
    prompts::PromptTemplate,
    provider::{LLMError, LLMProvider, LLMRequest, LLMResponse, TokenUsage},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Offline stand-in for the completion service.
///
/// Answers with the first canned response whose pattern occurs in the user
/// prompt, else with the default response (the worked example answer from the
/// bundled template). Every request is recorded for inspection.
pub struct MockLLMProvider {
    responses: Vec<(String, String)>,
    default_response: String,
    call_count: AtomicUsize,
    last_request: Mutex<Option<LLMRequest>>,
    should_fail: bool,
}

impl Default for MockLLMProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLLMProvider {
    pub fn new() -> Self {
        let default_response = PromptTemplate::contract_summary()
            .example_output()
            .unwrap_or_default()
            .to_string();

        Self {
            responses: Vec::new(),
            default_response,
            call_count: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            should_fail: false,
        }
    }

    pub fn failing() -> Self {
        let mut provider = Self::new();
        provider.should_fail = true;
        provider
    }

    pub fn with_response(mut self, pattern: &str, content: impl Into<String>) -> Self {
        self.responses.push((pattern.to_string(), content.into()));
        self
    }

    pub fn with_default_response(mut self, content: impl Into<String>) -> Self {
        self.default_response = content.into();
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<LLMRequest> {
        self.last_request.lock().clone()
    }

    fn generate_response(&self, request: &LLMRequest) -> String {
        self.responses
            .iter()
            .find(|(pattern, _)| request.user_prompt.contains(pattern.as_str()))
            .map(|(_, content)| content.clone())
            .unwrap_or_else(|| self.default_response.clone())
    }
}

#[async_trait]
impl LLMProvider for MockLLMProvider {
    async fn analyze(&self, request: LLMRequest) -> Result<LLMResponse, LLMError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());

        if self.should_fail {
            return Err(LLMError::ApiError(
                "Mock provider configured to fail".to_string(),
            ));
        }

        let content = self.generate_response(&request);
        let prompt_tokens = self.estimate_tokens(&request.user_prompt) as u32;
        let completion_tokens = self.estimate_tokens(&content) as u32;

        Ok(LLMResponse {
            content,
            model: "mock-model".to_string(),
            usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
        })
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    fn max_tokens(&self) -> usize {
        128_000
    }
}
