use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Ceiling on the pause between rate-limited attempts.
const MAX_RATE_LIMIT_WAIT_SECS: u64 = 30;

fn rate_limit_wait(attempt: u32) -> Duration {
    Duration::from_secs(2_u64.saturating_pow(attempt).min(MAX_RATE_LIMIT_WAIT_SECS))
}

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

impl LLMError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LLMError::RateLimitExceeded(_) | LLMError::NetworkError(_) | LLMError::Timeout(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct LLMRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn analyze(&self, request: LLMRequest) -> Result<LLMResponse, LLMError>;

    fn model_name(&self) -> &str;

    /// Context window of the model, in tokens.
    fn max_tokens(&self) -> usize;

    fn estimate_tokens(&self, text: &str) -> usize {
        text.len() / 4
    }
}

pub struct OpenAIProvider {
    client: Client<OpenAIConfig>,
    model: String,
    timeout_seconds: u64,
    max_retries: u32,
}

impl OpenAIProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base_url) = base_url {
            config = config.with_api_base(base_url);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        // The client's own 429 backoff runs for up to 15 minutes by default.
        // Disable it so `max_retries` is the only retry budget.
        let no_backoff = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        let client = Client::with_config(config)
            .with_http_client(http)
            .with_backoff(no_backoff);

        Ok(Self {
            client,
            model: model.into(),
            timeout_seconds: timeout.as_secs(),
            max_retries: 3,
        })
    }

    /// Total attempts per request, including the first. Zero is treated as one.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    fn build_request(&self, request: &LLMRequest) -> Result<CreateChatCompletionRequest, OpenAIError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system_prompt.clone())
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user_prompt.clone())
                .build()?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()
    }

    fn classify(&self, error: OpenAIError) -> LLMError {
        match error {
            OpenAIError::Reqwest(e) if e.is_timeout() => LLMError::Timeout(self.timeout_seconds),
            OpenAIError::Reqwest(e) => LLMError::NetworkError(e.to_string()),
            other => {
                let message = other.to_string();
                if message.to_lowercase().contains("rate limit") {
                    LLMError::RateLimitExceeded(message)
                } else {
                    LLMError::ApiError(message)
                }
            }
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn analyze(&self, request: LLMRequest) -> Result<LLMResponse, LLMError> {
        debug!("Sending request to OpenAI model: {}", self.model);
        debug!(
            "Temperature: {}, Max tokens: {}",
            request.temperature, request.max_tokens
        );

        let api_request = self
            .build_request(&request)
            .map_err(|e| LLMError::ApiError(e.to_string()))?;

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            debug!("API call attempt {}/{}", attempt, self.max_retries);

            match self.client.chat().create(api_request.clone()).await {
                Ok(response) => break response,
                Err(e) => {
                    let error = self.classify(e);
                    warn!("OpenAI API error (attempt {}): {}", attempt, error);

                    if attempt >= self.max_retries || !error.is_retryable() {
                        return Err(error);
                    }

                    let wait_time = match error {
                        LLMError::RateLimitExceeded(_) => rate_limit_wait(attempt),
                        _ => Duration::from_millis(100 * u64::from(attempt)),
                    };
                    tokio::time::sleep(wait_time).await;
                }
            }
        };

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LLMError::InvalidResponse("No content in response".to_string()))?;

        let usage = response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        debug!("Received response with {} tokens", usage.total_tokens);

        Ok(LLMResponse {
            content,
            model: response.model,
            usage,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> usize {
        match self.model.as_str() {
            "gpt-4o" | "gpt-4o-mini" | "gpt-4-turbo" => 128_000,
            "gpt-4" => 8192,
            "gpt-3.5-turbo" => 16385,
            _ => 4096,
        }
    }
}
