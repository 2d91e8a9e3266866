//! Completion-service integration
//!
//! The provider trait hides which backend produces the summary text. The
//! OpenAI implementation is used in production, the mock one drives tests and
//! offline runs. The prompt itself is a versioned asset under `prompts/`.

pub mod mock_provider;
pub mod prompts;
pub mod provider;

pub use mock_provider::MockLLMProvider;
pub use prompts::{PromptTemplate, PROMPT_VERSION, REQUIRED_SECTIONS, SUMMARY_HEADER};
pub use provider::{LLMError, LLMProvider, LLMRequest, LLMResponse, OpenAIProvider, TokenUsage};
