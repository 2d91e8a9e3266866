//! Solscribe - plain-English summaries of Solidity contracts
//!
//! A contract arrives either as a deployed address or as source text. Addresses
//! are resolved through a chain endpoint and an ABI lookup service into a
//! function-signature listing; source text is used as-is. The resulting
//! canonical text is fed to a fixed few-shot prompt and the model's answer is
//! accepted only if it follows the expected section layout.

pub mod abi;
pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod llm;
pub mod pipeline;
pub mod resolver;

pub use abi::{AbiFormatter, ContractInterface};
pub use config::SummarizerConfig;
pub use engine::{SummaryEngine, SummaryReport};
pub use error::{RequestError, SummaryError};
pub use input::{CanonicalInput, ContractInput, InvocationRequest};
pub use pipeline::Summarizer;
pub use resolver::ContractResolver;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
