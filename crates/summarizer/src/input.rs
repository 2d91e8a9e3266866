use std::fmt;
use std::io;
use std::path::Path;

use crate::error::{RequestError, SummaryError};

/// Text handed verbatim to the prompt template. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalInput(String);

impl CanonicalInput {
    pub fn new(text: impl Into<String>) -> Result<Self, SummaryError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SummaryError::EmptyInput);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated contract to summarize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractInput {
    Address(String),
    Code(String),
}

/// Exactly one of `--address` / `--code`, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationRequest {
    Address(String),
    /// Literal source text or a path to a file holding it.
    Code(String),
}

impl InvocationRequest {
    /// Empty values count as absent. Has no side effects.
    pub fn from_flags(
        address: Option<String>,
        code: Option<String>,
    ) -> Result<Self, RequestError> {
        let address = address.filter(|a| !a.is_empty());
        let code = code.filter(|c| !c.is_empty());

        match (address, code) {
            (None, None) => Err(RequestError::MissingInput),
            (Some(_), Some(_)) => Err(RequestError::ConflictingInput),
            (Some(address), None) => Ok(InvocationRequest::Address(address)),
            (None, Some(code)) => Ok(InvocationRequest::Code(code)),
        }
    }

    /// Reads the code file when `Code` names one.
    pub fn into_input(self) -> io::Result<ContractInput> {
        match self {
            InvocationRequest::Address(address) => Ok(ContractInput::Address(address)),
            InvocationRequest::Code(code) => load_code(&code).map(ContractInput::Code),
        }
    }
}

/// Contents of `value` when it names an existing file, otherwise `value` itself.
pub fn load_code(value: &str) -> io::Result<String> {
    let path = Path::new(value);
    if path.is_file() {
        std::fs::read_to_string(path)
    } else {
        Ok(value.to_string())
    }
}
