use thiserror::Error;

/// Terminal failures of a summarization run.
///
/// The `Display` text is what the CLI prints after its `Error: ` label, so the
/// phrasing is part of the user-facing contract. Callers that need to branch on
/// the failure should match the variant instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("Invalid Ethereum address.")]
    InvalidAddress(String),

    #[error("Failed to connect to {0} testnet.")]
    ConnectivityError(String),

    #[error("Failed to fetch ABI from Etherscan.")]
    LookupError(String),

    #[error("Contract ABI not available (source code not verified).")]
    SourceUnavailable,

    #[error("Failed to decode ABI. Details: {0}")]
    DecodeError(String),

    #[error("Failed to fetch ABI. Details: {0}")]
    ResolutionError(String),

    #[error("Contract input is empty.")]
    EmptyInput,

    #[error("Generated output does not follow the required format.")]
    MalformedOutput,

    #[error("Failed to generate summary. Details: {0}")]
    GenerationError(String),
}

impl SummaryError {
    /// Stable tag for logs and machine consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            SummaryError::InvalidAddress(_) => "invalid_address",
            SummaryError::ConnectivityError(_) => "connectivity_error",
            SummaryError::LookupError(_) => "lookup_error",
            SummaryError::SourceUnavailable => "source_unavailable",
            SummaryError::DecodeError(_) => "decode_error",
            SummaryError::ResolutionError(_) => "resolution_error",
            SummaryError::EmptyInput => "empty_input",
            SummaryError::MalformedOutput => "malformed_output",
            SummaryError::GenerationError(_) => "generation_error",
        }
    }

    /// True for failures raised while turning an address into an interface.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            SummaryError::InvalidAddress(_)
                | SummaryError::ConnectivityError(_)
                | SummaryError::LookupError(_)
                | SummaryError::SourceUnavailable
                | SummaryError::DecodeError(_)
                | SummaryError::ResolutionError(_)
        )
    }
}

/// Rejections of the `--address` / `--code` selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Must provide either --address or --code.")]
    MissingInput,

    #[error("You cannot provide both --address and --code. Please choose one.")]
    ConflictingInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_cli_phrasing() {
        assert_eq!(
            SummaryError::InvalidAddress("0x12".into()).to_string(),
            "Invalid Ethereum address."
        );
        assert_eq!(
            SummaryError::ConnectivityError("Sepolia".into()).to_string(),
            "Failed to connect to Sepolia testnet."
        );
        assert_eq!(
            SummaryError::SourceUnavailable.to_string(),
            "Contract ABI not available (source code not verified)."
        );
        assert_eq!(
            SummaryError::GenerationError("timeout".into()).to_string(),
            "Failed to generate summary. Details: timeout"
        );
    }

    #[test]
    fn test_lookup_and_unverified_are_distinct() {
        let lookup = SummaryError::LookupError("NOTOK".into());
        let unverified = SummaryError::SourceUnavailable;

        assert_ne!(lookup.kind(), unverified.kind());
        assert!(lookup.is_resolution_failure());
        assert!(unverified.is_resolution_failure());
        assert!(!SummaryError::MalformedOutput.is_resolution_failure());
    }
}
