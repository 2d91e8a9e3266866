use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::SummaryError;

/// `result` text the lookup service uses for contracts without verified source.
pub const UNVERIFIED_SOURCE_RESULT: &str = "Contract source code not verified";

/// Envelope of a `module=contract&action=getabi` reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LookupResponse {
    pub status: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub result: Value,
}

impl LookupResponse {
    pub fn ok(abi_json: impl Into<String>) -> Self {
        Self {
            status: "1".to_string(),
            message: "OK".to_string(),
            result: Value::String(abi_json.into()),
        }
    }

    pub fn failed(message: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            status: "0".to_string(),
            message: message.into(),
            result: Value::String(result.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "1"
    }

    pub fn result_text(&self) -> Option<&str> {
        self.result.as_str()
    }

    pub fn is_unverified(&self) -> bool {
        self.result_text() == Some(UNVERIFIED_SOURCE_RESULT)
    }
}

#[async_trait]
pub trait AbiLookup: Send + Sync {
    /// Fetches the raw envelope. Non-success HTTP status maps to
    /// `LookupError`; transport and body failures map to `ResolutionError`.
    async fn fetch_abi(&self, address: &str) -> Result<LookupResponse, SummaryError>;
}

pub struct EtherscanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EtherscanClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(http, base_url, api_key))
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl AbiLookup for EtherscanClient {
    async fn fetch_abi(&self, address: &str) -> Result<LookupResponse, SummaryError> {
        debug!("Fetching ABI for {} from {}", address, self.base_url);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("module", "contract"),
                ("action", "getabi"),
                ("address", address),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SummaryError::ResolutionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummaryError::LookupError(format!("HTTP {}", status)));
        }

        response
            .json::<LookupResponse>()
            .await
            .map_err(|e| SummaryError::ResolutionError(e.to_string()))
    }
}
