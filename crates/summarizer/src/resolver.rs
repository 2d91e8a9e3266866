use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    abi::{AbiFormatter, ContractInterface},
    chain::{address::is_address, AbiLookup, ChainClient, LookupResponse},
    error::SummaryError,
    input::CanonicalInput,
};

/// Turns a deployed contract address into its decoded interface.
///
/// A single pass with no retries: syntax check, chain liveness probe, ABI
/// lookup, decode. The probe and the lookup hit unrelated services, so a
/// passing probe says nothing about whether the lookup will succeed.
pub struct ContractResolver {
    chain: Arc<dyn ChainClient>,
    lookup: Arc<dyn AbiLookup>,
    network: String,
}

impl ContractResolver {
    pub fn new(chain: Arc<dyn ChainClient>, lookup: Arc<dyn AbiLookup>) -> Self {
        Self {
            chain,
            lookup,
            network: "Sepolia".to_string(),
        }
    }

    /// Network name used in connectivity failures.
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    pub async fn resolve(&self, address: &str) -> Result<ContractInterface, SummaryError> {
        if !is_address(address) {
            return Err(SummaryError::InvalidAddress(address.to_string()));
        }

        if !self.chain.is_connected().await {
            return Err(SummaryError::ConnectivityError(self.network.clone()));
        }
        debug!("Chain endpoint {} reachable", self.chain.endpoint());

        let response = self.lookup.fetch_abi(address).await?;
        let interface = Self::decode_lookup(response)?;

        info!(
            "Resolved {} to {} ABI entries ({} functions)",
            address,
            interface.entries().len(),
            interface.functions().count()
        );
        Ok(interface)
    }

    pub async fn resolve_canonical(&self, address: &str) -> Result<CanonicalInput, SummaryError> {
        let interface = self.resolve(address).await?;
        CanonicalInput::new(AbiFormatter::format(&interface))
    }

    /// The unverified-source marker wins over the status field, since the
    /// lookup service reports it with a failing status.
    pub fn decode_lookup(response: LookupResponse) -> Result<ContractInterface, SummaryError> {
        if response.is_unverified() {
            return Err(SummaryError::SourceUnavailable);
        }

        if !response.is_success() {
            let detail = match response.result_text() {
                Some(result) if !result.is_empty() => format!("{}: {}", response.message, result),
                _ => response.message.clone(),
            };
            return Err(SummaryError::LookupError(detail));
        }

        let payload = response.result_text().ok_or_else(|| {
            SummaryError::DecodeError(format!("expected a JSON string, got {}", response.result))
        })?;

        ContractInterface::from_json(payload).map_err(|e| SummaryError::DecodeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    struct FakeChain {
        connected: bool,
        probes: AtomicUsize,
    }

    impl FakeChain {
        fn new(connected: bool) -> Arc<Self> {
            Arc::new(Self {
                connected,
                probes: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ChainClient for FakeChain {
        async fn is_connected(&self) -> bool {
            self.probes.fetch_add(1, Ordering::SeqCst);
            self.connected
        }

        fn endpoint(&self) -> &str {
            "fake://chain"
        }
    }

    struct FakeLookup {
        reply: Result<LookupResponse, SummaryError>,
        fetches: AtomicUsize,
    }

    impl FakeLookup {
        fn new(reply: Result<LookupResponse, SummaryError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                fetches: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AbiLookup for FakeLookup {
        async fn fetch_abi(&self, _address: &str) -> Result<LookupResponse, SummaryError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn resolver(chain: &Arc<FakeChain>, lookup: &Arc<FakeLookup>) -> ContractResolver {
        ContractResolver::new(chain.clone(), lookup.clone())
    }

    #[tokio::test]
    async fn test_invalid_address_skips_network() {
        let chain = FakeChain::new(true);
        let lookup = FakeLookup::new(Ok(LookupResponse::ok("[]")));

        for bad in ["0x123", "5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", "vitalik.eth"] {
            let err = resolver(&chain, &lookup).resolve(bad).await.unwrap_err();
            assert_eq!(err, SummaryError::InvalidAddress(bad.to_string()));
        }

        assert_eq!(chain.probes.load(Ordering::SeqCst), 0);
        assert_eq!(lookup.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unreachable_chain_stops_before_lookup() {
        let chain = FakeChain::new(false);
        let lookup = FakeLookup::new(Ok(LookupResponse::ok("[]")));

        let err = resolver(&chain, &lookup)
            .with_network("Holesky")
            .resolve(ADDRESS)
            .await
            .unwrap_err();

        assert_eq!(err, SummaryError::ConnectivityError("Holesky".into()));
        assert_eq!(err.to_string(), "Failed to connect to Holesky testnet.");
        assert_eq!(lookup.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unverified_source_is_distinct() {
        let chain = FakeChain::new(true);
        let lookup = FakeLookup::new(Ok(LookupResponse::failed(
            "NOTOK",
            "Contract source code not verified",
        )));

        let err = resolver(&chain, &lookup).resolve(ADDRESS).await.unwrap_err();
        assert_eq!(err, SummaryError::SourceUnavailable);
    }

    #[tokio::test]
    async fn test_failed_status_is_lookup_error() {
        let chain = FakeChain::new(true);
        let lookup = FakeLookup::new(Ok(LookupResponse::failed("NOTOK", "Invalid API Key")));

        let err = resolver(&chain, &lookup).resolve(ADDRESS).await.unwrap_err();
        assert_eq!(err, SummaryError::LookupError("NOTOK: Invalid API Key".into()));
    }

    #[tokio::test]
    async fn test_lookup_transport_errors_propagate_unchanged() {
        let chain = FakeChain::new(true);
        let lookup = FakeLookup::new(Err(SummaryError::ResolutionError(
            "connection reset".into(),
        )));

        let err = resolver(&chain, &lookup).resolve(ADDRESS).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch ABI. Details: connection reset");
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_decode_error() {
        let chain = FakeChain::new(true);
        let lookup = FakeLookup::new(Ok(LookupResponse::ok("[{\"type\":")));

        let err = resolver(&chain, &lookup).resolve(ADDRESS).await.unwrap_err();
        assert!(matches!(err, SummaryError::DecodeError(_)));
    }

    #[tokio::test]
    async fn test_resolves_to_formatted_listing() {
        let chain = FakeChain::new(true);
        let lookup = FakeLookup::new(Ok(LookupResponse::ok(
            r#"[{"type":"event","name":"Minted","inputs":[]},{"type":"function","name":"mint","inputs":[{"type":"uint256","name":"amount"},{"type":"address","name":""}]}]"#,
        )));

        let canonical = resolver(&chain, &lookup)
            .resolve_canonical(ADDRESS)
            .await
            .unwrap();

        assert_eq!(canonical.as_str(), "mint(uint256 amount, address)");
        assert_eq!(chain.probes.load(Ordering::SeqCst), 1);
        assert_eq!(lookup.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_non_string_result_is_decode_error() {
        let response = LookupResponse {
            status: "1".into(),
            message: "OK".into(),
            result: serde_json::json!([{"type": "function", "name": "f"}]),
        };

        assert!(matches!(
            ContractResolver::decode_lookup(response),
            Err(SummaryError::DecodeError(_))
        ));
    }
}
