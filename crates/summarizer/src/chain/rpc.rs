use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Best-effort liveness probe; never fails, only reports.
    async fn is_connected(&self) -> bool;

    fn endpoint(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Probes an Ethereum JSON-RPC node with `web3_clientVersion`.
pub struct JsonRpcChainClient {
    http: reqwest::Client,
    url: String,
}

impl JsonRpcChainClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(http, url))
    }

    pub fn with_http_client(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ChainClient for JsonRpcChainClient {
    async fn is_connected(&self) -> bool {
        let body = json!({
            "jsonrpc": "2.0",
            "method": "web3_clientVersion",
            "params": [],
            "id": 1,
        });

        let response = match self.http.post(&self.url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Chain endpoint unreachable: {}", e);
                return false;
            }
        };

        if !response.status().is_success() {
            warn!("Chain endpoint answered HTTP {}", response.status());
            return false;
        }

        match response.json::<RpcEnvelope>().await {
            Ok(RpcEnvelope {
                result: Some(version),
                error: None,
            }) => {
                debug!("Chain endpoint client version: {}", version);
                true
            }
            Ok(envelope) => {
                warn!("Chain endpoint returned an error: {:?}", envelope.error);
                false
            }
            Err(e) => {
                warn!("Chain endpoint returned an unreadable body: {}", e);
                false
            }
        }
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::net::TcpListener;

    fn localhost_binding_permitted() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client_for(server: &Server) -> JsonRpcChainClient {
        JsonRpcChainClient::new(server.url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_connected_when_client_version_returned() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .match_body(Matcher::Regex(r#""method"\s*:\s*"web3_clientVersion""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"Geth/v1.13.5"}"#)
            .create_async()
            .await;

        assert!(client_for(&server).is_connected().await);
    }

    #[tokio::test]
    async fn test_disconnected_on_rpc_error() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"invalid project id"}}"#)
            .create_async()
            .await;

        assert!(!client_for(&server).is_connected().await);
    }

    #[tokio::test]
    async fn test_disconnected_on_http_failure() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(401)
            .create_async()
            .await;

        assert!(!client_for(&server).is_connected().await);
    }

    #[tokio::test]
    async fn test_disconnected_when_nothing_listens() {
        let client =
            JsonRpcChainClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        assert!(!client.is_connected().await);
        assert_eq!(client.endpoint(), "http://127.0.0.1:9");
    }
}
