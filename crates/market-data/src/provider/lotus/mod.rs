//! Lotus JSON-RPC client.
//!
//! Talks to a Lotus full node over HTTP using JSON-RPC 2.0:
//! - `Filecoin.StateMinerInfo` for the miner's peer id
//! - `Filecoin.StateMinerPower` for quality-adjusted power
//! - `Filecoin.ClientQueryAsk` for the miner's current storage ask
//!
//! `ClientQueryAsk` dials the miner over libp2p, so it is by far the slowest
//! call and routinely times out for offline miners.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::MarketDataError;
use crate::models::{MinerInfo, MinerPower, StorageAsk};
use crate::provider::ChainClient;

const PROVIDER_ID: &str = "LOTUS";

// ============================================================================
// JSON-RPC envelope
// ============================================================================

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

// ============================================================================
// LotusClient
// ============================================================================

/// JSON-RPC client for a Lotus node.
pub struct LotusClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
    next_id: AtomicU64,
}

impl LotusClient {
    /// Create a client for `endpoint` (e.g. `http://127.0.0.1:1234/rpc/v0`).
    pub fn new(endpoint: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint: endpoint.into(),
            token: token.filter(|t| !t.is_empty()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Perform one JSON-RPC call and decode its `result`.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<Option<T>, MarketDataError> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        debug!("Lotus request: {}", method);

        let response = request
            .send()
            .await
            .map_err(|e| MarketDataError::from_request(PROVIDER_ID, e))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| MarketDataError::from_request(PROVIDER_ID, e))?;

        parse_response(method, &text)
    }
}

/// Decode a JSON-RPC response body, surfacing the error object if present.
fn parse_response<T: DeserializeOwned>(method: &str, text: &str) -> Result<Option<T>, MarketDataError> {
    let response: RpcResponse<T> =
        serde_json::from_str(text).map_err(|e| MarketDataError::InvalidResponse {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse {} response: {}", method, e),
        })?;

    if let Some(error) = response.error {
        return Err(MarketDataError::Rpc {
            method: method.to_string(),
            code: error.code,
            message: error.message,
        });
    }

    Ok(response.result)
}

#[async_trait]
impl ChainClient for LotusClient {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn miner_info(&self, miner: &str) -> Result<Option<MinerInfo>, MarketDataError> {
        self.call("Filecoin.StateMinerInfo", json!([miner, null]))
            .await
    }

    async fn miner_power(&self, miner: &str) -> Result<Option<MinerPower>, MarketDataError> {
        self.call("Filecoin.StateMinerPower", json!([miner, null]))
            .await
    }

    async fn query_ask(
        &self,
        peer_id: &str,
        miner: &str,
    ) -> Result<Option<StorageAsk>, MarketDataError> {
        self.call("Filecoin.ClientQueryAsk", json!([peer_id, miner]))
            .await
    }
}
