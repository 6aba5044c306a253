//! Ethereum JSON-RPC client for the signing agent.

use alloy_primitives::{Address, Bytes, B256, U64};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use crate::agent::{Receipt, SigningAgent, TxRequest};
use crate::metrics::METRICS;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// EIP-1193 "user rejected the request".
const USER_REJECTED: i64 = 4001;
/// JSON-RPC "method not found".
const METHOD_NOT_FOUND: i64 = -32601;

#[derive(Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptView {
    transaction_hash: B256,
    status: Option<U64>,
    block_number: Option<U64>,
}

impl From<ReceiptView> for Receipt {
    fn from(view: ReceiptView) -> Self {
        Self {
            tx_hash: view.transaction_hash,
            // Pre-Byzantium receipts carry no status; treat as success.
            success: view.status.map(|s| s != U64::ZERO).unwrap_or(true),
            block_number: view.block_number.map(|n| n.to::<u64>()),
        }
    }
}

/// HTTP JSON-RPC client. One endpoint, no failover, no retries.
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, crate::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| crate::Error::Config(format!("HTTP client build failed: {e}")))?;
        info!(url, "Signing agent RPC client initialized");
        Ok(Self {
            http,
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, crate::Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(id, method, "RPC request");

        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(method, e))?;

        let status = resp.status();
        if !status.is_success() {
            METRICS.rpc_errors.fetch_add(1, Ordering::Relaxed);
            return Err(crate::Error::Rpc(format!("{method}: HTTP {status}")));
        }

        let envelope: RpcEnvelope = resp
            .json()
            .await
            .map_err(|e| self.transport_error(method, e))?;

        if let Some(err) = envelope.error {
            METRICS.rpc_errors.fetch_add(1, Ordering::Relaxed);
            return Err(classify(method, err));
        }

        serde_json::from_value(envelope.result)
            .map_err(|e| crate::Error::Decode(format!("{method}: {e}")))
    }

    fn transport_error(&self, method: &str, e: reqwest::Error) -> crate::Error {
        METRICS.rpc_errors.fetch_add(1, Ordering::Relaxed);
        crate::Error::Rpc(format!("{method} via {}: {e}", self.url))
    }
}

fn classify(method: &str, err: RpcErrorObject) -> crate::Error {
    match err.code {
        USER_REJECTED => crate::Error::Rejected(err.message),
        code => crate::Error::Rpc(format!("{method}: {} (code {code})", err.message)),
    }
}

#[async_trait]
impl SigningAgent for RpcClient {
    async fn chain_id(&self) -> Result<u64, crate::Error> {
        let id: U64 = self.request("eth_chainId", json!([])).await?;
        Ok(id.to::<u64>())
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, crate::Error> {
        match self
            .request::<Vec<Address>>("eth_requestAccounts", json!([]))
            .await
        {
            Err(crate::Error::Rpc(msg)) if msg.contains(&format!("code {METHOD_NOT_FOUND}")) => {
                // Plain nodes have no permission prompt; their accounts are already exposed.
                debug!("eth_requestAccounts unsupported, falling back to eth_accounts");
                self.request("eth_accounts", json!([])).await
            }
            other => other,
        }
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, crate::Error> {
        self.request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<B256, crate::Error> {
        self.request("eth_sendTransaction", json!([tx])).await
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<Receipt>, crate::Error> {
        let view: Option<ReceiptView> = self
            .request("eth_getTransactionReceipt", json!([hash]))
            .await?;
        Ok(view.map(Receipt::from))
    }
}
