//! Signing-agent abstraction.
//!
//! The agent is whatever holds the user's keys: a browser wallet bridge, Frame,
//! or a node with unlocked accounts. This crate only asks it to read chain
//! state, expose an account, and sign+broadcast transactions on request.

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use serde::Serialize;

/// Transaction the agent should sign and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: B256,
    pub success: bool,
    pub block_number: Option<u64>,
}

#[async_trait]
pub trait SigningAgent: Send + Sync {
    /// Chain the agent is currently pointed at.
    async fn chain_id(&self) -> Result<u64, crate::Error>;

    /// Ask the user to expose accounts. Prompts on first use.
    async fn request_accounts(&self) -> Result<Vec<Address>, crate::Error>;

    /// Read-only contract call against the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, crate::Error>;

    /// Sign and broadcast. Returns once the agent has accepted the transaction.
    async fn send_transaction(&self, tx: TxRequest) -> Result<B256, crate::Error>;

    /// `None` while the transaction is still pending.
    async fn transaction_receipt(&self, hash: B256) -> Result<Option<Receipt>, crate::Error>;
}
