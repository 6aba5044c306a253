//! Typed access to the deployed mint contract.

use alloy_primitives::{Address, B256, U256};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::abi;
use crate::agent::{Receipt, TxRequest};
use crate::connection::Connection;

pub struct MintContract {
    conn: Arc<Connection>,
    address: Address,
    confirmation_poll: Duration,
}

impl MintContract {
    pub fn new(conn: Arc<Connection>, address: Address, confirmation_poll: Duration) -> Self {
        Self {
            conn,
            address,
            confirmation_poll,
        }
    }

    /// Account the connection signs with.
    pub fn account(&self) -> Address {
        self.conn.account()
    }

    async fn read(&self, signature: &str) -> Result<Vec<u8>, crate::Error> {
        let out = self
            .conn
            .agent()
            .call(self.address, abi::encode_call(signature))
            .await?;
        Ok(out.to_vec())
    }

    async fn write(&self, signature: &str, value: Option<U256>) -> Result<PendingTx, crate::Error> {
        let tx = TxRequest {
            from: self.conn.account(),
            to: self.address,
            data: abi::encode_call(signature),
            value,
        };
        let hash = self.conn.agent().send_transaction(tx).await?;
        debug!(function = signature, tx_hash = %hash, "Transaction accepted by agent");
        Ok(PendingTx {
            conn: Arc::clone(&self.conn),
            hash,
            poll: self.confirmation_poll,
        })
    }

    // --- Reads ---

    pub async fn presale_started(&self) -> Result<bool, crate::Error> {
        abi::decode_bool(&self.read(abi::PRESALE_STARTED).await?)
    }

    /// Unix timestamp at which the presale ends.
    pub async fn presale_ended(&self) -> Result<U256, crate::Error> {
        abi::decode_uint(&self.read(abi::PRESALE_ENDED).await?)
    }

    /// Number of tokens minted so far.
    pub async fn token_ids(&self) -> Result<U256, crate::Error> {
        abi::decode_uint(&self.read(abi::TOKEN_IDS).await?)
    }

    pub async fn owner(&self) -> Result<Address, crate::Error> {
        abi::decode_address(&self.read(abi::OWNER).await?)
    }

    // --- Writes ---

    /// Allow-list enforcement happens in the contract.
    pub async fn presale_mint(&self, value: U256) -> Result<PendingTx, crate::Error> {
        self.write(abi::PRESALE_MINT, Some(value)).await
    }

    pub async fn mint(&self, value: U256) -> Result<PendingTx, crate::Error> {
        self.write(abi::MINT, Some(value)).await
    }

    /// Owner only.
    pub async fn start_presale(&self) -> Result<PendingTx, crate::Error> {
        self.write(abi::START_PRESALE, None).await
    }
}

/// Broadcast transaction awaiting confirmation.
pub struct PendingTx {
    conn: Arc<Connection>,
    hash: B256,
    poll: Duration,
}

impl PendingTx {
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Wait until the transaction is mined. A reverted transaction is an error.
    pub async fn wait(self) -> Result<Receipt, crate::Error> {
        loop {
            if let Some(receipt) = self.conn.agent().transaction_receipt(self.hash).await? {
                if !receipt.success {
                    return Err(crate::Error::Reverted(self.hash.to_string()));
                }
                return Ok(receipt);
            }
            tokio::time::sleep(self.poll).await;
        }
    }
}

/// Saturating conversion for counts and timestamps read as uint256.
pub fn saturating_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
