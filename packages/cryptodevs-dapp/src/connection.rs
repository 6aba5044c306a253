//! Authorized channel to the user's signing agent.

use alloy_primitives::Address;
use std::sync::Arc;
use tracing::{info, warn};

use crate::agent::SigningAgent;

/// Created on the first successful connect and kept until shutdown.
pub struct Connection {
    agent: Arc<dyn SigningAgent>,
    chain_id: u64,
    account: Address,
}

impl Connection {
    /// Check the agent's network, then ask it for an account.
    ///
    /// A chain other than `required_chain_id` fails before the user is asked
    /// for anything.
    pub async fn establish(
        agent: Arc<dyn SigningAgent>,
        required_chain_id: u64,
        network: &str,
    ) -> Result<Self, crate::Error> {
        let chain_id = agent.chain_id().await?;
        if chain_id != required_chain_id {
            warn!(
                expected = required_chain_id,
                actual = chain_id,
                network,
                "Signing agent on wrong network"
            );
            return Err(crate::Error::NetworkMismatch {
                expected: required_chain_id,
                actual: chain_id,
                network: network.to_string(),
            });
        }

        let account = agent
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| crate::Error::Rejected("no accounts exposed".into()))?;

        info!(chain_id, account = %account, "Signing agent connected");
        Ok(Self {
            agent,
            chain_id,
            account,
        })
    }

    pub fn agent(&self) -> &dyn SigningAgent {
        self.agent.as_ref()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn account(&self) -> Address {
        self.account
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Connection({} on chain {})", self.account, self.chain_id)
    }
}
