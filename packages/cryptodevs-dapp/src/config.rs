//! dApp configuration.

use alloy_primitives::utils::parse_ether;
use alloy_primitives::{Address, U256};
use serde::Deserialize;
use std::time::Duration;

/// Configuration loaded from `cryptodevs.toml` and `CRYPTODEVS_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint of the signing agent (wallet or node holding the keys).
    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    #[serde(default = "defaults::contract_address")]
    pub contract_address: String,

    /// Chain the contract is deployed on. Any other chain is a hard failure.
    #[serde(default = "defaults::chain_id")]
    pub chain_id: u64,

    /// Human-readable name of `chain_id`, shown to the user on mismatch.
    #[serde(default = "defaults::network")]
    pub network: String,

    /// Mint fee in ether, sent with `presaleMint` and `mint`.
    #[serde(default = "defaults::mint_price_eth")]
    pub mint_price_eth: String,

    #[serde(default = "defaults::poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "defaults::confirmation_poll_ms")]
    pub confirmation_poll_ms: u64,

    #[serde(default = "defaults::request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "defaults::max_supply")]
    pub max_supply: u64,

    #[serde(default = "defaults::image_base_url")]
    pub image_base_url: String,

    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    /// Connect to the signing agent on startup, like the page does on load.
    #[serde(default = "defaults::auto_connect")]
    pub auto_connect: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: defaults::rpc_url(),
            contract_address: defaults::contract_address(),
            chain_id: defaults::chain_id(),
            network: defaults::network(),
            mint_price_eth: defaults::mint_price_eth(),
            poll_interval_secs: defaults::poll_interval_secs(),
            confirmation_poll_ms: defaults::confirmation_poll_ms(),
            request_timeout_secs: defaults::request_timeout_secs(),
            max_supply: defaults::max_supply(),
            image_base_url: defaults::image_base_url(),
            bind_address: defaults::bind_address(),
            auto_connect: defaults::auto_connect(),
        }
    }
}

impl Config {
    pub fn contract_address(&self) -> Result<Address, crate::Error> {
        self.contract_address.parse().map_err(|e| {
            crate::Error::Config(format!(
                "invalid contract_address {:?}: {e}",
                self.contract_address
            ))
        })
    }

    /// Mint fee in wei.
    pub fn mint_price(&self) -> Result<U256, crate::Error> {
        parse_ether(&self.mint_price_eth).map_err(|e| {
            crate::Error::Config(format!(
                "invalid mint_price_eth {:?}: {e}",
                self.mint_price_eth
            ))
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn confirmation_poll(&self) -> Duration {
        Duration::from_millis(self.confirmation_poll_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

mod defaults {
    pub fn rpc_url() -> String {
        "http://127.0.0.1:1248".into()
    }

    pub fn contract_address() -> String {
        "0x0000000000000000000000000000000000000000".into()
    }

    pub fn chain_id() -> u64 {
        4
    }

    pub fn network() -> String {
        "Rinkeby".into()
    }

    pub fn mint_price_eth() -> String {
        "0.01".into()
    }

    pub fn poll_interval_secs() -> u64 {
        5
    }

    pub fn confirmation_poll_ms() -> u64 {
        1_000
    }

    pub fn request_timeout_secs() -> u64 {
        10
    }

    pub fn max_supply() -> u64 {
        20
    }

    pub fn image_base_url() -> String {
        "https://raw.githubusercontent.com/LearnWeb3DAO/NFT-Collection/main/my-app/public/cryptodevs/"
            .into()
    }

    pub fn bind_address() -> String {
        "0.0.0.0:3000".into()
    }

    pub fn auto_connect() -> bool {
        true
    }
}
