//! Application state shared across handlers.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::agent::SigningAgent;
use crate::config::Config;
use crate::sync::{SyncSettings, Synchronizer};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub sync: Arc<Synchronizer>,
    pub start_time: Instant,
    pub request_count: AtomicU64,
}

impl AppState {
    /// Resolve settings from `config` and build the synchronizer around `agent`.
    pub fn new(config: Config, agent: Arc<dyn SigningAgent>) -> Result<Self, crate::Error> {
        let settings = SyncSettings::from_config(&config)?;
        info!(
            contract = %settings.contract_address,
            chain_id = settings.chain_id,
            mint_price_wei = %settings.mint_price,
            "Synchronizer configured"
        );

        Ok(Self {
            sync: Synchronizer::new(agent, settings),
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        })
    }
}
