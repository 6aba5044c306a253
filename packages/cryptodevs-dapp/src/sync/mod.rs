//! Mint-status synchronizer.
//!
//! Owns the connection handle, reads presale state from the contract, runs the
//! write actions, and publishes a [`PresentationState`] on a watch channel for
//! the renderer. Every remote read is guarded on its own: a failure is logged
//! and the state keeps its previous value.

mod poller;

use alloy_primitives::{Address, U256};
use cryptodevs_types::{presale_has_ended, Action, PresentationState};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::agent::{Receipt, SigningAgent};
use crate::connection::Connection;
use crate::contract::{saturating_u64, MintContract, PendingTx};
use crate::metrics::METRICS;

pub const MINT_SUCCESS_NOTICE: &str = "You successfully minted a Crypto Dev!";

/// Settings the synchronizer needs, resolved from [`crate::Config`].
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub contract_address: Address,
    pub chain_id: u64,
    pub network: String,
    pub mint_price: U256,
    pub poll_interval: Duration,
    pub confirmation_poll: Duration,
}

impl SyncSettings {
    /// Zero intervals are rejected: both loops would spin without yielding time.
    pub fn from_config(config: &crate::Config) -> Result<Self, crate::Error> {
        if config.poll_interval_secs == 0 {
            return Err(crate::Error::Config("poll_interval_secs must be > 0".into()));
        }
        if config.confirmation_poll_ms == 0 {
            return Err(crate::Error::Config(
                "confirmation_poll_ms must be > 0".into(),
            ));
        }
        Ok(Self {
            contract_address: config.contract_address()?,
            chain_id: config.chain_id,
            network: config.network.clone(),
            mint_price: config.mint_price()?,
            poll_interval: config.poll_interval(),
            confirmation_poll: config.confirmation_poll(),
        })
    }
}

pub struct Synchronizer {
    agent: Arc<dyn SigningAgent>,
    settings: SyncSettings,
    /// Lazily initialised on the first successful connect. The lock also
    /// serialises connect attempts.
    connection: Mutex<Option<Arc<Connection>>>,
    state: watch::Sender<PresentationState>,
    /// Root token: cancelled on shutdown, stops both pollers.
    shutdown: CancellationToken,
    /// Child of `shutdown`; the ended-check poller cancels it once the presale ends.
    ended_poll: CancellationToken,
    pollers_started: AtomicBool,
}

impl Synchronizer {
    pub fn new(agent: Arc<dyn SigningAgent>, settings: SyncSettings) -> Arc<Self> {
        let shutdown = CancellationToken::new();
        let ended_poll = shutdown.child_token();
        let (state, _) = watch::channel(PresentationState::default());
        Arc::new(Self {
            agent,
            settings,
            connection: Mutex::new(None),
            state,
            shutdown,
            ended_poll,
            pollers_started: AtomicBool::new(false),
        })
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Current state.
    pub fn snapshot(&self) -> PresentationState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.state.subscribe()
    }

    /// Whether the presale-ended poller is still running.
    pub fn ended_poll_active(&self) -> bool {
        !self.ended_poll.is_cancelled()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Stop both pollers. Reads already in flight finish without touching state.
    pub fn shutdown(&self) {
        if !self.shutdown.is_cancelled() {
            info!("Synchronizer shutting down");
            self.shutdown.cancel();
        }
    }

    fn update(&self, f: impl FnOnce(&mut PresentationState)) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.state.send_modify(f);
    }

    async fn contract(&self) -> Result<MintContract, crate::Error> {
        let conn = self
            .connection
            .lock()
            .await
            .clone()
            .ok_or(crate::Error::NotConnected)?;
        Ok(MintContract::new(
            conn,
            self.settings.contract_address,
            self.settings.confirmation_poll,
        ))
    }

    // --- Connect ---

    /// Acquire the connection handle, then do the first refresh and start
    /// polling. Returns whether the wallet is connected afterwards.
    pub async fn connect(self: &Arc<Self>) -> bool {
        {
            let mut slot = self.connection.lock().await;
            if slot.is_some() {
                return true;
            }

            METRICS.connect_attempts.fetch_add(1, Ordering::Relaxed);
            match Connection::establish(
                Arc::clone(&self.agent),
                self.settings.chain_id,
                &self.settings.network,
            )
            .await
            {
                Ok(conn) => *slot = Some(Arc::new(conn)),
                Err(e) => {
                    METRICS.connect_failures.fetch_add(1, Ordering::Relaxed);
                    if let crate::Error::NetworkMismatch { network, .. } = &e {
                        let notice = format!("Change the network to {network}");
                        self.update(|s| s.notice = Some(notice));
                    }
                    error!(error = %e, "Wallet connect failed");
                    return false;
                }
            }
        }

        self.update(|s| {
            s.wallet_connected = true;
            s.notice = None;
        });

        if self.check_presale_started().await {
            self.check_presale_ended().await;
        }
        self.refresh_minted_count().await;

        if !self.pollers_started.swap(true, Ordering::SeqCst) {
            self.spawn_pollers();
        }
        true
    }

    // --- Reads ---

    /// Read the presale-started flag. While the presale has not started, also
    /// check whether the connected account owns the contract.
    pub async fn check_presale_started(&self) -> bool {
        METRICS.polls.fetch_add(1, Ordering::Relaxed);
        let result = match self.contract().await {
            Ok(contract) => match contract.presale_started().await {
                Ok(started) => {
                    if !started {
                        self.check_owner(&contract).await;
                    }
                    Ok(started)
                }
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(started) => {
                self.update(|s| s.presale_started = started);
                started
            }
            Err(e) => {
                METRICS.read_failures.fetch_add(1, Ordering::Relaxed);
                error!(error = %e, "presaleStarted read failed");
                false
            }
        }
    }

    /// Read the presale end time and compare it against the local clock.
    pub async fn check_presale_ended(&self) -> bool {
        METRICS.polls.fetch_add(1, Ordering::Relaxed);
        let ends_at = match self.contract().await {
            Ok(contract) => contract.presale_ended().await,
            Err(e) => Err(e),
        };

        match ends_at {
            Ok(ends_at) => {
                let ended = presale_has_ended(saturating_u64(ends_at), now_secs());
                self.update(|s| s.presale_ended = ended);
                ended
            }
            Err(e) => {
                METRICS.read_failures.fetch_add(1, Ordering::Relaxed);
                error!(error = %e, "presaleEnded read failed");
                false
            }
        }
    }

    pub async fn refresh_minted_count(&self) {
        METRICS.polls.fetch_add(1, Ordering::Relaxed);
        let count = match self.contract().await {
            Ok(contract) => contract.token_ids().await,
            Err(e) => Err(e),
        };

        match count {
            Ok(count) => {
                let count = saturating_u64(count);
                self.update(|s| s.minted_count = count);
            }
            Err(e) => {
                METRICS.read_failures.fetch_add(1, Ordering::Relaxed);
                error!(error = %e, "tokenIds read failed");
            }
        }
    }

    /// Latches `is_owner` on; never clears it.
    async fn check_owner(&self, contract: &MintContract) {
        match contract.owner().await {
            Ok(owner) if owner == contract.account() => {
                info!(owner = %owner, "Connected account owns the contract");
                self.update(|s| s.is_owner = true);
            }
            Ok(_) => {}
            Err(e) => {
                METRICS.read_failures.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "owner read failed");
            }
        }
    }

    // --- Writes ---

    /// Owner-only. Re-reads presale state once the transaction is mined.
    pub async fn start_presale(&self) -> bool {
        let outcome = self
            .run_write(Action::StartPresale, |c| async move { c.start_presale().await })
            .await;
        match outcome {
            Ok(_) => {
                self.check_presale_started().await;
                true
            }
            Err(_) => false,
        }
    }

    pub async fn presale_mint(&self) -> bool {
        let price = self.settings.mint_price;
        let outcome = self
            .run_write(Action::PresaleMint, |c| async move { c.presale_mint(price).await })
            .await;
        self.finish_mint(outcome)
    }

    pub async fn public_mint(&self) -> bool {
        let price = self.settings.mint_price;
        let outcome = self
            .run_write(Action::PublicMint, |c| async move { c.mint(price).await })
            .await;
        self.finish_mint(outcome)
    }

    fn finish_mint(&self, outcome: Result<Receipt, crate::Error>) -> bool {
        match outcome {
            Ok(_) => {
                self.update(|s| s.notice = Some(MINT_SUCCESS_NOTICE.to_string()));
                true
            }
            Err(_) => false,
        }
    }

    /// Submit through `submit`, hold `loading` until the transaction is mined,
    /// and log any failure. Loading is released on every exit path. Shutdown
    /// abandons the confirmation wait; the transaction itself stays submitted.
    async fn run_write<F, Fut>(&self, action: Action, submit: F) -> Result<Receipt, crate::Error>
    where
        F: FnOnce(MintContract) -> Fut,
        Fut: Future<Output = Result<PendingTx, crate::Error>>,
    {
        let result = async {
            let contract = self.contract().await?;
            let pending = submit(contract).await?;
            METRICS.writes_submitted.fetch_add(1, Ordering::Relaxed);
            info!(action = %action, tx_hash = %pending.hash(), "Transaction submitted");

            let _loading = LoadingGuard::enter(self);
            tokio::select! {
                outcome = pending.wait() => outcome,
                _ = self.shutdown.cancelled() => Err(crate::Error::ShuttingDown),
            }
        }
        .await;

        match &result {
            Ok(receipt) => {
                METRICS.writes_confirmed.fetch_add(1, Ordering::Relaxed);
                info!(
                    action = %action,
                    tx_hash = %receipt.tx_hash,
                    block = ?receipt.block_number,
                    "Transaction confirmed"
                );
            }
            Err(e) => {
                METRICS.writes_failed.fetch_add(1, Ordering::Relaxed);
                error!(action = %action, error = %e, "Write failed");
            }
        }
        result
    }
}

/// Sets `loading` on creation and clears it on drop.
struct LoadingGuard<'a> {
    sync: &'a Synchronizer,
}

impl<'a> LoadingGuard<'a> {
    fn enter(sync: &'a Synchronizer) -> Self {
        sync.update(|s| s.loading = true);
        Self { sync }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        // Cleared even after shutdown so no snapshot is left stuck in Loading.
        self.sync.state.send_modify(|s| s.loading = false);
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
