//! Background refresh of contract state.
//!
//! Two independent loops on the same interval:
//! - the presale-ended poller re-reads started/ended and stops itself for good
//!   once the presale has ended;
//! - the minted-count poller runs until shutdown.
//!
//! The minted-count loop never self-cancels. Whether that is a live ticker or
//! an oversight is an open question; it is kept as is.

use std::sync::Arc;
use tracing::{debug, info};

use super::Synchronizer;

impl Synchronizer {
    pub(super) fn spawn_pollers(self: &Arc<Self>) {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run_ended_poller().await });

        let this = Arc::clone(self);
        tokio::spawn(async move { this.run_minted_poller().await });

        info!(
            interval_secs = self.settings.poll_interval.as_secs_f64(),
            "Pollers started"
        );
    }

    async fn run_ended_poller(&self) {
        let token = self.ended_poll.clone();
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.settings.poll_interval) => {},
                _ = token.cancelled() => {
                    info!("Presale-ended poller shutting down");
                    return;
                }
            }

            if self.check_presale_started().await && self.check_presale_ended().await {
                info!("Presale has ended, stopping presale-ended poller");
                token.cancel();
                return;
            }
            debug!("Presale still open");
        }
    }

    async fn run_minted_poller(&self) {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.settings.poll_interval) => {},
                _ = self.shutdown.cancelled() => {
                    info!("Minted-count poller shutting down");
                    return;
                }
            }

            self.refresh_minted_count().await;
        }
    }
}
