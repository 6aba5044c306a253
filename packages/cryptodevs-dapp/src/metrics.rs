//! Lock-free counters rendered in Prometheus text format.

use std::sync::atomic::{AtomicU64, Ordering};

pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    // --- Connection ---
    pub connect_attempts: AtomicU64,
    pub connect_failures: AtomicU64,

    // --- Reads ---
    pub polls: AtomicU64,
    pub read_failures: AtomicU64,

    // --- Writes ---
    pub writes_submitted: AtomicU64,
    pub writes_confirmed: AtomicU64,
    pub writes_failed: AtomicU64,

    // --- RPC ---
    pub rpc_errors: AtomicU64,
}

impl Metrics {
    const fn new() -> Self {
        Self {
            connect_attempts: AtomicU64::new(0),
            connect_failures: AtomicU64::new(0),
            polls: AtomicU64::new(0),
            read_failures: AtomicU64::new(0),
            writes_submitted: AtomicU64::new(0),
            writes_confirmed: AtomicU64::new(0),
            writes_failed: AtomicU64::new(0),
            rpc_errors: AtomicU64::new(0),
        }
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self, wallet_connected: bool, loading: bool, minted_count: u64) -> String {
        let connect_attempts = self.connect_attempts.load(Ordering::Relaxed);
        let connect_failures = self.connect_failures.load(Ordering::Relaxed);
        let polls = self.polls.load(Ordering::Relaxed);
        let read_failures = self.read_failures.load(Ordering::Relaxed);
        let writes_submitted = self.writes_submitted.load(Ordering::Relaxed);
        let writes_confirmed = self.writes_confirmed.load(Ordering::Relaxed);
        let writes_failed = self.writes_failed.load(Ordering::Relaxed);
        let rpc_errors = self.rpc_errors.load(Ordering::Relaxed);
        let wallet_connected = u8::from(wallet_connected);
        let loading = u8::from(loading);

        format!(
            "\
# HELP cryptodevs_connect_attempts_total Signing agent connect attempts.\n\
# TYPE cryptodevs_connect_attempts_total counter\n\
cryptodevs_connect_attempts_total {connect_attempts}\n\
# HELP cryptodevs_connect_failures_total Failed connect attempts (network mismatch, rejection, transport).\n\
# TYPE cryptodevs_connect_failures_total counter\n\
cryptodevs_connect_failures_total {connect_failures}\n\
# HELP cryptodevs_polls_total Contract state reads issued.\n\
# TYPE cryptodevs_polls_total counter\n\
cryptodevs_polls_total {polls}\n\
# HELP cryptodevs_read_failures_total Contract reads that failed and fell back to defaults.\n\
# TYPE cryptodevs_read_failures_total counter\n\
cryptodevs_read_failures_total {read_failures}\n\
# HELP cryptodevs_writes_submitted_total Transactions accepted by the signing agent.\n\
# TYPE cryptodevs_writes_submitted_total counter\n\
cryptodevs_writes_submitted_total {writes_submitted}\n\
# HELP cryptodevs_writes_confirmed_total Transactions mined successfully.\n\
# TYPE cryptodevs_writes_confirmed_total counter\n\
cryptodevs_writes_confirmed_total {writes_confirmed}\n\
# HELP cryptodevs_writes_failed_total Write actions that were rejected, reverted or lost.\n\
# TYPE cryptodevs_writes_failed_total counter\n\
cryptodevs_writes_failed_total {writes_failed}\n\
# HELP cryptodevs_rpc_errors_total JSON-RPC errors.\n\
# TYPE cryptodevs_rpc_errors_total counter\n\
cryptodevs_rpc_errors_total {rpc_errors}\n\
# HELP cryptodevs_wallet_connected Whether a signing agent is connected.\n\
# TYPE cryptodevs_wallet_connected gauge\n\
cryptodevs_wallet_connected {wallet_connected}\n\
# HELP cryptodevs_loading Whether a write is awaiting confirmation.\n\
# TYPE cryptodevs_loading gauge\n\
cryptodevs_loading {loading}\n\
# HELP cryptodevs_minted_count Tokens minted according to the last read.\n\
# TYPE cryptodevs_minted_count gauge\n\
cryptodevs_minted_count {minted_count}\n"
        )
    }
}
