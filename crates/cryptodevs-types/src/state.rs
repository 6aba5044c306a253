//! Client-local presentation state.

use serde::Serialize;

use crate::mode::{Phase, UiMode};

/// Everything the page needs to render. Rebuilt from remote reads; never persisted.
///
/// `presale_ended` is taken from the ledger as-is. Nothing here enforces that
/// it implies `presale_started`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresentationState {
    pub wallet_connected: bool,
    pub presale_started: bool,
    pub presale_ended: bool,
    pub is_owner: bool,
    pub loading: bool,
    pub minted_count: u64,
    /// Last alert-level message for the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl PresentationState {
    /// Derive the UI mode. Order matters: connection, then loading, then presale phase.
    pub fn mode(&self) -> UiMode {
        if !self.wallet_connected {
            return UiMode::Disconnected;
        }
        if self.loading {
            return UiMode::Loading;
        }
        let phase = if !self.presale_started {
            Phase::PresaleNotStarted {
                can_start: self.is_owner,
            }
        } else if !self.presale_ended {
            Phase::PresaleActive
        } else {
            Phase::PresaleEnded
        };
        UiMode::Connected(phase)
    }
}
