//! Response types for the HTTP API.

use cryptodevs_types::{Action, PresentationState, UiMode};
use serde::Serialize;

/// Response from the action endpoints.
#[derive(Serialize)]
pub struct ActionResponse {
    pub accepted: bool,
    pub action: Action,
    pub mode: UiMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    pub fn accepted(action: Action, mode: UiMode) -> Self {
        Self {
            accepted: true,
            action,
            mode,
            error: None,
        }
    }

    pub fn unavailable(action: Action, mode: UiMode) -> Self {
        Self {
            accepted: false,
            action,
            mode,
            error: Some(format!("{action} is not available in the current mode")),
        }
    }
}

/// Presentation state plus everything derived from it.
#[derive(Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub state: PresentationState,
    pub mode: UiMode,
    pub actions: &'static [Action],
    pub max_supply: u64,
}

impl StateResponse {
    pub fn new(state: PresentationState, max_supply: u64) -> Self {
        let mode = state.mode();
        Self {
            state,
            mode,
            actions: mode.actions(),
            max_supply,
        }
    }
}

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub contract_address: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub uptime_secs: u64,
    pub requests: u64,
    pub wallet_connected: bool,
    pub ended_poll_active: bool,
}
