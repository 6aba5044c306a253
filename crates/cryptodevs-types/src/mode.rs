//! UI modes and the actions each one offers.

use serde::Serialize;

/// Presale phase while a wallet is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// `can_start` is set when the connected account owns the contract.
    PresaleNotStarted { can_start: bool },
    PresaleActive,
    PresaleEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UiMode {
    Disconnected,
    /// A write is waiting for confirmation.
    Loading,
    Connected(Phase),
}

/// User-triggerable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Connect,
    StartPresale,
    PresaleMint,
    PublicMint,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::StartPresale => "start_presale",
            Self::PresaleMint => "presale_mint",
            Self::PublicMint => "public_mint",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl UiMode {
    /// Actions the page offers in this mode. At most one.
    pub fn actions(self) -> &'static [Action] {
        match self {
            Self::Disconnected => &[Action::Connect],
            Self::Loading => &[],
            Self::Connected(Phase::PresaleNotStarted { can_start: true }) => {
                &[Action::StartPresale]
            }
            Self::Connected(Phase::PresaleNotStarted { can_start: false }) => &[],
            Self::Connected(Phase::PresaleActive) => &[Action::PresaleMint],
            Self::Connected(Phase::PresaleEnded) => &[Action::PublicMint],
        }
    }

    pub fn allows(self, action: Action) -> bool {
        self.actions().contains(&action)
    }
}

/// Compare the on-chain presale end (unix seconds) against local wall-clock time.
///
/// No skew correction: the presale counts as ended once `ends_at` is strictly
/// in the past.
pub fn presale_has_ended(ends_at: u64, now_secs: u64) -> bool {
    ends_at < now_secs
}
