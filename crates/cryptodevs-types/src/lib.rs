//! Shared types and pure-logic utilities for the Crypto Devs mint dApp.
//! No network dependency: everything here is a deterministic function of its inputs.

mod metadata;
mod mode;
mod state;

pub use metadata::{COLLECTION_DESCRIPTION, TokenMetadata, token_metadata};
pub use mode::{Action, Phase, UiMode, presale_has_ended};
pub use state::PresentationState;
