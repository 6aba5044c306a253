//! # Crypto Devs dApp
//!
//! Mint front end for the Crypto Devs NFT collection. Connects to a signing
//! agent over JSON-RPC, keeps presale state in sync with the contract, and
//! serves the mint page plus the per-token metadata API.
//!
//! ## Endpoints
//! - `GET /api/{token_id}` - Token metadata
//! - `GET /` - Mint page
//! - `GET /state` - Presentation state and derived mode
//! - `POST /connect`, `/start-presale`, `/presale-mint`, `/mint` - User actions
//! - `GET /health`, `GET /metrics`

pub mod abi;
pub mod agent;
pub mod config;
pub mod connection;
pub mod contract;
mod error;
mod handlers;
pub mod metrics;
mod middleware;
pub mod render;
mod response;
mod router;
pub mod rpc;
mod state;
pub mod sync;

pub use agent::{Receipt, SigningAgent, TxRequest};
pub use config::Config;
pub use error::Error;
pub use router::create as create_router;
pub use rpc::RpcClient;
pub use state::AppState;
pub use sync::{SyncSettings, Synchronizer};
