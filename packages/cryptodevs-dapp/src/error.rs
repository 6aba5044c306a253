//! Error types for the dApp.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cryptodevs_types::{Action, UiMode};
use std::fmt;

use crate::response::ActionResponse;

/// dApp error type.
#[derive(Debug, Clone)]
pub enum Error {
    /// Configuration error.
    Config(String),
    /// The signing agent is on the wrong chain. Fatal to the connect attempt.
    NetworkMismatch {
        expected: u64,
        actual: u64,
        network: String,
    },
    /// The user (or agent) refused to expose an account or sign.
    Rejected(String),
    /// JSON-RPC transport or agent-side failure.
    Rpc(String),
    /// Transaction was mined but reverted.
    Reverted(String),
    /// Contract return data did not match the expected ABI shape.
    Decode(String),
    /// No connection handle yet.
    NotConnected,
    /// The synchronizer stopped while the operation was still waiting.
    ShuttingDown,
    /// The current mode does not offer `action`.
    ActionUnavailable { action: Action, mode: UiMode },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::NetworkMismatch {
                expected,
                actual,
                network,
            } => write!(
                f,
                "network mismatch: expected chain {expected} ({network}), agent is on {actual}"
            ),
            Error::Rejected(msg) => write!(f, "rejected by signing agent: {msg}"),
            Error::Rpc(msg) => write!(f, "rpc error: {msg}"),
            Error::Reverted(tx) => write!(f, "transaction {tx} reverted"),
            Error::Decode(msg) => write!(f, "decode error: {msg}"),
            Error::NotConnected => write!(f, "wallet not connected"),
            Error::ShuttingDown => write!(f, "shutting down"),
            Error::ActionUnavailable { action, mode } => {
                write!(f, "{action} is not available in mode {mode:?}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::ActionUnavailable { action, mode } => {
                return (
                    StatusCode::CONFLICT,
                    Json(ActionResponse::unavailable(*action, *mode)),
                )
                    .into_response();
            }
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NetworkMismatch { .. } | Error::NotConnected => StatusCode::CONFLICT,
            Error::Rejected(_) => StatusCode::FORBIDDEN,
            Error::Rpc(_) | Error::Reverted(_) | Error::Decode(_) => StatusCode::BAD_GATEWAY,
            Error::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string()
        });
        (status, Json(body)).into_response()
    }
}
