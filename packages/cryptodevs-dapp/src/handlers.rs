//! HTTP request handlers.

use crate::metrics::METRICS;
use crate::middleware::RequestId;
use crate::render::render_page;
use crate::response::{ActionResponse, HealthResponse, StateResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use cryptodevs_types::{token_metadata, Action, TokenMetadata};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

/// Token metadata. `GET /api/{token_id}`
///
/// The id is not validated; anything in the path segment is echoed into the
/// name and image URL.
pub async fn metadata(
    State(state): State<Arc<AppState>>,
    Path(token_id): Path<String>,
) -> Json<TokenMetadata> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    Json(token_metadata(&token_id, &state.config.image_base_url))
}

/// The mint page.
pub async fn page(State(state): State<Arc<AppState>>) -> Html<String> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    Html(render_page(
        &state.sync.snapshot(),
        state.config.max_supply,
        &state.config.image_base_url,
    ))
}

/// Presentation state with the derived mode.
pub async fn state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse::new(
        state.sync.snapshot(),
        state.config.max_supply,
    ))
}

pub async fn connect(
    State(state): State<Arc<AppState>>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Response, crate::Error> {
    trigger(&state, &req_id, &headers, Action::Connect)
}

pub async fn start_presale(
    State(state): State<Arc<AppState>>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Response, crate::Error> {
    trigger(&state, &req_id, &headers, Action::StartPresale)
}

pub async fn presale_mint(
    State(state): State<Arc<AppState>>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Response, crate::Error> {
    trigger(&state, &req_id, &headers, Action::PresaleMint)
}

pub async fn public_mint(
    State(state): State<Arc<AppState>>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Response, crate::Error> {
    trigger(&state, &req_id, &headers, Action::PublicMint)
}

/// Run `action` in the background if the current mode offers it.
///
/// This mirrors the page only rendering the buttons that apply: the
/// synchronizer itself does not refuse concurrent writes. Form posts from the
/// page are sent back to it with `303 See Other`, whatever the outcome.
fn trigger(
    state: &AppState,
    req_id: &RequestId,
    headers: &HeaderMap,
    action: Action,
) -> Result<Response, crate::Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let from_page = is_form_post(headers);
    let mode = state.sync.snapshot().mode();

    if !mode.allows(action) {
        warn!(req_id = %req_id.0, action = %action, ?mode, "Action not offered in current mode");
        if from_page {
            return Ok(Redirect::to("/").into_response());
        }
        return Err(crate::Error::ActionUnavailable { action, mode });
    }

    info!(req_id = %req_id.0, action = %action, "Action accepted");
    let sync = Arc::clone(&state.sync);
    tokio::spawn(async move {
        match action {
            Action::Connect => {
                sync.connect().await;
            }
            Action::StartPresale => {
                sync.start_presale().await;
            }
            Action::PresaleMint => {
                sync.presale_mint().await;
            }
            Action::PublicMint => {
                sync.public_mint().await;
            }
        }
    });

    if from_page {
        return Ok(Redirect::to("/").into_response());
    }
    Ok((
        StatusCode::ACCEPTED,
        Json(ActionResponse::accepted(action, mode)),
    )
        .into_response())
}

/// Browser form submission: url-encoded body or an HTML `Accept`.
fn is_form_post(headers: &HeaderMap) -> bool {
    let header_has = |name: header::HeaderName, needle: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains(needle))
    };
    header_has(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        || header_has(header::ACCEPT, "text/html")
}

/// Health check.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.sync.snapshot();
    let status = if state.sync.is_shut_down() {
        "stopping"
    } else if snapshot.wallet_connected {
        "ok"
    } else {
        "disconnected"
    };

    Json(HealthResponse {
        status,
        contract_address: state.sync.settings().contract_address.to_string(),
        chain_id: state.sync.settings().chain_id,
        rpc_url: state.config.rpc_url.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        requests: state.request_count.load(Ordering::Relaxed),
        wallet_connected: snapshot.wallet_connected,
        ended_poll_active: state.sync.ended_poll_active(),
    })
}

/// Prometheus metrics in text exposition format.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.sync.snapshot();
    let body = METRICS.render(
        snapshot.wallet_connected,
        snapshot.loading,
        snapshot.minted_count,
    );
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4",
        )],
        body,
    )
}
