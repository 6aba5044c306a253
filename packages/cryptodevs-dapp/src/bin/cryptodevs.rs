//! Crypto Devs dApp binary.

use cryptodevs_dapp::{create_router, AppState, Config, RpcClient};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Crypto Devs dApp");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration, fix CRYPTODEVS_* env vars or cryptodevs.toml");
            std::process::exit(1);
        }
    };

    info!(
        contract = %config.contract_address,
        rpc = %config.rpc_url,
        chain_id = config.chain_id,
        network = %config.network,
        "Configuration loaded"
    );

    let agent = Arc::new(RpcClient::new(&config.rpc_url, config.request_timeout())?);
    let bind_address = config.bind_address.clone();
    let auto_connect = config.auto_connect;
    let state = Arc::new(AppState::new(config, agent)?);

    if auto_connect {
        let sync = Arc::clone(&state.sync);
        tokio::spawn(async move {
            if !sync.connect().await {
                warn!("Initial wallet connect failed; waiting for POST /connect");
            }
        });
    }

    let app = create_router(state.clone());

    info!(address = %bind_address, "Listening");

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.sync.shutdown();
    info!("dApp shut down gracefully");
    Ok(())
}

/// `cryptodevs.toml` is optional and every field has a default, so any error
/// here is a malformed value.
fn load_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name("cryptodevs").required(false))
        .add_source(config::Environment::with_prefix("CRYPTODEVS"))
        .build()?
        .try_deserialize()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
