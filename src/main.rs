//! Realty Desk Server
//!
//! Run with: cargo run --bin realty-desk
//!
//! # Configuration
//!
//! Reads `config.toml` from the user config dir, `/etc/realty-desk/` or the
//! working directory, then applies `REALTY_DESK_*` environment overrides
//! (see `realty-desk-cli init-config` for the full list).
//! `RUST_LOG` takes precedence over the configured log level.

use realty_desk::analytics::SnapshotBuilder;
use realty_desk::api::{serve, AppState};
use realty_desk::auth::{ClerkVerifier, SessionGate};
use realty_desk::config::{Config, LoggingConfig};
use realty_desk::content::{ContentStore, SanityClient};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = Config::load_default();

    init_tracing(&loaded.config.logging);

    tracing::info!("Starting Realty Desk v{}", env!("CARGO_PKG_VERSION"));
    loaded.log_outcome();
    let config = loaded.config;

    // Content store
    let store = Arc::new(SanityClient::new(config.content.clone())?);
    tracing::info!(
        "Content store: project {} dataset {}",
        config.content.project_id,
        config.content.dataset
    );

    match store.ping().await {
        Ok(()) => tracing::info!("Content store connection verified"),
        Err(e) => tracing::warn!("Content store not reachable: {} (analytics will fail)", e),
    }

    let builder = Arc::new(SnapshotBuilder::new(store));

    // Sessions
    let session = if config.auth.enabled {
        tracing::info!("Session verification enabled: {}", config.auth.resolved_jwks_url());
        SessionGate::new(
            Arc::new(ClerkVerifier::new(&config.auth)),
            config.auth.resolved_sign_in_url(),
        )
    } else {
        tracing::warn!("Session verification disabled (dashboard renders empty analytics)");
        SessionGate::disabled()
    };

    let state = AppState::new(builder, config.server, config.auth, session);

    serve(state).await?;

    tracing::info!("Realty Desk stopped");
    Ok(())
}

/// Install the global subscriber in the configured format
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter_directive().into());

    if logging.is_json() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
