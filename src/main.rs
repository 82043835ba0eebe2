//! Hostel Manager Backend Server

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hostel_api::config::Config;
use hostel_api::store::JsonFileStore;
use hostel_api::{build_router, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let store = JsonFileStore::new(&config.data_dir).expect("failed to create data directory");
    let state = AppState::new(Arc::new(store), config.bootstrap.clone());

    if let Err(err) = state.registry.ensure_bootstrap().await {
        tracing::error!("failed to seed bootstrap admin: {err}");
    }
    match state.registry.sweep_expired().await {
        Ok(0) => {}
        Ok(count) => tracing::info!("startup sweep expired {count} account(s)"),
        Err(err) => tracing::warn!("startup expiry sweep failed: {err}"),
    }

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Hostel Manager API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
