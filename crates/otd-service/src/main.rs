mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod render;
mod routes;
mod store;

use common::clock::SystemClock;
use config::Config;
use routes::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use store::HistoryStore;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "otd_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OnThisDay service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    // Load the history dataset
    let store = match &config.data_path {
        Some(path) => {
            info!("Loading history dataset from {}", path);
            HistoryStore::load_from_path(path)
        }
        None => {
            info!("Loading embedded history dataset");
            HistoryStore::load_embedded()
        }
    }
    .map_err(|e| {
        error!("Failed to load history dataset: {}", e);
        e
    })?;

    info!("History dataset ready: {} dates", store.len());

    // Parse bind address before moving config
    let bind_address = config.bind_address.clone();

    // Create application state
    let state = Arc::new(AppState {
        store: Arc::new(store),
        config,
        clock: Arc::new(SystemClock),
    });

    // Build application routes
    let app = routes::build_routes(state);

    // Parse bind address
    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("OnThisDay service listening on {}", addr);

    // Start server with ConnectInfo support (the rate limiter needs
    // peer addresses)
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
