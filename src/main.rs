//! Flight Desk - conversational flight booking assistant
//!
//! Users pick a language, type a route like `Moscow - Dubai 25.08.2025`,
//! browse matching offers and follow an affiliate link to buy one.

mod actions;
mod api;
mod catalog;
mod config;
mod directory;
mod i18n;
mod presenter;
mod route;
mod runtime;
mod session;
mod state_machine;

use api::{create_router, AppState};
use catalog::JsonFileCatalog;
use config::BotConfig;
use directory::{CachedCityDirectory, HttpCityDirectory};
use runtime::{RuntimeManager, RuntimeSettings};
use session::InMemorySessionStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flight_desk=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = BotConfig::from_env();
    tracing::info!(
        catalog = %config.catalog_path.display(),
        cities_url = %config.cities_url,
        filter = ?config.catalog_filter,
        "Configuration loaded"
    );

    let cities = CachedCityDirectory::new(
        HttpCityDirectory::new(config.cities_url.clone(), config.directory_timeout)?,
        config.directory_ttl,
    );
    let flights = JsonFileCatalog::new(config.catalog_path.clone());

    let runtime = RuntimeManager::new(
        Arc::new(cities),
        Arc::new(flights),
        Arc::new(InMemorySessionStore::new()),
        RuntimeSettings {
            catalog_filter: config.catalog_filter,
            purchase: config.purchase.clone(),
        },
    );

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(AppState::new(runtime))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Flight Desk listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
