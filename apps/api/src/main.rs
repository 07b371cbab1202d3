mod admin;
mod aggregator;
mod applications;
mod auth;
mod config;
mod db;
mod errors;
mod jobs;
mod models;
mod routes;
mod saved_jobs;
mod state;
mod storage;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::aggregator::feeds::build_feeds;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_PKG_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Board API v{}", env!("CARGO_PKG_VERSION"));
    if config.uses_default_secret() {
        warn!("SECRET_KEY is not set; session cookies are signed with the insecure default");
    }

    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    info!("Serving uploads from {}", config.upload_dir.display());

    let feeds = build_feeds(&config)?;
    info!(
        "{} external feeds configured (timeout {:?})",
        feeds.len(),
        config.feed_timeout
    );

    let state = AppState::new(db, config.clone(), feeds);

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
