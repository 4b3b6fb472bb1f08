//! Jisseki Bot - LINE activity report assistant
//!
//! A webhook service that walks youth-association members through
//! registration and a five-step practice report wizard, persisting
//! profiles and reports to SQLite.

mod api;
mod db;
mod line;
mod menu;
mod runtime;
mod wizard;

use api::{create_router, AppState};
use db::Database;
use line::{LineClient, LineConfig};
use runtime::DatabaseStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jisseki_bot=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let db_path = std::env::var("JISSEKI_DB_PATH").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        format!("{home}/.jisseki-bot/jisseki.db")
    });

    let port: u16 = std::env::var("JISSEKI_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    tracing::info!(path = %db_path, "Opening database");
    let db = Database::open(&db_path)?;

    // LINE reply client
    let line_config = LineConfig::from_env().unwrap_or_else(|| {
        tracing::warn!("LINE_CHANNEL_ACCESS_TOKEN not set. Replies will be rejected by LINE.");
        LineConfig::new("")
    });
    let client = LineClient::new(line_config);

    // Create application state
    let state = AppState::new(DatabaseStore::new(db), client);

    // Create router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Jisseki bot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
