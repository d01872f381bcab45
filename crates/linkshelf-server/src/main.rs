//! # linkshelf-server
//!
//! HTTP service holding every caller's saved links.
//!
//! This binary provides:
//! - **REST API** (axum) for link CRUD, caller profiles and role management
//! - **Signed caller authentication**: each request carries an Ed25519 caller
//!   token; the public key is the caller's principal
//! - **SQLite persistence** through `linkshelf-store`

mod api;
mod auth;
mod config;
mod error;
mod extract;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,linkshelf_server=debug")),
        )
        .init();

    info!("Starting Linkshelf server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Open the database (runs migrations)
    // -----------------------------------------------------------------------
    let db = config.database.open()?;
    if let Some(path) = db.path() {
        info!(path = %path.display(), "Database ready");
    } else {
        tracing::warn!("Using an in-memory database; links are lost on shutdown");
    }

    let http_addr = config.http_addr;
    let app_state = AppState::new(db, config);

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
