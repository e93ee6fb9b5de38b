mod config;
mod errors;
mod ledger;
mod mailer;
mod routes;
mod state;
mod submission;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::ledger::{LedgerStore, LEDGER_PATH};
use crate::mailer::SmtpMailer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("sponsor_api={}", &config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting sponsor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the SMTP mailer (validates the sender mailbox up front)
    let mailer = Arc::new(SmtpMailer::new(&config)?);
    info!("SMTP mailer initialized (relay: {})", config.smtp_host);

    // Initialize the sponsor ledger store
    let ledger = Arc::new(LedgerStore::new(LEDGER_PATH));
    info!("Sponsor ledger at {LEDGER_PATH}");

    // Build app state
    let state = AppState { mailer, ledger };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
