mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod models;
mod pdf;
mod routes;
mod session;
mod speech;
mod state;
mod store;
mod viz;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::speech::Narrator;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on a missing API credential)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{crate_target}={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite: pool, schema, reference data
    let db = create_pool(&config.database_path).await?;
    db::init_schema(&db).await?;
    store::seed_job_market(&db).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Question narration (degrades to unavailable when disabled)
    let narrator = Narrator::new(config.enable_voice);
    info!(
        "Narration {}, PDF extraction {}",
        if narrator.is_enabled() { "enabled" } else { "disabled" },
        if pdf::is_available() { "available" } else { "unavailable" }
    );

    // Build app state
    let state = AppState {
        db,
        llm,
        narrator,
        config: config.clone(),
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };

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
