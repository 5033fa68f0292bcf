mod config;
mod db;
mod errors;
mod extraction;
mod jobs;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, PostingBackend};
use crate::db::create_pool;
use crate::jobs::source::{PgPostingSource, PostingSource, StaticPostingSource};
use crate::matching::catalog::SkillCatalog;
use crate::matching::SkillMatcher;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing job source)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Chronos API v{}", env!("CARGO_PKG_VERSION"));

    // Load and validate the skill catalog
    let catalog = match &config.skill_catalog_path {
        Some(path) => SkillCatalog::from_path(path)
            .with_context(|| format!("Invalid skill catalog {}", path.display()))?,
        None => SkillCatalog::embedded().context("Embedded skill catalog is invalid")?,
    };
    info!(
        version = catalog.version(),
        skills = catalog.skills().len(),
        labels = catalog.vocabulary().len(),
        triggers = catalog.trigger_count(),
        rules = catalog.roles().rules().len(),
        "Skill catalog loaded"
    );

    let matcher = Arc::new(SkillMatcher::new(catalog, config.match_mode));
    info!("Skill matcher initialized (mode: {})", config.match_mode);

    // Initialize the job catalog
    let postings: Arc<dyn PostingSource> = match &config.posting_backend {
        PostingBackend::Postgres {
            url,
            max_connections,
        } => Arc::new(PgPostingSource::new(create_pool(url, *max_connections).await?)),
        PostingBackend::JsonFile(path) => Arc::new(StaticPostingSource::from_json_file(path)?),
    };
    info!("Posting source initialized ({})", postings.backend());

    // Build app state
    let state = AppState {
        postings,
        matcher,
        config: config.clone(),
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
