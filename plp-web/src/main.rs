//! plp-web - Playlist Poetry web service
//!
//! Serves the playlist generation API: free-form text in, an ordered list
//! of matched tracks out. The track search and cache wiring is resolved
//! from configuration at startup.

use anyhow::Result;
use clap::Parser;
use plp_common::config::Settings;
use plp_engine::{PlaylistCache, PlaylistOrchestrator, SpotifyResolver, SqliteCache};
use plp_web::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "plp-web", about = "Playlist Poetry web service")]
struct Args {
    /// Config file path (default: platform config directory)
    #[arg(long, env = "PLP_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:5000
    #[arg(long)]
    listen: Option<String>,

    /// SQLite cache database path (omit for no persistent cache)
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = Settings::resolve(args.config.as_deref());
    if let Some(listen) = args.listen {
        settings.listen = listen;
    }
    if let Some(database) = args.database {
        settings.database = Some(database);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .init();

    // Build identification immediately after tracing init
    info!(
        "Starting Playlist Poetry web service (plp-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Search endpoint: {}", settings.search_base_url);

    let cache: Option<Arc<dyn PlaylistCache>> = match &settings.database {
        Some(db_path) => {
            info!("Cache database: {}", db_path.display());
            Some(Arc::new(SqliteCache::open(db_path).await?))
        }
        None => {
            info!("No cache database configured; every lookup goes to the search API");
            None
        }
    };

    let resolver = Arc::new(SpotifyResolver::new(
        settings.search_base_url.clone(),
        settings.request_timeout,
    ));
    let orchestrator = PlaylistOrchestrator::new(resolver, cache)
        .with_limits(settings.max_concurrent_sentences, settings.gather_timeout);

    let state = AppState::new(orchestrator);
    let app = plp_web::build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.listen).await?;
    info!("Listening on http://{}", settings.listen);
    info!("Health check: http://{}/health", settings.listen);

    axum::serve(listener, app).await?;

    Ok(())
}
