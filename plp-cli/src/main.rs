//! plp - Generate Spotify playlists from messages on the command line
//!
//! Can be used for one-off invocations or as an interactive shell.
//! Caching is optional: in-memory for an interactive session, SQLite for
//! persistence across runs.

use anyhow::{anyhow, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use plp_common::config::Settings;
use plp_engine::{
    spotify_uri_to_url, MemoryCache, Playlist, PlaylistCache, PlaylistOrchestrator,
    SpotifyResolver, SqliteCache,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CacheKind {
    None,
    Memory,
    Sqlite,
}

#[derive(Debug, Parser)]
#[command(name = "plp", about = "Generate a Spotify playlist from the provided message")]
#[command(group(ArgGroup::new("input").required(true).args(["message", "interactive"])))]
struct Args {
    /// The message you want turned into a playlist
    #[arg(short, long)]
    message: Option<String>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Increase output verbosity (track names next to the links)
    #[arg(short, long)]
    verbose: bool,

    /// Print Spotify web URLs instead of URIs
    #[arg(short, long)]
    url: bool,

    /// Cache backend (default: memory when interactive, otherwise none)
    #[arg(long, value_enum)]
    cache: Option<CacheKind>,

    /// SQLite cache database path (with --cache sqlite)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Config file path (default: platform config directory)
    #[arg(long, env = "PLP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::resolve(args.config.as_deref());

    // Keep stdout clean for the playlist; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Caching a single one-off message is useless, so the default backend
    // depends on the mode
    let cache_kind = args.cache.unwrap_or(if args.interactive {
        CacheKind::Memory
    } else {
        CacheKind::None
    });
    let cache: Option<Arc<dyn PlaylistCache>> = match cache_kind {
        CacheKind::None => None,
        CacheKind::Memory => Some(Arc::new(MemoryCache::new())),
        CacheKind::Sqlite => {
            let db_path = args
                .database
                .clone()
                .or_else(|| settings.database.clone())
                .ok_or_else(|| {
                    anyhow!("--cache sqlite needs --database or a configured database path")
                })?;
            Some(Arc::new(SqliteCache::open(&db_path).await?))
        }
    };

    let resolver = Arc::new(SpotifyResolver::new(
        settings.search_base_url.clone(),
        settings.request_timeout,
    ));
    let orchestrator = PlaylistOrchestrator::new(resolver, cache)
        .with_limits(settings.max_concurrent_sentences, settings.gather_timeout);

    match args.message {
        Some(message) => {
            let playlist = generate(&orchestrator, &message).await?;
            print_playlist(&playlist, args.verbose, args.url);
        }
        None => run_interactive(&orchestrator, args.url).await?,
    }

    Ok(())
}

async fn generate(orchestrator: &PlaylistOrchestrator, message: &str) -> Result<Playlist> {
    orchestrator
        .generate(message)
        .await
        .map_err(|e| anyhow!("{e}! Exiting..."))
}

async fn run_interactive(orchestrator: &PlaylistOrchestrator, as_url: bool) -> Result<()> {
    println!("Welcome to Playlist Poetry interactive mode.");
    println!("Enter a message to generate a playlist.");
    println!("Type :exit to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case(":exit") {
            break;
        }

        println!("Processing...");
        let playlist = generate(orchestrator, message).await?;
        // Interactive output always carries the track names
        print_playlist(&playlist, true, as_url);
    }
    Ok(())
}

fn print_playlist(playlist: &Playlist, named: bool, as_url: bool) {
    if playlist.items.is_empty() {
        println!("Not able to generate playlist!");
        return;
    }
    if !playlist.complete && named {
        println!("Only partial playlist available:");
    }
    for item in &playlist.items {
        let link = if as_url {
            spotify_uri_to_url(&item.uri).unwrap_or_else(|| item.uri.clone())
        } else {
            item.uri.clone()
        };
        if named {
            println!("{}: {}", item.name, link);
        } else {
            println!("{}", link);
        }
    }
}
