//! wardrobe-server - personal wardrobe catalogue and outfit builder
//!
//! Serves the clothing catalogue, saved outfits and a cached fashion news
//! feed over HTTP/JSON on localhost.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use wardrobe_common::config::{load_toml_config, ConfigOverrides, WardrobeConfig};
use wardrobe_common::db::{init_database, seed_if_empty, AssetResolver};
use wardrobe_common::news::{NewsCache, NewsClient, NewsFeed};
use wardrobe_server::{build_router, logging, AppState};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "wardrobe-server", version, about = "Wardrobe catalogue and outfit server")]
struct Args {
    /// Path to config.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Root folder for the database and assets (also WARDROBE_ROOT_FOLDER)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Database file (defaults to <root>/wardrobe.db)
    #[arg(long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Directory holding the bundled seed images
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "WARDROBE_PORT")]
    port: Option<u16>,

    /// Do not insert the sample catalogue into an empty database
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = logging::init();
    info!("Starting wardrobe-server v{}", env!("CARGO_PKG_VERSION"));

    let toml_config = load_toml_config(args.config.as_deref())?;
    let overrides = ConfigOverrides {
        root_folder: args.root_folder,
        database_path: args.database,
        assets_dir: args.assets_dir,
        port: args.port,
        no_seed: args.no_seed,
    };
    let config = WardrobeConfig::resolve(toml_config, &overrides);

    if let Err(e) = logging::apply_config_level(&log_filter, &config.log_level) {
        warn!("Ignoring logging.level {:?}: {}", config.log_level, e);
    }

    info!("Root folder: {}", config.root_folder.display());

    config.ensure_root_folder()?;

    info!("Database path: {}", config.database_path.display());
    let pool = match init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    if config.seed_on_first_run {
        let resolver = AssetResolver::new(config.assets_dir.clone());
        let inserted = seed_if_empty(&pool, &resolver).await?;
        if inserted > 0 {
            info!("Seeded {} sample clothing items", inserted);
        }
    }

    if config.news.api_key.is_none() {
        info!("No news API key configured; fashion news requests will fail until one is set");
    }
    let client = NewsClient::new(config.news.clone())?;
    let feed = NewsFeed::new(client, NewsCache::new(pool.clone()));

    let state = AppState::new(pool, feed);
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("wardrobe-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
