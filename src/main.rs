//! todod - personal todo-tracking service
//!
//! A small HTTP daemon that keeps per-owner todo lists on local disk and
//! serves filtered, paginated listings plus aggregate statistics.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use todod::api::{self, AppContext};
use todod::attachments::DiskSink;
use todod::config::Config;
use todod::identity::TokenTable;
use todod::store::Store;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "todod", version, about = "Personal todo-tracking service")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, env = "TODOD_CONFIG", default_value = "todod.toml")]
    config: PathBuf,

    /// Override the bind address from the config.
    #[arg(long, env = "TODOD_BIND")]
    bind: Option<String>,

    /// Override the data directory from the config.
    #[arg(long, env = "TODOD_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log level is tunable via RUST_LOG.
    // Keep startup robust in CI/robot envs: ignore invalid/huge filters.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("todod=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    if config.auth.tokens.is_empty() {
        warn!("no auth tokens configured; every request will be rejected with 401");
    }

    let store = Store::open(&config.data_dir)
        .with_context(|| format!("failed to open store in {}", config.data_dir.display()))?;
    let uploads_dir = config.data_dir.join("uploads");

    let ctx = Arc::new(AppContext {
        store: Arc::new(store),
        identity: Arc::new(TokenTable::new(config.auth.tokens)),
        attachments: Arc::new(DiskSink::new(uploads_dir)),
        default_limit: config.default_limit,
    });

    api::serve(ctx, &config.bind).await?;
    Ok(())
}
