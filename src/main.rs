//! ARBSCAN: three-way sports odds arbitrage scanner
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the odds source into the engine, and serves the scan over HTTP
//! until Ctrl+C.

use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use arbscan::config;
use arbscan::dashboard;
use arbscan::dashboard::routes::ServerState;
use arbscan::data::bundled::BundledSource;
use arbscan::data::fallback::FallbackSource;
use arbscan::data::odds_api::OddsApiClient;
use arbscan::data::OddsSource;
use arbscan::strategy::ArbitrageEngine;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Initialise structured logging before config so load warnings show up
    init_logging();

    let cfg = config::AppConfig::load_or_default(CONFIG_PATH)?;

    info!(
        bankroll = %cfg.engine.bankroll,
        sport = %cfg.odds_api.sport,
        regions = %cfg.odds_api.regions,
        fallback = %cfg.odds_api.fallback_path,
        "ARBSCAN starting up"
    );

    // -- Odds source -----------------------------------------------------

    let live = match cfg.odds_api.api_key() {
        Some(key) => {
            info!(sport = %cfg.odds_api.sport, "Live odds enabled");
            Some(OddsApiClient::new(key, &cfg.odds_api)?)
        }
        None => {
            warn!(
                env = %cfg.odds_api.api_key_env,
                "No odds API key configured, serving bundled data only"
            );
            None
        }
    };

    let source: Arc<dyn OddsSource> = Arc::new(FallbackSource::new(
        live,
        cfg.odds_api.snapshot_path(),
        BundledSource::new(PathBuf::from(&cfg.odds_api.fallback_path)),
    ));

    // -- Engine + server -------------------------------------------------

    let engine = ArbitrageEngine::new(cfg.engine.bankroll)?;
    let state = Arc::new(ServerState::new(engine, source));

    let host: IpAddr = cfg
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server.host: {}", cfg.server.host))?;
    let addr = SocketAddr::new(host, cfg.server.resolved_port());

    dashboard::serve(state, &cfg.server.static_dir, addr, shutdown_signal()).await?;

    info!("ARBSCAN shut down cleanly.");
    Ok(())
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("arbscan=info,tower_http=info"));

    let json_logging = std::env::var("ARBSCAN_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
