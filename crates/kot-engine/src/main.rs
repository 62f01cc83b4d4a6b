//! kot-monitor: terminal kitchen dashboard.
//!
//! Polls the kitchen view, rings the bell for new orders, and accepts
//! staff commands on stdin.

use std::sync::Arc;

use tokio::io::BufReader;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use kot_client::{FileTokenStore, HttpKitchenApi, MemoryTokenStore, TokenStore};
use kot_engine::alert::{AlertSink, SilentAlert, TerminalBell};
use kot_engine::config::MonitorConfig;
use kot_engine::engine::ReconciliationEngine;
use kot_engine::{console, events, scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "kot-monitor starting");

    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/kot/monitor.toml".to_string());

    let config = MonitorConfig::from_file(&config_path)?;
    tracing::info!(
        base_url = %config.api.base_url,
        poll_interval_secs = config.poll_interval().as_secs(),
        auto_refresh = config.auto_refresh,
        "config loaded"
    );

    // ── Session token ───────────────────────────────────────────
    let tokens: Arc<dyn TokenStore> = match (std::env::var("KOT_TOKEN"), &config.api.token_path) {
        (Ok(token), _) if !token.trim().is_empty() => {
            tracing::info!("using session token from KOT_TOKEN");
            Arc::new(MemoryTokenStore::new(token.trim()))
        }
        (_, Some(path)) => {
            tracing::info!(path = %path, "using session token file");
            Arc::new(FileTokenStore::new(path))
        }
        _ => {
            tracing::warn!("no session token configured; every request will need a login");
            Arc::new(MemoryTokenStore::empty())
        }
    };

    // ── Engine ──────────────────────────────────────────────────
    let api = HttpKitchenApi::new(&config.api, tokens)?;
    let alert: Box<dyn AlertSink> = if config.bell {
        Box::new(TerminalBell)
    } else {
        Box::new(SilentAlert)
    };
    let engine = Arc::new(ReconciliationEngine::new(
        Arc::new(api),
        alert,
        config.engine_settings(),
    ));

    tokio::spawn(events::log_events(engine.subscribe()));

    let (auto_tx, auto_rx) = watch::channel(config.auto_refresh);
    let cancel = engine.cancellation_token();

    tracing::info!("kot-monitor ready");

    tokio::select! {
        () = scheduler::run(engine.clone(), config.poll_interval(), auto_rx, cancel) => {
            tracing::info!("scheduler stopped");
        }
        () = console::run(engine.clone(), auto_tx, BufReader::new(tokio::io::stdin())) => {
            tracing::info!("console closed");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    engine.shutdown();
    tracing::info!("kot-monitor stopped");
    Ok(())
}
