use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

mod config;
mod dashboard;
mod db;
mod engine;
mod feed;
mod scanner;

use config::Config;
use dashboard::AppState;
use db::Database;
use engine::{MatchProcessor, OutcomePredictor, ValueBetDetector};
use feed::{OddsFeed, TheOddsApi};
use scanner::Scanner;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    if config.odds_api_key.is_none() {
        warn!("No ODDS_API_KEY configured – odds fetches will be rejected by the provider");
    }

    // Open database
    let db = Database::open(&config.database_path)?;
    info!("Database opened: {}", config.database_path);

    // Load the prediction model, training a fresh one on first run. This is
    // the only blocking cold-start step.
    let predictor = Arc::new(OutcomePredictor::load_or_train(Path::new(
        &config.model_path,
    ))?);

    let detector = ValueBetDetector::new(config.edge_threshold);
    let processor = MatchProcessor::new(predictor, detector);

    let feed: Arc<dyn OddsFeed> = Arc::new(TheOddsApi::new(
        config.odds_api_key.as_deref(),
        Some(&config.odds_api_url),
        &config.regions,
    )?);
    info!(
        "Odds feed: {} (sports: {:?}, edge threshold: {:.3})",
        feed.name(),
        config.sport_keys(),
        config.edge_threshold
    );

    let scanner = Arc::new(Scanner::new(db, feed, processor, config.sport_keys()));

    // Initial scan so the dashboard is not empty on first load
    if let Err(e) = scanner.refresh_odds().await {
        error!("Initial odds refresh failed: {}", e);
    }

    // Periodic odds refresh
    {
        let scanner = scanner.clone();
        let interval = Duration::from_secs(config.update_interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            ticker.tick().await; // skip the immediate first tick
            loop {
                ticker.tick().await;
                if let Err(e) = scanner.refresh_odds().await {
                    error!("Odds refresh failed: {}", e);
                }
            }
        });
    }

    // Periodic live-window reclassification
    {
        let scanner = scanner.clone();
        let interval = Duration::from_secs(config.live_refresh_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let Err(e) = scanner.refresh_live_flags() {
                    error!("Live-window refresh failed: {}", e);
                }
            }
        });
    }

    // Run dashboard server (blocks until shutdown)
    let app = dashboard::router(AppState {
        scanner: scanner.clone(),
    });
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
