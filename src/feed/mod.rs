pub mod odds_api;
pub mod types;

pub use odds_api::TheOddsApi;
pub use types::{Bookmaker, MarketOdds, MatchPayload, OutcomeOdds, Sport};

use anyhow::Result;
use async_trait::async_trait;

/// Trait that every odds-feed provider must implement.
#[async_trait]
pub trait OddsFeed: Send + Sync {
    /// Fetch the upcoming/in-play match payloads for one sport key.
    async fn fetch_odds(&self, sport_key: &str) -> Result<Vec<MatchPayload>>;

    /// Fetch the catalogue of sports the provider covers.
    async fn fetch_sports(&self) -> Result<Vec<Sport>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
