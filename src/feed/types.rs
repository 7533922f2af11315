use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One match as delivered by the odds feed, with the nested
/// bookmaker → market → outcome price structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPayload {
    pub id: String,
    pub sport_key: String,
    pub sport_title: String,
    pub home_team: String,
    pub away_team: String,
    /// Scheduled kick-off, UTC-normalized by serde from 'Z' or offset forms.
    pub commence_time: DateTime<Utc>,
    /// League name; most feeds omit it, in which case it reads "Unknown".
    #[serde(default)]
    pub league: Option<String>,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

impl MatchPayload {
    pub fn league(&self) -> &str {
        self.league.as_deref().unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmaker {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub markets: Vec<MarketOdds>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOdds {
    /// Market type, e.g. "h2h", "spreads", "totals".
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<OutcomeOdds>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeOdds {
    /// Team name or the literal "Draw".
    pub name: String,
    /// Decimal odds (> 1.0).
    pub price: f64,
}

/// An entry of the provider's sports catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sport {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub active: bool,
}
