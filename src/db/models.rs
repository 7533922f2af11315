use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scanned match with its derived prediction, value-bet verdict and
/// live-window flag. Upserted keyed by `match_id` on every refresh cycle:
/// all derived fields are overwritten, while `created_at` and the
/// score/status fields survive (the latter belong to the live-update path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: Option<i64>,
    /// External match identifier from the odds feed
    pub match_id: String,
    pub sport_key: String,
    pub sport_title: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
    pub league: String,

    // Odds data
    pub home_odds: Option<f64>,
    pub away_odds: Option<f64>,
    pub draw_odds: Option<f64>,

    // Model prediction
    /// "home" | "away" | "draw"
    pub predicted_winner: String,
    pub home_win_probability: f64,
    pub away_win_probability: f64,
    pub draw_probability: f64,
    pub confidence: f64,
    pub value_bet_detected: bool,
    pub value_bet_side: Option<String>,

    // Live data (scores/status owned by the live-update path)
    pub is_live: bool,
    pub home_score: i32,
    pub away_score: i32,
    pub match_status: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
