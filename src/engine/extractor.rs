use serde::{Deserialize, Serialize};

use crate::feed::MatchPayload;

/// Head-to-head market key used by the odds feed.
const H2H_MARKET: &str = "h2h";

/// Decimal odds for the three match outcomes. A slot is `None` when no
/// bookmaker posted that outcome; present values are > 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OddsTriple {
    pub home_odds: Option<f64>,
    pub away_odds: Option<f64>,
    pub draw_odds: Option<f64>,
}

impl OddsTriple {
    pub fn is_empty(&self) -> bool {
        self.home_odds.is_none() && self.away_odds.is_none() && self.draw_odds.is_none()
    }
}

/// Collapse a payload's bookmaker → market → outcome structure into a single
/// odds triple. Every h2h market is scanned in feed order and the last posted
/// price for an outcome wins; other market types (spreads, totals) are
/// ignored. A payload without any matching outcome yields an empty triple.
pub fn extract_odds(payload: &MatchPayload) -> OddsTriple {
    let mut odds = OddsTriple::default();

    for bookmaker in &payload.bookmakers {
        for market in &bookmaker.markets {
            if market.key != H2H_MARKET {
                continue;
            }
            for outcome in &market.outcomes {
                if outcome.name == payload.home_team {
                    odds.home_odds = Some(outcome.price);
                } else if outcome.name == payload.away_team {
                    odds.away_odds = Some(outcome.price);
                } else if outcome.name == "Draw" {
                    odds.draw_odds = Some(outcome.price);
                }
            }
        }
    }

    odds
}
