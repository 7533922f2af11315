use serde::{Deserialize, Serialize};

use super::extractor::OddsTriple;
use super::predictor::{Outcome, PredictionResult};

/// A favorable divergence between the predicted and the market-implied
/// probability for one outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValueBet {
    pub side: Outcome,
    /// predicted probability minus market-implied probability
    pub edge: f64,
    /// expected net return per unit staked
    pub ev: f64,
    pub odds: f64,
    pub predicted_probability: f64,
    pub implied_probability: f64,
}

/// Stateless edge scanner. The only configuration is the minimum edge an
/// outcome must clear to qualify.
#[derive(Debug, Clone, Copy)]
pub struct ValueBetDetector {
    threshold: f64,
}

impl Default for ValueBetDetector {
    fn default() -> Self {
        ValueBetDetector { threshold: 0.05 }
    }
}

impl ValueBetDetector {
    pub fn new(threshold: f64) -> Self {
        ValueBetDetector { threshold }
    }

    /// Evaluate the three outcomes independently and return the single best
    /// qualifying one, or `None`. Outcomes without posted odds or with a
    /// non-positive predicted probability are skipped. Among qualifiers the
    /// maximum edge wins; exact ties resolve in home, away, draw order.
    pub fn detect(&self, prediction: &PredictionResult, odds: &OddsTriple) -> Option<ValueBet> {
        let mut best: Option<ValueBet> = None;

        for side in Outcome::ALL {
            let side_odds = match side {
                Outcome::Home => odds.home_odds,
                Outcome::Away => odds.away_odds,
                Outcome::Draw => odds.draw_odds,
            };
            let Some(side_odds) = side_odds else { continue };
            let prob = prediction.probability(side);
            if prob <= 0.0 {
                continue;
            }

            let implied = 1.0 / side_odds;
            let edge = prob - implied;
            if edge <= self.threshold {
                continue;
            }
            let ev = (side_odds - 1.0) * prob - (1.0 - prob);

            let candidate = ValueBet {
                side,
                edge,
                ev,
                odds: side_odds,
                predicted_probability: prob,
                implied_probability: implied,
            };
            // Strict comparison keeps the earlier side on exact ties.
            if best.map_or(true, |b| candidate.edge > b.edge) {
                best = Some(candidate);
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn prediction(home: f64, away: f64, draw: f64) -> PredictionResult {
        let winner = if home >= away && home >= draw {
            Outcome::Home
        } else if away >= draw {
            Outcome::Away
        } else {
            Outcome::Draw
        };
        PredictionResult {
            predicted_winner: winner,
            home_win_probability: home,
            away_win_probability: away,
            draw_probability: draw,
            confidence: home.max(away).max(draw),
        }
    }

    fn odds(home: f64, away: f64, draw: f64) -> OddsTriple {
        OddsTriple {
            home_odds: Some(home),
            away_odds: Some(away),
            draw_odds: Some(draw),
        }
    }

    #[test]
    fn detects_home_value_bet() {
        // Model says 80% home at odds 1.5: edge = 0.8 - 1/1.5 = 0.1333
        let detector = ValueBetDetector::default();
        let bet = detector
            .detect(&prediction(0.80, 0.12, 0.08), &odds(1.5, 6.0, 4.0))
            .expect("edge above threshold");
        assert_eq!(bet.side, Outcome::Home);
        assert_relative_eq!(bet.edge, 0.80 - 1.0 / 1.5, epsilon = 1e-9);
        assert_relative_eq!(bet.odds, 1.5, epsilon = 1e-12);
        assert_relative_eq!(bet.ev, 0.5 * 0.80 - 0.20, epsilon = 1e-9);
        assert_relative_eq!(bet.implied_probability, 1.0 / 1.5, epsilon = 1e-12);
    }

    #[test]
    fn no_bet_when_edges_at_or_below_threshold() {
        let detector = ValueBetDetector::default();
        // Implied: 0.50 / 0.3333 / 0.25; edges exactly 0.05 / 0.05 / below.
        let p = prediction(0.55, 1.0 / 3.0 + 0.05, 0.25);
        assert!(detector.detect(&p, &odds(2.0, 3.0, 4.0)).is_none());
    }

    #[test]
    fn picks_maximum_edge_among_qualifiers() {
        let detector = ValueBetDetector::default();
        // home edge = 0.40 - 1/4 = 0.15; draw edge = 0.35 - 1/5 = 0.15 - tie
        // broken by order; bump draw to win outright first.
        let p = prediction(0.40, 0.22, 0.38);
        let bet = detector.detect(&p, &odds(4.0, 3.0, 5.0)).expect("value bet");
        assert_eq!(bet.side, Outcome::Draw);
        assert_relative_eq!(bet.edge, 0.38 - 0.2, epsilon = 1e-9);
    }

    #[test]
    fn exact_edge_tie_prefers_home() {
        let detector = ValueBetDetector::default();
        // Both home and draw edges are exactly 0.15.
        let p = prediction(0.40, 0.25, 0.35);
        let bet = detector.detect(&p, &odds(4.0, 3.0, 5.0)).expect("value bet");
        assert_eq!(bet.side, Outcome::Home);
    }

    #[test]
    fn skips_outcomes_without_posted_odds() {
        let detector = ValueBetDetector::default();
        let p = prediction(0.80, 0.12, 0.08);
        let triple = OddsTriple {
            home_odds: None,
            away_odds: Some(6.0),
            draw_odds: Some(4.0),
        };
        assert!(detector.detect(&p, &triple).is_none());
    }

    #[test]
    fn skips_zero_probability_outcomes() {
        let detector = ValueBetDetector::default();
        let p = prediction(0.0, 0.0, 1.0);
        // Draw implied = 0.1, edge = 0.9; home/away skipped despite long odds.
        let bet = detector
            .detect(&p, &odds(100.0, 100.0, 10.0))
            .expect("value bet");
        assert_eq!(bet.side, Outcome::Draw);
    }

    #[test]
    fn custom_threshold_is_respected() {
        let detector = ValueBetDetector::new(0.2);
        let p = prediction(0.80, 0.12, 0.08);
        // Edge 0.1333 clears the default but not 0.2.
        assert!(detector.detect(&p, &odds(1.5, 6.0, 4.0)).is_none());
    }
}
