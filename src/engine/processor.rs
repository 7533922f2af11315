use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::models::MatchRecord;
use crate::feed::MatchPayload;

use super::extractor::{extract_odds, OddsTriple};
use super::predictor::{OutcomePredictor, PredictionResult};
use super::value::{ValueBet, ValueBetDetector};

/// How long after kick-off a match counts as in progress.
const LIVE_WINDOW_HOURS: i64 = 3;

/// A payload that cannot be turned into a match record. Rejection is
/// per-payload; batch processing continues past it.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("payload has an empty match identifier")]
    EmptyMatchId,
    #[error("payload {0} has an empty home team name")]
    EmptyHomeTeam(String),
    #[error("payload {0} has an empty away team name")]
    EmptyAwayTeam(String),
}

/// True when `commence_time` lies within the live window ending
/// `LIVE_WINDOW_HOURS` after kick-off, both bounds inclusive.
pub fn in_live_window(commence_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let elapsed = now - commence_time;
    elapsed >= Duration::zero() && elapsed <= Duration::hours(LIVE_WINDOW_HOURS)
}

/// Runs the full pipeline per incoming payload: odds extraction, outcome
/// prediction, value-bet detection and live-window classification, merged
/// into the record handed to persistence.
pub struct MatchProcessor {
    predictor: Arc<OutcomePredictor>,
    detector: ValueBetDetector,
}

impl MatchProcessor {
    pub fn new(predictor: Arc<OutcomePredictor>, detector: ValueBetDetector) -> Self {
        MatchProcessor {
            predictor,
            detector,
        }
    }

    /// Predict and scan for value on an odds triple outside the persistence
    /// path (ad-hoc "what about this match" requests use this directly).
    pub fn evaluate(
        &self,
        home_team: &str,
        away_team: &str,
        league: &str,
        odds: &OddsTriple,
    ) -> (PredictionResult, Option<ValueBet>) {
        let prediction = self.predictor.predict(home_team, away_team, league, odds);
        let value_bet = self.detector.detect(&prediction, odds);
        (prediction, value_bet)
    }

    /// Derive the match record for one payload. All derived fields are
    /// recomputed; only `created_at` and the score/status fields carry over
    /// from `existing` (those belong to the live-update path).
    pub fn process(
        &self,
        payload: &MatchPayload,
        existing: Option<&MatchRecord>,
        now: DateTime<Utc>,
    ) -> Result<MatchRecord, ProcessError> {
        if payload.id.trim().is_empty() {
            return Err(ProcessError::EmptyMatchId);
        }
        if payload.home_team.trim().is_empty() {
            return Err(ProcessError::EmptyHomeTeam(payload.id.clone()));
        }
        if payload.away_team.trim().is_empty() {
            return Err(ProcessError::EmptyAwayTeam(payload.id.clone()));
        }

        let odds = extract_odds(payload);
        if odds.is_empty() {
            debug!(
                "No h2h market posted for {} vs {}",
                payload.home_team, payload.away_team
            );
        }
        let (prediction, value_bet) = self.evaluate(
            &payload.home_team,
            &payload.away_team,
            payload.league(),
            &odds,
        );

        debug!(
            "Processed {} vs {}: winner {} ({:.3}), value bet: {}",
            payload.home_team,
            payload.away_team,
            prediction.predicted_winner.as_str(),
            prediction.confidence,
            value_bet.map_or("none".into(), |v| format!(
                "{} (edge {:.3})",
                v.side.as_str(),
                v.edge
            )),
        );

        Ok(MatchRecord {
            id: existing.and_then(|e| e.id),
            match_id: payload.id.clone(),
            sport_key: payload.sport_key.clone(),
            sport_title: payload.sport_title.clone(),
            home_team: payload.home_team.clone(),
            away_team: payload.away_team.clone(),
            commence_time: payload.commence_time,
            league: payload.league().to_string(),
            home_odds: odds.home_odds,
            away_odds: odds.away_odds,
            draw_odds: odds.draw_odds,
            predicted_winner: prediction.predicted_winner.as_str().to_string(),
            home_win_probability: prediction.home_win_probability,
            away_win_probability: prediction.away_win_probability,
            draw_probability: prediction.draw_probability,
            confidence: prediction.confidence,
            value_bet_detected: value_bet.is_some(),
            value_bet_side: value_bet.map(|v| v.side.as_str().to_string()),
            is_live: in_live_window(payload.commence_time, now),
            home_score: existing.map_or(0, |e| e.home_score),
            away_score: existing.map_or(0, |e| e.away_score),
            match_status: existing.and_then(|e| e.match_status.clone()),
            created_at: existing.map_or(now, |e| e.created_at),
            updated_at: now,
        })
    }

    /// Process a batch of payloads, skipping (and logging) rejected ones so a
    /// malformed payload never aborts the rest of the cycle.
    pub fn process_batch<F>(
        &self,
        payloads: &[MatchPayload],
        now: DateTime<Utc>,
        lookup: F,
    ) -> Vec<MatchRecord>
    where
        F: Fn(&str) -> Option<MatchRecord>,
    {
        let mut records = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let existing = lookup(&payload.id);
            match self.process(payload, existing.as_ref(), now) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping match payload: {}", e),
            }
        }
        records
    }
}
