//! Match outcome prediction.
//!
//! The predictor owns a persisted model artifact: a bagged-tree classifier,
//! a feature scaler, and two append-only label encoders (teams, leagues).
//! On startup the artifact is loaded from disk; when that fails the model is
//! trained once on synthetic fixtures and persisted. After construction the
//! predictor stays ready for the process lifetime; only the encoder
//! vocabularies keep growing as unseen team/league names arrive.
//!
//! Inference never fails from the caller's perspective: any model-path error
//! degrades to a deterministic odds-implied fallback distribution.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::extractor::OddsTriple;
use super::forest::{Forest, ForestParams, NUM_CLASSES};

/// Home advantage added to the home side's strength in synthetic fixtures.
const HOME_ADVANTAGE: f64 = 0.1;
/// Bookmaker overround applied to synthetic odds.
const BOOKMAKER_MARGIN: f64 = 1.05;
/// Synthetic odds for outcomes with probability at or below this floor.
const LONGSHOT_PROB_FLOOR: f64 = 0.05;
const LONGSHOT_ODDS: f64 = 10.0;
const MAX_SYNTHETIC_ODDS: f64 = 20.0;
/// Naive strength estimate used when an odds value is absent.
const DEFAULT_STRENGTH: f64 = 0.3;

const SYNTHETIC_TEAMS: [&str; 10] = [
    "Arsenal",
    "Chelsea",
    "Liverpool",
    "Man City",
    "Man United",
    "Tottenham",
    "Newcastle",
    "Brighton",
    "West Ham",
    "Crystal Palace",
];

const SYNTHETIC_LEAGUES: [&str; 5] = ["EPL", "La Liga", "Bundesliga", "Serie A", "Ligue 1"];

/// The three match outcomes, in fixed tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Away,
    Draw,
}

impl Outcome {
    pub const ALL: [Outcome; NUM_CLASSES] = [Outcome::Home, Outcome::Away, Outcome::Draw];

    pub fn index(self) -> usize {
        match self {
            Outcome::Home => 0,
            Outcome::Away => 1,
            Outcome::Draw => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Home => "home",
            Outcome::Away => "away",
            Outcome::Draw => "draw",
        }
    }
}

/// 3-way outcome distribution for one match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_winner: Outcome,
    pub home_win_probability: f64,
    pub away_win_probability: f64,
    pub draw_probability: f64,
    /// Maximum of the three probabilities.
    pub confidence: f64,
}

impl PredictionResult {
    /// Build from a probability vector; the winner is the argmax, ties
    /// resolved by the fixed home > away > draw priority.
    fn from_probs(probs: [f64; NUM_CLASSES]) -> Self {
        let mut winner = Outcome::Home;
        let mut best = probs[0];
        for outcome in [Outcome::Away, Outcome::Draw] {
            if probs[outcome.index()] > best {
                best = probs[outcome.index()];
                winner = outcome;
            }
        }
        PredictionResult {
            predicted_winner: winner,
            home_win_probability: probs[0],
            away_win_probability: probs[1],
            draw_probability: probs[2],
            confidence: best,
        }
    }

    pub fn probability(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home_win_probability,
            Outcome::Away => self.away_win_probability,
            Outcome::Draw => self.draw_probability,
        }
    }
}

/// Append-only name ↔ index map. Known names keep their index forever;
/// unseen names are assigned the next free slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    fn fit<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Self {
        let mut enc = LabelEncoder::default();
        for name in names {
            enc.upsert(name);
        }
        enc
    }

    /// Return the index for `name`, growing the vocabulary when unseen.
    pub fn upsert(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Per-column standardization fitted on the training features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl FeatureScaler {
    fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let n = rows.len().max(1) as f64;
        let mut means = vec![0.0; width];
        for row in rows {
            for (c, v) in row.iter().enumerate() {
                means[c] += v;
            }
        }
        for m in &mut means {
            *m /= n;
        }
        let mut stds = vec![0.0; width];
        for row in rows {
            for (c, v) in row.iter().enumerate() {
                stds[c] += (v - means[c]).powi(2);
            }
        }
        for s in &mut stds {
            *s = (*s / n).sqrt();
            // Constant columns pass through unscaled.
            if *s == 0.0 {
                *s = 1.0;
            }
        }
        FeatureScaler { means, stds }
    }

    fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .enumerate()
            .map(|(c, v)| (v - self.means[c]) / self.stds[c])
            .collect()
    }
}

/// Everything the predictor persists as one blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelArtifact {
    forest: Forest,
    scaler: FeatureScaler,
    team_encoder: LabelEncoder,
    league_encoder: LabelEncoder,
}

/// Synthetic-training knobs; the defaults reproduce the shipped model.
#[derive(Debug, Clone)]
pub struct TrainingParams {
    pub samples: usize,
    pub forest: ForestParams,
    pub seed: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        TrainingParams {
            samples: 1000,
            forest: ForestParams::default(),
            seed: 42,
        }
    }
}

/// Trainable 3-way outcome classifier with odds-implied fallback.
pub struct OutcomePredictor {
    artifact: Mutex<ModelArtifact>,
}

impl OutcomePredictor {
    /// Load the persisted artifact, or train from scratch and persist when no
    /// usable artifact exists. Runs at most once per process.
    pub fn load_or_train(model_path: &Path) -> Result<Self> {
        match Self::load_artifact(model_path) {
            Ok(artifact) => {
                info!(
                    "Prediction model loaded from {} ({} trees, {} teams, {} leagues)",
                    model_path.display(),
                    artifact.forest.num_trees(),
                    artifact.team_encoder.len(),
                    artifact.league_encoder.len()
                );
                Ok(OutcomePredictor {
                    artifact: Mutex::new(artifact),
                })
            }
            Err(e) => {
                warn!(
                    "No usable model at {} ({}); training a fresh one",
                    model_path.display(),
                    e
                );
                Self::train_and_persist(model_path, &TrainingParams::default())
            }
        }
    }

    /// Train on synthetic fixtures with explicit knobs and persist the result.
    pub fn train_and_persist(model_path: &Path, params: &TrainingParams) -> Result<Self> {
        let artifact = Self::train(params);
        Self::persist_artifact(&artifact, model_path)?;
        Ok(OutcomePredictor {
            artifact: Mutex::new(artifact),
        })
    }

    fn load_artifact(path: &Path) -> Result<ModelArtifact> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let artifact =
            serde_json::from_str(&content).context("failed to deserialize model artifact")?;
        Ok(artifact)
    }

    fn persist_artifact(artifact: &ModelArtifact, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let content = serde_json::to_string(artifact).context("failed to serialize model")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Prediction model persisted to {}", path.display());
        Ok(())
    }

    fn train(params: &TrainingParams) -> ModelArtifact {
        info!(
            "Training prediction model on {} synthetic fixtures ({} trees)",
            params.samples, params.forest.trees
        );
        let mut rng = StdRng::seed_from_u64(params.seed);
        let fixtures = synthetic_fixtures(params.samples, &mut rng);

        let mut team_encoder = LabelEncoder::fit(SYNTHETIC_TEAMS);
        let mut league_encoder = LabelEncoder::fit(SYNTHETIC_LEAGUES);

        let rows: Vec<Vec<f64>> = fixtures
            .iter()
            .map(|f| {
                feature_row(
                    team_encoder.upsert(&f.home_team),
                    team_encoder.upsert(&f.away_team),
                    league_encoder.upsert(&f.league),
                    f.home_odds,
                    f.away_odds,
                    f.draw_odds,
                    f.home_strength,
                    f.away_strength,
                )
            })
            .collect();
        let labels: Vec<usize> = fixtures.iter().map(|f| f.outcome.index()).collect();

        // 80/20 holdout split for the accuracy readout.
        let mut order: Vec<usize> = (0..rows.len()).collect();
        for i in (1..order.len()).rev() {
            order.swap(i, rng.gen_range(0..=i));
        }
        let split = (rows.len() * 4) / 5;
        let (train_idx, test_idx) = order.split_at(split.max(1));

        let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows[i].clone()).collect();
        let scaler = FeatureScaler::fit(&train_rows);

        let scaled: Vec<Vec<f64>> = train_rows.iter().map(|r| scaler.transform(r)).collect();
        let train_labels: Vec<usize> = train_idx.iter().map(|&i| labels[i]).collect();
        let forest = Forest::fit(&scaled, &train_labels, &params.forest, &mut rng);

        let accuracy = |idx: &[usize]| {
            if idx.is_empty() {
                return 0.0;
            }
            let hits = idx
                .iter()
                .filter(|&&i| {
                    let probs = forest.predict_proba(&scaler.transform(&rows[i]));
                    argmax(&probs) == labels[i]
                })
                .count();
            hits as f64 / idx.len() as f64
        };
        info!(
            "Model trained: train accuracy {:.3}, holdout accuracy {:.3}",
            accuracy(train_idx),
            accuracy(test_idx)
        );

        ModelArtifact {
            forest,
            scaler,
            team_encoder,
            league_encoder,
        }
    }

    /// Predict the outcome distribution for one match. Model-path failures
    /// (absent or degenerate odds, non-finite features) degrade to the
    /// odds-implied fallback and are never surfaced to the caller.
    pub fn predict(
        &self,
        home_team: &str,
        away_team: &str,
        league: &str,
        odds: &OddsTriple,
    ) -> PredictionResult {
        match self.model_prediction(home_team, away_team, league, odds) {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    "Model inference failed for {} vs {} ({}); using odds-implied fallback",
                    home_team, away_team, e
                );
                fallback_prediction(odds)
            }
        }
    }

    fn model_prediction(
        &self,
        home_team: &str,
        away_team: &str,
        league: &str,
        odds: &OddsTriple,
    ) -> Result<PredictionResult> {
        let home_odds = positive_odds(odds.home_odds).context("home odds unusable")?;
        let away_odds = positive_odds(odds.away_odds).context("away odds unusable")?;
        let draw_odds = positive_odds(odds.draw_odds).context("draw odds unusable")?;

        let home_strength = odds.home_odds.map(|o| 1.0 / o).unwrap_or(DEFAULT_STRENGTH);
        let away_strength = odds.away_odds.map(|o| 1.0 / o).unwrap_or(DEFAULT_STRENGTH);

        // Encoder growth is a mutation on shared state; the whole
        // encode-scale-predict step runs under the artifact lock.
        let mut artifact = self.artifact.lock().unwrap();
        let home_idx = artifact.team_encoder.upsert(home_team);
        let away_idx = artifact.team_encoder.upsert(away_team);
        let league_idx = artifact.league_encoder.upsert(league);

        let row = feature_row(
            home_idx,
            away_idx,
            league_idx,
            home_odds,
            away_odds,
            draw_odds,
            home_strength,
            away_strength,
        );
        anyhow::ensure!(
            row.iter().all(|v| v.is_finite()),
            "non-finite feature value"
        );

        let scaled = artifact.scaler.transform(&row);
        let probs = artifact.forest.predict_proba(&scaled);
        Ok(PredictionResult::from_probs(probs))
    }

    /// Number of known team names (grows with unseen teams). Exercised by
    /// the encoder-growth tests.
    #[allow(dead_code)]
    pub fn known_teams(&self) -> usize {
        self.artifact.lock().unwrap().team_encoder.len()
    }
}

/// Deterministic odds-implied prediction used when model inference is
/// unavailable. With any odds absent the distribution is flat; otherwise it
/// is the normalized implied probabilities.
pub fn fallback_prediction(odds: &OddsTriple) -> PredictionResult {
    let (home_odds, away_odds, draw_odds) = match (odds.home_odds, odds.away_odds, odds.draw_odds)
    {
        (Some(h), Some(a), Some(d)) if h > 0.0 && a > 0.0 && d > 0.0 => (h, a, d),
        _ => {
            return PredictionResult {
                predicted_winner: Outcome::Draw,
                home_win_probability: 0.33,
                away_win_probability: 0.33,
                draw_probability: 0.34,
                confidence: 0.34,
            }
        }
    };

    let home = 1.0 / home_odds;
    let away = 1.0 / away_odds;
    let draw = 1.0 / draw_odds;
    let total = home + away + draw;
    PredictionResult::from_probs([home / total, away / total, draw / total])
}

fn positive_odds(odds: Option<f64>) -> Option<f64> {
    odds.filter(|o| o.is_finite() && *o > 0.0)
}

fn argmax(probs: &[f64; NUM_CLASSES]) -> usize {
    let mut best = 0;
    for c in 1..NUM_CLASSES {
        if probs[c] > probs[best] {
            best = c;
        }
    }
    best
}

#[allow(clippy::too_many_arguments)]
fn feature_row(
    home_idx: usize,
    away_idx: usize,
    league_idx: usize,
    home_odds: f64,
    away_odds: f64,
    draw_odds: f64,
    home_strength: f64,
    away_strength: f64,
) -> Vec<f64> {
    vec![
        home_idx as f64,
        away_idx as f64,
        league_idx as f64,
        home_odds,
        away_odds,
        draw_odds,
        home_strength,
        away_strength,
    ]
}

struct SyntheticFixture {
    home_team: String,
    away_team: String,
    league: String,
    home_odds: f64,
    away_odds: f64,
    draw_odds: f64,
    home_strength: f64,
    away_strength: f64,
    outcome: Outcome,
}

/// Generate fixtures over the fixed vocabulary: sampled strengths, a logistic
/// transform into outcome probabilities, a categorical outcome draw, and
/// margin-adjusted odds derived from the probabilities.
fn synthetic_fixtures<R: Rng>(samples: usize, rng: &mut R) -> Vec<SyntheticFixture> {
    let mut fixtures = Vec::with_capacity(samples);
    for _ in 0..samples {
        let home = SYNTHETIC_TEAMS[rng.gen_range(0..SYNTHETIC_TEAMS.len())];
        let away = loop {
            let candidate = SYNTHETIC_TEAMS[rng.gen_range(0..SYNTHETIC_TEAMS.len())];
            if candidate != home {
                break candidate;
            }
        };
        let league = SYNTHETIC_LEAGUES[rng.gen_range(0..SYNTHETIC_LEAGUES.len())];

        let home_strength = sample_normal(rng, 0.5, 0.2);
        let away_strength = sample_normal(rng, 0.5, 0.2);

        let p_home = sigmoid((home_strength - away_strength + HOME_ADVANTAGE) * 3.0);
        let p_away = sigmoid((away_strength - home_strength - HOME_ADVANTAGE) * 3.0);
        let p_draw = (1.0 - (p_home + p_away)).max(0.0);
        let total = p_home + p_away + p_draw;
        let probs = [p_home / total, p_away / total, p_draw / total];

        let outcome = sample_categorical(rng, &probs);

        fixtures.push(SyntheticFixture {
            home_team: home.to_string(),
            away_team: away.to_string(),
            league: league.to_string(),
            home_odds: synthetic_odds(probs[0]),
            away_odds: synthetic_odds(probs[1]),
            draw_odds: synthetic_odds(probs[2]),
            home_strength: home_strength.clamp(0.1, 0.9),
            away_strength: away_strength.clamp(0.1, 0.9),
            outcome,
        });
    }
    fixtures
}

fn synthetic_odds(prob: f64) -> f64 {
    if prob > LONGSHOT_PROB_FLOOR {
        (BOOKMAKER_MARGIN / prob).min(MAX_SYNTHETIC_ODDS)
    } else {
        LONGSHOT_ODDS
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Box–Muller standard normal, shifted and scaled.
fn sample_normal<R: Rng>(rng: &mut R, mean: f64, std: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + std * z
}

fn sample_categorical<R: Rng>(rng: &mut R, probs: &[f64; NUM_CLASSES]) -> Outcome {
    let r: f64 = rng.gen();
    let mut acc = 0.0;
    for outcome in Outcome::ALL {
        acc += probs[outcome.index()];
        if r < acc {
            return outcome;
        }
    }
    Outcome::Draw
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    fn small_params() -> TrainingParams {
        TrainingParams {
            samples: 200,
            forest: ForestParams {
                trees: 15,
                max_depth: 8,
                min_samples_split: 4,
                features_per_split: 0,
            },
            seed: 42,
        }
    }

    fn temp_model_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("oddscout_model_{}_{}.json", tag, std::process::id()))
    }

    fn full_odds() -> OddsTriple {
        OddsTriple {
            home_odds: Some(2.0),
            away_odds: Some(3.5),
            draw_odds: Some(3.2),
        }
    }

    #[test]
    fn fallback_normalizes_implied_probabilities() {
        let odds = OddsTriple {
            home_odds: Some(2.0),
            away_odds: Some(3.0),
            draw_odds: Some(4.0),
        };
        let p = fallback_prediction(&odds);
        assert_relative_eq!(p.home_win_probability, 6.0 / 13.0, epsilon = 1e-9);
        assert_relative_eq!(p.away_win_probability, 4.0 / 13.0, epsilon = 1e-9);
        assert_relative_eq!(p.draw_probability, 3.0 / 13.0, epsilon = 1e-9);
        assert_eq!(p.predicted_winner, Outcome::Home);
        assert_relative_eq!(p.confidence, p.home_win_probability, epsilon = 1e-12);
        let sum = p.home_win_probability + p.away_win_probability + p.draw_probability;
        assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn fallback_with_missing_odds_is_flat() {
        let odds = OddsTriple {
            home_odds: Some(2.0),
            away_odds: None,
            draw_odds: Some(4.0),
        };
        let p = fallback_prediction(&odds);
        assert_eq!(p.predicted_winner, Outcome::Draw);
        assert_relative_eq!(p.home_win_probability, 0.33, epsilon = 1e-12);
        assert_relative_eq!(p.away_win_probability, 0.33, epsilon = 1e-12);
        assert_relative_eq!(p.draw_probability, 0.34, epsilon = 1e-12);
        assert_relative_eq!(p.confidence, 0.34, epsilon = 1e-12);
    }

    #[test]
    fn fallback_ties_prefer_home_then_away() {
        let odds = OddsTriple {
            home_odds: Some(3.0),
            away_odds: Some(3.0),
            draw_odds: Some(3.0),
        };
        let p = fallback_prediction(&odds);
        assert_eq!(p.predicted_winner, Outcome::Home);
    }

    #[test]
    fn trained_model_emits_valid_distribution() {
        let path = temp_model_path("dist");
        let predictor =
            OutcomePredictor::train_and_persist(&path, &small_params()).expect("training");
        let p = predictor.predict("Arsenal", "Chelsea", "EPL", &full_odds());

        let sum = p.home_win_probability + p.away_win_probability + p.draw_probability;
        assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
        for v in [
            p.home_win_probability,
            p.away_win_probability,
            p.draw_probability,
        ] {
            assert!((0.0..=1.0).contains(&v), "probability out of range: {}", v);
        }
        let max = p
            .home_win_probability
            .max(p.away_win_probability)
            .max(p.draw_probability);
        assert_relative_eq!(p.confidence, max, epsilon = 1e-12);
        assert_relative_eq!(p.probability(p.predicted_winner), max, epsilon = 1e-12);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unseen_team_gets_stable_index() {
        let path = temp_model_path("unseen");
        let predictor =
            OutcomePredictor::train_and_persist(&path, &small_params()).expect("training");
        let before = predictor.known_teams();

        let first = predictor.predict("FC Midtjylland", "Arsenal", "Superliga", &full_odds());
        assert_eq!(predictor.known_teams(), before + 1);

        // Re-encoding the same name must not grow the vocabulary again and
        // must produce the same features, hence the same distribution.
        let second = predictor.predict("FC Midtjylland", "Arsenal", "Superliga", &full_odds());
        assert_eq!(predictor.known_teams(), before + 1);
        assert_relative_eq!(
            first.home_win_probability,
            second.home_win_probability,
            epsilon = 1e-12
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_odds_degrade_to_fallback() {
        let path = temp_model_path("fallback");
        let predictor =
            OutcomePredictor::train_and_persist(&path, &small_params()).expect("training");
        let odds = OddsTriple {
            home_odds: None,
            away_odds: Some(3.0),
            draw_odds: Some(4.0),
        };
        let p = predictor.predict("Arsenal", "Chelsea", "EPL", &odds);
        assert_eq!(p.predicted_winner, Outcome::Draw);
        assert_relative_eq!(p.draw_probability, 0.34, epsilon = 1e-12);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn persisted_artifact_round_trips() {
        let path = temp_model_path("roundtrip");
        let trained =
            OutcomePredictor::train_and_persist(&path, &small_params()).expect("training");
        let reloaded = OutcomePredictor::load_or_train(&path).expect("loading");

        let a = trained.predict("Arsenal", "Chelsea", "EPL", &full_odds());
        let b = reloaded.predict("Arsenal", "Chelsea", "EPL", &full_odds());
        assert_relative_eq!(
            a.home_win_probability,
            b.home_win_probability,
            epsilon = 1e-12
        );
        assert_relative_eq!(a.draw_probability, b.draw_probability, epsilon = 1e-12);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn encoder_upsert_is_append_only() {
        let mut enc = LabelEncoder::fit(["Arsenal", "Chelsea"]);
        assert_eq!(enc.upsert("Arsenal"), 0);
        assert_eq!(enc.upsert("Chelsea"), 1);
        assert_eq!(enc.upsert("Liverpool"), 2);
        // Growth never disturbs existing assignments.
        assert_eq!(enc.upsert("Arsenal"), 0);
        assert_eq!(enc.len(), 3);
    }

    #[test]
    fn scaler_standardizes_columns() {
        let rows = vec![
            vec![1.0, 10.0],
            vec![2.0, 20.0],
            vec![3.0, 30.0],
            vec![4.0, 40.0],
        ];
        let scaler = FeatureScaler::fit(&rows);
        let scaled: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform(r)).collect();
        for c in 0..2 {
            let mean: f64 = scaled.iter().map(|r| r[c]).sum::<f64>() / scaled.len() as f64;
            let var: f64 =
                scaled.iter().map(|r| (r[c] - mean).powi(2)).sum::<f64>() / scaled.len() as f64;
            assert_relative_eq!(mean, 0.0, epsilon = 1e-9);
            assert_relative_eq!(var, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn synthetic_odds_respect_floor_and_cap() {
        assert_relative_eq!(synthetic_odds(0.5), 2.1, epsilon = 1e-12);
        assert_relative_eq!(synthetic_odds(0.04), 10.0, epsilon = 1e-12);
        assert_relative_eq!(synthetic_odds(0.052), 20.0, epsilon = 1e-12);
    }
}
