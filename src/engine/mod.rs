pub mod extractor;
pub mod forest;
pub mod predictor;
pub mod processor;
pub mod value;

pub use extractor::{extract_odds, OddsTriple};
pub use predictor::{Outcome, OutcomePredictor, PredictionResult};
pub use processor::MatchProcessor;
pub use value::{ValueBet, ValueBetDetector};
