use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::db::Database;
use crate::engine::MatchProcessor;
use crate::feed::{OddsFeed, Sport};

/// Ties the odds feed, the prediction pipeline and persistence together.
/// One instance is shared between the background refresh loops and the
/// dashboard's manual-refresh endpoint.
pub struct Scanner {
    db: Database,
    feed: Arc<dyn OddsFeed>,
    processor: MatchProcessor,
    sport_keys: Vec<String>,
}

impl Scanner {
    pub fn new(
        db: Database,
        feed: Arc<dyn OddsFeed>,
        processor: MatchProcessor,
        sport_keys: Vec<String>,
    ) -> Self {
        Scanner {
            db,
            feed,
            processor,
            sport_keys,
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn processor(&self) -> &MatchProcessor {
        &self.processor
    }

    /// One full refresh cycle: fetch odds for every configured sport
    /// concurrently, derive records and upsert them. A failing sport or a
    /// rejected payload never aborts the rest of the cycle. Returns the
    /// number of matches written.
    pub async fn refresh_odds(&self) -> Result<usize> {
        let fetches = self
            .sport_keys
            .iter()
            .map(|key| async move { (key.as_str(), self.feed.fetch_odds(key).await) });
        let results = futures_util::future::join_all(fetches).await;

        let now = Utc::now();
        let mut written = 0;
        for (sport_key, result) in results {
            let payloads = match result {
                Ok(p) => p,
                Err(e) => {
                    warn!("Odds fetch failed for {}: {}", sport_key, e);
                    continue;
                }
            };
            let records = self.processor.process_batch(&payloads, now, |match_id| {
                self.db.get_match(match_id).ok().flatten()
            });
            for record in &records {
                if let Err(e) = self.db.upsert_match(record) {
                    warn!("Failed to upsert match {}: {}", record.match_id, e);
                    continue;
                }
                written += 1;
            }
        }

        info!(
            "Refresh cycle complete: {} matches updated ({} tracked)",
            written,
            self.db.count_matches().unwrap_or(0)
        );
        Ok(written)
    }

    /// Reclassify the live window of every stored match.
    pub fn refresh_live_flags(&self) -> Result<usize> {
        let flipped = self.db.refresh_live_flags(Utc::now())?;
        if flipped > 0 {
            info!("Live-window reclassification: {} matches flipped", flipped);
        }
        Ok(flipped)
    }

    /// Sports catalogue straight from the odds feed.
    pub async fn sports(&self) -> Result<Vec<Sport>> {
        self.feed.fetch_sports().await
    }
}
