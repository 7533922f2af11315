use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::types::{MatchPayload, Sport};
use super::OddsFeed;

/// Odds provider backed by The Odds API v4.
/// Docs: <https://the-odds-api.com/liveapi/guides/v4/>
pub struct TheOddsApi {
    http: Client,
    api_key: String,
    /// Base URL, overridable for tests
    base_url: String,
    regions: String,
}

impl TheOddsApi {
    pub fn new(api_key: Option<&str>, base_url: Option<&str>, regions: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(TheOddsApi {
            http,
            api_key: api_key.unwrap_or_default().to_string(),
            base_url: base_url
                .unwrap_or("https://api.the-odds-api.com/v4")
                .to_string(),
            regions: regions.to_string(),
        })
    }
}

#[async_trait]
impl OddsFeed for TheOddsApi {
    fn name(&self) -> &str {
        "TheOddsAPI"
    }

    async fn fetch_odds(&self, sport_key: &str) -> Result<Vec<MatchPayload>> {
        let url = format!("{}/sports/{}/odds", self.base_url, sport_key);
        debug!("Fetching odds from {}", url);

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", self.regions.as_str()),
                ("markets", "h2h"),
                ("oddsFormat", "decimal"),
                ("dateFormat", "iso"),
            ])
            .send()
            .await
            .context("Odds API request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Odds API error for {}: {}", sport_key, resp.status());
        }

        let payloads: Vec<MatchPayload> = resp
            .json()
            .await
            .context("Failed to parse Odds API response")?;
        debug!("Retrieved {} matches for {}", payloads.len(), sport_key);
        Ok(payloads)
    }

    async fn fetch_sports(&self) -> Result<Vec<Sport>> {
        let url = format!("{}/sports", self.base_url);
        debug!("Fetching sports catalogue from {}", url);

        let resp = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            .context("Odds API request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Odds API error: {}", resp.status());
        }

        let sports: Vec<Sport> = resp
            .json()
            .await
            .context("Failed to parse sports catalogue")?;
        Ok(sports)
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::MatchPayload;

    const SAMPLE_ODDS_JSON: &str = r#"[
        {
            "id": "e912304de2b2ce35b473ce2ecd3d1502",
            "sport_key": "soccer_epl",
            "sport_title": "EPL",
            "commence_time": "2026-08-09T14:00:00Z",
            "home_team": "Arsenal",
            "away_team": "Chelsea",
            "bookmakers": [
                {
                    "key": "unibet",
                    "title": "Unibet",
                    "markets": [
                        {
                            "key": "h2h",
                            "outcomes": [
                                { "name": "Arsenal", "price": 2.1 },
                                { "name": "Chelsea", "price": 3.4 },
                                { "name": "Draw", "price": 3.5 }
                            ]
                        }
                    ]
                }
            ]
        }
    ]"#;

    #[test]
    fn parses_odds_api_response() {
        let payloads: Vec<MatchPayload> =
            serde_json::from_str(SAMPLE_ODDS_JSON).expect("sample should parse");
        assert_eq!(payloads.len(), 1);
        let m = &payloads[0];
        assert_eq!(m.id, "e912304de2b2ce35b473ce2ecd3d1502");
        assert_eq!(m.home_team, "Arsenal");
        assert_eq!(m.league(), "Unknown");
        assert_eq!(m.bookmakers.len(), 1);
        assert_eq!(m.bookmakers[0].markets[0].key, "h2h");
        assert_eq!(m.bookmakers[0].markets[0].outcomes[2].name, "Draw");
    }

    #[test]
    fn parses_payload_without_bookmakers() {
        let json = r#"{
            "id": "abc",
            "sport_key": "soccer_epl",
            "sport_title": "EPL",
            "commence_time": "2026-08-09T14:00:00+02:00",
            "home_team": "Liverpool",
            "away_team": "Everton"
        }"#;
        let m: MatchPayload = serde_json::from_str(json).expect("payload should parse");
        assert!(m.bookmakers.is_empty());
        // Offset form is normalized to UTC
        assert_eq!(m.commence_time.to_rfc3339(), "2026-08-09T12:00:00+00:00");
    }
}
