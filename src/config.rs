use clap::Parser;

/// Sports odds scanner with ML predictions and value-bet detection
#[derive(Parser, Debug, Clone)]
#[command(name = "oddscout", version, about)]
pub struct Config {
    /// The Odds API key (https://the-odds-api.com)
    #[arg(long, env = "ODDS_API_KEY")]
    pub odds_api_key: Option<String>,

    /// The Odds API base URL
    #[arg(
        long,
        env = "ODDS_API_URL",
        default_value = "https://api.the-odds-api.com/v4"
    )]
    pub odds_api_url: String,

    /// Comma-separated sport keys to scan (e.g. "soccer_epl,soccer_spain_la_liga")
    #[arg(long, env = "SPORT_KEYS", default_value = "soccer_epl")]
    pub sport_keys: String,

    /// Bookmaker regions passed to the odds feed
    #[arg(long, env = "ODDS_REGIONS", default_value = "us,uk,eu")]
    pub regions: String,

    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "oddscout.db")]
    pub database_path: String,

    /// Path of the persisted prediction model artifact
    #[arg(long, env = "MODEL_PATH", default_value = "models/prediction_model.json")]
    pub model_path: String,

    /// Minimum edge over the market-implied probability to flag a value bet
    #[arg(long, env = "EDGE_THRESHOLD", default_value = "0.05")]
    pub edge_threshold: f64,

    /// Odds refresh interval in seconds
    #[arg(long, env = "UPDATE_INTERVAL_SECS", default_value = "300")]
    pub update_interval_secs: u64,

    /// Live-window reclassification interval in seconds
    #[arg(long, env = "LIVE_REFRESH_SECS", default_value = "60")]
    pub live_refresh_secs: u64,

    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..1.0).contains(&self.edge_threshold) {
            anyhow::bail!("edge_threshold must be in [0.0, 1.0)");
        }
        if self.update_interval_secs == 0 {
            anyhow::bail!("update_interval_secs must be positive");
        }
        if self.live_refresh_secs == 0 {
            anyhow::bail!("live_refresh_secs must be positive");
        }
        if self.sport_keys().is_empty() {
            anyhow::bail!("at least one sport key is required");
        }
        Ok(())
    }

    /// Parsed sport keys, whitespace-trimmed, empty entries dropped.
    pub fn sport_keys(&self) -> Vec<String> {
        self.sport_keys
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
