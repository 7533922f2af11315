use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::engine::{OddsTriple, PredictionResult, ValueBet};
use crate::scanner::Scanner;

#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
}

/// Build the Axum router for the dashboard and JSON API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/matches", get(matches_handler))
        .route("/api/matches/update", get(update_handler))
        .route("/api/predict/custom", post(predict_custom_handler))
        .route("/api/sports", get(sports_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn index_handler() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

#[derive(Debug, Deserialize)]
struct MatchesQuery {
    /// Sport key filter; "all" or absent lists everything
    sport: Option<String>,
    #[serde(default)]
    live: bool,
}

/// GET /api/matches?sport=soccer_epl&live=true
async fn matches_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MatchesQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let sport = query
        .sport
        .as_deref()
        .filter(|s| !s.is_empty() && *s != "all");
    state
        .scanner
        .db()
        .list_matches(sport, query.live)
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

#[derive(Debug, Serialize)]
struct UpdateResponse {
    matches_updated: usize,
}

/// GET /api/matches/update (triggers a refresh cycle on demand)
async fn update_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .scanner
        .refresh_odds()
        .await
        .map(|n| Json(UpdateResponse { matches_updated: n }))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

#[derive(Debug, Deserialize)]
struct CustomMatchRequest {
    home_team: String,
    away_team: String,
    #[serde(default)]
    league: Option<String>,
    home_odds: Option<f64>,
    away_odds: Option<f64>,
    draw_odds: Option<f64>,
}

#[derive(Debug, Serialize)]
struct CustomMatchResponse {
    home_team: String,
    away_team: String,
    prediction: PredictionResult,
    value_bet: Option<ValueBet>,
}

/// POST /api/predict/custom (ad-hoc prediction outside the persistence path)
async fn predict_custom_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CustomMatchRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.home_team.trim().is_empty() || req.away_team.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "home_team and away_team are required".to_string(),
        ));
    }
    let odds = OddsTriple {
        home_odds: req.home_odds,
        away_odds: req.away_odds,
        draw_odds: req.draw_odds,
    };
    let league = req.league.as_deref().unwrap_or("Unknown");
    let (prediction, value_bet) =
        state
            .scanner
            .processor()
            .evaluate(&req.home_team, &req.away_team, league, &odds);
    Ok(Json(CustomMatchResponse {
        home_team: req.home_team,
        away_team: req.away_team,
        prediction,
        value_bet,
    }))
}

/// GET /api/sports
async fn sports_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .scanner
        .sports()
        .await
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Oddscout</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .stats-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 1rem; }
  .stat-card { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; }
  .stat-card .label { color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; margin-bottom: .4rem; }
  .stat-card .value { font-size: 1.7rem; font-weight: 700; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; display: flex; justify-content: space-between; align-items: center; gap: 1rem; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .7rem 1rem; text-align: left; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .65rem 1rem; font-size: .88rem; border-bottom: 1px solid #1e2130; }
  tr:last-child td { border-bottom: none; }
  .pill { display: inline-block; padding: .15rem .55rem; border-radius: 20px; font-size: .75rem; font-weight: 600; }
  .pill.value { background: rgba(0,200,150,.15); color: var(--green); }
  .pill.live { background: rgba(255,79,106,.15); color: var(--red); }
  .muted { color: var(--muted); }
  .empty { color: var(--muted); text-align: center; padding: 2rem; font-size: .9rem; }
  .refresh-btn { background: none; border: 1px solid var(--border); color: var(--muted); padding: .3rem .8rem; border-radius: 6px; cursor: pointer; font-size: .8rem; }
  .refresh-btn:hover { border-color: var(--accent); color: var(--accent); }
  select { background: var(--card); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .3rem .5rem; }
</style>
</head>
<body>
<header>
  <h1>🎯 Oddscout</h1>
  <span style="margin-left:auto;color:var(--muted);font-size:.8rem;" id="last-updated"></span>
</header>

<main>
  <div class="stats-grid">
    <div class="stat-card"><div class="label">Matches</div><div class="value" id="s-matches">–</div></div>
    <div class="stat-card"><div class="label">Live Now</div><div class="value" id="s-live">–</div></div>
    <div class="stat-card"><div class="label">Value Bets</div><div class="value" id="s-value">–</div></div>
  </div>

  <div class="panel">
    <div class="panel-header">
      <span>Scanned Matches</span>
      <span>
        <label class="muted">Live only <input type="checkbox" id="live-filter"></label>
        <button class="refresh-btn" onclick="triggerUpdate()">↻ Update Odds</button>
      </span>
    </div>
    <table>
      <thead><tr><th>Kick-off</th><th>Match</th><th>League</th><th>1</th><th>X</th><th>2</th><th>Prediction</th><th>Value Bet</th><th></th></tr></thead>
      <tbody id="matches-tbody"><tr><td colspan="9" class="empty">Loading…</td></tr></tbody>
    </table>
  </div>
</main>

<script>
const pct = v => (v*100).toFixed(1)+'%';
const odds = v => v != null ? v.toFixed(2) : '–';

async function loadMatches() {
  const liveOnly = document.getElementById('live-filter').checked;
  const r = await fetch('/api/matches' + (liveOnly ? '?live=true' : ''));
  if (!r.ok) return;
  const matches = await r.json();

  document.getElementById('s-matches').textContent = matches.length;
  document.getElementById('s-live').textContent = matches.filter(m => m.is_live).length;
  document.getElementById('s-value').textContent = matches.filter(m => m.value_bet_detected).length;

  const tbody = document.getElementById('matches-tbody');
  if (!matches.length) { tbody.innerHTML = '<tr><td colspan="9" class="empty">No matches scanned yet</td></tr>'; return; }
  tbody.innerHTML = matches.map(m => `<tr>
    <td>${new Date(m.commence_time).toLocaleString()}</td>
    <td>${m.home_team} vs ${m.away_team}</td>
    <td class="muted">${m.league}</td>
    <td>${odds(m.home_odds)}</td>
    <td>${odds(m.draw_odds)}</td>
    <td>${odds(m.away_odds)}</td>
    <td>${m.predicted_winner} <span class="muted">(${pct(m.confidence)})</span></td>
    <td>${m.value_bet_detected ? `<span class="pill value">${m.value_bet_side}</span>` : '<span class="muted">–</span>'}</td>
    <td>${m.is_live ? '<span class="pill live">LIVE</span>' : ''}</td>
  </tr>`).join('');
  document.getElementById('last-updated').textContent = 'Updated ' + new Date().toLocaleTimeString();
}

async function triggerUpdate() {
  const r = await fetch('/api/matches/update');
  if (r.ok) await loadMatches();
}

document.getElementById('live-filter').addEventListener('change', loadMatches);
loadMatches();
setInterval(loadMatches, 30000);
</script>
</body>
</html>"#;
