use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub mod models;
use models::MatchRecord;

/// Thread-safe SQLite handle (single connection with mutex). The guarded
/// connection also serializes writes, so no two cycles can interleave an
/// upsert for the same match identifier.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the SQLite database at the given path
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Run schema migrations (idempotent)
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    // ── Matches ───────────────────────────────────────────────────────────────

    /// Upsert a match record keyed by its external identifier. Derived fields
    /// are fully overwritten; `created_at`, scores and status are preserved
    /// for existing rows.
    pub fn upsert_match(&self, m: &MatchRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO matches (
                match_id, sport_key, sport_title, home_team, away_team,
                commence_time, league, home_odds, away_odds, draw_odds,
                predicted_winner, home_win_probability, away_win_probability,
                draw_probability, confidence, value_bet_detected, value_bet_side,
                is_live, home_score, away_score, match_status,
                created_at, updated_at
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21,?22,?23)
             ON CONFLICT(match_id) DO UPDATE SET
                sport_key=excluded.sport_key,
                sport_title=excluded.sport_title,
                home_team=excluded.home_team,
                away_team=excluded.away_team,
                commence_time=excluded.commence_time,
                league=excluded.league,
                home_odds=excluded.home_odds,
                away_odds=excluded.away_odds,
                draw_odds=excluded.draw_odds,
                predicted_winner=excluded.predicted_winner,
                home_win_probability=excluded.home_win_probability,
                away_win_probability=excluded.away_win_probability,
                draw_probability=excluded.draw_probability,
                confidence=excluded.confidence,
                value_bet_detected=excluded.value_bet_detected,
                value_bet_side=excluded.value_bet_side,
                is_live=excluded.is_live,
                updated_at=excluded.updated_at",
            params![
                m.match_id,
                m.sport_key,
                m.sport_title,
                m.home_team,
                m.away_team,
                m.commence_time,
                m.league,
                m.home_odds,
                m.away_odds,
                m.draw_odds,
                m.predicted_winner,
                m.home_win_probability,
                m.away_win_probability,
                m.draw_probability,
                m.confidence,
                m.value_bet_detected,
                m.value_bet_side,
                m.is_live,
                m.home_score,
                m.away_score,
                m.match_status,
                m.created_at,
                m.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Fetch one match by its external identifier
    pub fn get_match(&self, match_id: &str) -> Result<Option<MatchRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM matches WHERE match_id = ?1",
            MATCH_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![match_id], map_match)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// List matches ordered by kick-off, optionally filtered by sport key
    /// and/or the live-window flag.
    pub fn list_matches(
        &self,
        sport_key: Option<&str>,
        live_only: bool,
    ) -> Result<Vec<MatchRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut sql = format!("SELECT {} FROM matches", MATCH_COLUMNS);
        let mut clauses = Vec::new();
        if sport_key.is_some() {
            clauses.push("sport_key = ?1");
        }
        if live_only {
            clauses.push("is_live = 1");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY commence_time");

        let mut stmt = conn.prepare(&sql)?;
        let matches = match sport_key {
            Some(key) => stmt
                .query_map(params![key], map_match)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt
                .query_map([], map_match)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(matches)
    }

    /// Rewrite the live flag of every stored match from its kick-off time.
    /// Scores and status are left untouched. Returns the number of matches
    /// whose flag flipped.
    pub fn refresh_live_flags(&self, now: DateTime<Utc>) -> Result<usize> {
        let matches = self.list_matches(None, false)?;
        let conn = self.conn.lock().unwrap();
        let mut flipped = 0;
        for m in &matches {
            let live = crate::engine::processor::in_live_window(m.commence_time, now);
            if live != m.is_live {
                conn.execute(
                    "UPDATE matches SET is_live = ?1, updated_at = ?2 WHERE match_id = ?3",
                    params![live, now, m.match_id],
                )?;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    /// Count stored matches (dashboard stat)
    pub fn count_matches(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn
            .query_row("SELECT COUNT(*) FROM matches", [], |r| r.get(0))
            .unwrap_or(0);
        Ok(count)
    }
}

// ── SQL helpers ────────────────────────────────────────────────────────────────

const MATCH_COLUMNS: &str = "id, match_id, sport_key, sport_title, home_team, away_team, \
     commence_time, league, home_odds, away_odds, draw_odds, \
     predicted_winner, home_win_probability, away_win_probability, \
     draw_probability, confidence, value_bet_detected, value_bet_side, \
     is_live, home_score, away_score, match_status, created_at, updated_at";

fn map_match(row: &rusqlite::Row) -> rusqlite::Result<MatchRecord> {
    Ok(MatchRecord {
        id: row.get(0)?,
        match_id: row.get(1)?,
        sport_key: row.get(2)?,
        sport_title: row.get(3)?,
        home_team: row.get(4)?,
        away_team: row.get(5)?,
        commence_time: row.get(6)?,
        league: row.get(7)?,
        home_odds: row.get(8)?,
        away_odds: row.get(9)?,
        draw_odds: row.get(10)?,
        predicted_winner: row.get(11)?,
        home_win_probability: row.get(12)?,
        away_win_probability: row.get(13)?,
        draw_probability: row.get(14)?,
        confidence: row.get(15)?,
        value_bet_detected: row.get(16)?,
        value_bet_side: row.get(17)?,
        is_live: row.get(18)?,
        home_score: row.get(19)?,
        away_score: row.get(20)?,
        match_status: row.get(21)?,
        created_at: row.get(22)?,
        updated_at: row.get(23)?,
    })
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS)
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS matches (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    match_id             TEXT    NOT NULL UNIQUE,
    sport_key            TEXT    NOT NULL,
    sport_title          TEXT    NOT NULL,
    home_team            TEXT    NOT NULL,
    away_team            TEXT    NOT NULL,
    commence_time        TEXT    NOT NULL,
    league               TEXT    NOT NULL DEFAULT 'Unknown',
    home_odds            REAL,
    away_odds            REAL,
    draw_odds            REAL,
    predicted_winner     TEXT    NOT NULL,
    home_win_probability REAL    NOT NULL,
    away_win_probability REAL    NOT NULL,
    draw_probability     REAL    NOT NULL,
    confidence           REAL    NOT NULL,
    value_bet_detected   INTEGER NOT NULL DEFAULT 0,
    value_bet_side       TEXT,
    is_live              INTEGER NOT NULL DEFAULT 0,
    home_score           INTEGER NOT NULL DEFAULT 0,
    away_score           INTEGER NOT NULL DEFAULT 0,
    match_status         TEXT,
    created_at           TEXT    NOT NULL,
    updated_at           TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_matches_sport ON matches(sport_key);
CREATE INDEX IF NOT EXISTS idx_matches_live ON matches(is_live);
CREATE INDEX IF NOT EXISTS idx_matches_commence ON matches(commence_time);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(match_id: &str) -> MatchRecord {
        let now = Utc::now();
        MatchRecord {
            id: None,
            match_id: match_id.into(),
            sport_key: "soccer_epl".into(),
            sport_title: "EPL".into(),
            home_team: "Arsenal".into(),
            away_team: "Chelsea".into(),
            commence_time: now + Duration::hours(4),
            league: "EPL".into(),
            home_odds: Some(2.1),
            away_odds: Some(3.4),
            draw_odds: Some(3.5),
            predicted_winner: "home".into(),
            home_win_probability: 0.5,
            away_win_probability: 0.3,
            draw_probability: 0.2,
            confidence: 0.5,
            value_bet_detected: false,
            value_bet_side: None,
            is_live: false,
            home_score: 0,
            away_score: 0,
            match_status: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn upsert_inserts_then_overwrites_derived_fields() {
        let db = Database::open(":memory:").expect("open");
        let first = record("m1");
        db.upsert_match(&first).expect("insert");

        let mut second = record("m1");
        second.home_odds = Some(1.9);
        second.predicted_winner = "away".into();
        second.value_bet_detected = true;
        second.value_bet_side = Some("away".into());
        second.created_at = first.created_at + Duration::hours(1);
        // The live-update path owns these; the upsert must not touch them.
        second.home_score = 3;
        second.match_status = Some("In Progress".into());
        db.upsert_match(&second).expect("update");

        let stored = db.get_match("m1").expect("query").expect("row exists");
        assert_eq!(stored.home_odds, Some(1.9));
        assert_eq!(stored.predicted_winner, "away");
        assert!(stored.value_bet_detected);
        assert_eq!(stored.value_bet_side.as_deref(), Some("away"));
        // created_at and score/status come from the first insert
        assert_eq!(stored.created_at, first.created_at);
        assert_eq!(stored.home_score, 0);
        assert_eq!(stored.match_status, None);
        assert_eq!(db.count_matches().expect("count"), 1);
    }

    #[test]
    fn list_matches_filters_by_sport_and_live() {
        let db = Database::open(":memory:").expect("open");
        let mut a = record("m1");
        a.sport_key = "soccer_epl".into();
        a.is_live = true;
        let mut b = record("m2");
        b.sport_key = "basketball_nba".into();
        db.upsert_match(&a).expect("insert a");
        db.upsert_match(&b).expect("insert b");

        let epl = db.list_matches(Some("soccer_epl"), false).expect("list");
        assert_eq!(epl.len(), 1);
        assert_eq!(epl[0].match_id, "m1");

        let live = db.list_matches(None, true).expect("list");
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].match_id, "m1");

        let all = db.list_matches(None, false).expect("list");
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn refresh_live_flags_flips_by_window() {
        let db = Database::open(":memory:").expect("open");
        let now = Utc::now();
        // Kicked off an hour ago but stored as not live.
        let mut m = record("m1");
        m.commence_time = now - Duration::hours(1);
        m.is_live = false;
        db.upsert_match(&m).expect("insert");

        let flipped = db.refresh_live_flags(now).expect("refresh");
        assert_eq!(flipped, 1);
        let stored = db.get_match("m1").expect("query").expect("row");
        assert!(stored.is_live);

        // Second pass is a no-op.
        assert_eq!(db.refresh_live_flags(now).expect("refresh"), 0);
    }
}
