use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A match joined with its teams and league, as served by the list and
/// live endpoints.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MatchSummary {
    pub id: i64,
    pub match_date: DateTime<Utc>,
    pub status: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub minute: Option<i32>,
    pub venue: Option<String>,
    pub home_team: String,
    pub home_team_logo: Option<String>,
    pub away_team: String,
    pub away_team_logo: Option<String>,
    pub league: String,
    pub league_logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MatchEvent {
    pub id: i64,
    pub match_id: i64,
    pub event_type: String,
    pub minute: Option<i32>,
    pub player_name: Option<String>,
    pub team_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BettingOdds {
    pub id: i64,
    pub match_id: i64,
    pub bookmaker: String,
    pub market: String,
    pub home_odds: Option<f64>,
    pub draw_odds: Option<f64>,
    pub away_odds: Option<f64>,
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub summary: MatchSummary,
    pub events: Vec<MatchEvent>,
    pub odds: Vec<BettingOdds>,
}

#[derive(Debug, Deserialize)]
pub struct MatchFilter {
    pub status: Option<String>,
    pub league_id: Option<i64>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreUpdate {
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub minute: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMatchEvent {
    pub event_type: Option<String>,
    pub minute: Option<i32>,
    pub player_name: Option<String>,
    pub team_id: Option<i64>,
    pub description: Option<String>,
}
