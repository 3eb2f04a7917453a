use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{AppError, Result};
use crate::models::team::Team;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TeamFilter {
    pub league_id: Option<i64>,
    pub search: Option<String>,
}

pub async fn list_teams(
    State(state): State<AppState>,
    Query(filter): Query<TeamFilter>,
) -> Result<Json<Vec<Team>>> {
    let search = filter.search.map(|s| format!("%{}%", s));

    let teams: Vec<Team> = sqlx::query_as(
        "SELECT DISTINCT t.id, t.name, t.logo_url
         FROM teams t
         LEFT JOIN matches m ON m.home_team_id = t.id OR m.away_team_id = t.id
         WHERE ($1::bigint IS NULL OR m.league_id = $1)
           AND ($2::text IS NULL OR t.name ILIKE $2)
         ORDER BY t.name ASC",
    )
    .bind(filter.league_id)
    .bind(search)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(teams))
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Team>> {
    let team: Team = sqlx::query_as("SELECT id, name, logo_url FROM teams WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::TeamNotFound)?;
    Ok(Json(team))
}

/// Win/draw/loss record computed from finished matches.
pub async fn team_stats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let team: Team = sqlx::query_as("SELECT id, name, logo_url FROM teams WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::TeamNotFound)?;

    let (played, wins, draws, losses, goals_for, goals_against): (
        i64,
        i64,
        i64,
        i64,
        i64,
        i64,
    ) = sqlx::query_as(
        "SELECT
            COUNT(*),
            COUNT(*) FILTER (WHERE (home_team_id = $1 AND home_score > away_score)
                               OR (away_team_id = $1 AND away_score > home_score)),
            COUNT(*) FILTER (WHERE home_score = away_score),
            COUNT(*) FILTER (WHERE (home_team_id = $1 AND home_score < away_score)
                               OR (away_team_id = $1 AND away_score < home_score)),
            COALESCE(SUM(CASE WHEN home_team_id = $1 THEN home_score ELSE away_score END), 0),
            COALESCE(SUM(CASE WHEN home_team_id = $1 THEN away_score ELSE home_score END), 0)
         FROM matches
         WHERE (home_team_id = $1 OR away_team_id = $1)
           AND status = 'finished'
           AND home_score IS NOT NULL AND away_score IS NOT NULL",
    )
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(json!({
        "team": team,
        "played": played,
        "wins": wins,
        "draws": draws,
        "losses": losses,
        "goalsFor": goals_for,
        "goalsAgainst": goals_against,
    })))
}
