use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::errors::{AppError, Result};
use crate::models::r#match::{
    BettingOdds, CreateMatchEvent, MatchDetail, MatchEvent, MatchFilter, MatchSummary,
    ScoreUpdate,
};
use crate::state::AppState;

const MATCH_COLUMNS: &str = r#"
    m.id, m.match_date, m.status, m.home_score, m.away_score, m.minute, m.venue,
    ht.name AS home_team, ht.logo_url AS home_team_logo,
    at.name AS away_team, at.logo_url AS away_team_logo,
    l.name AS league, l.logo_url AS league_logo
"#;

const MATCH_JOINS: &str = r#"
    FROM matches m
    JOIN teams ht ON m.home_team_id = ht.id
    JOIN teams at ON m.away_team_id = at.id
    JOIN leagues l ON m.league_id = l.id
"#;

pub async fn list_matches(
    State(state): State<AppState>,
    Query(filter): Query<MatchFilter>,
) -> Result<Json<Vec<MatchSummary>>> {
    let date = match filter.date.as_deref() {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::invalid_data("Date must be YYYY-MM-DD"))?,
        ),
        None => None,
    };

    let sql = format!(
        "SELECT {MATCH_COLUMNS} {MATCH_JOINS}
         WHERE ($1::text IS NULL OR m.status = $1)
           AND ($2::bigint IS NULL OR m.league_id = $2)
           AND ($3::date IS NULL OR m.match_date::date = $3)
         ORDER BY m.match_date DESC"
    );

    let matches: Vec<MatchSummary> = sqlx::query_as(&sql)
        .bind(filter.status)
        .bind(filter.league_id)
        .bind(date)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(matches))
}

pub async fn live_matches(State(state): State<AppState>) -> Result<Json<Vec<MatchSummary>>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} {MATCH_JOINS}
         WHERE m.status = 'live'
         ORDER BY m.match_date ASC"
    );

    let matches: Vec<MatchSummary> = sqlx::query_as(&sql).fetch_all(&state.db).await?;
    Ok(Json(matches))
}

pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MatchDetail>> {
    let sql = format!("SELECT {MATCH_COLUMNS} {MATCH_JOINS} WHERE m.id = $1");

    let summary: MatchSummary = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::MatchNotFound)?;

    let events: Vec<MatchEvent> = sqlx::query_as(
        "SELECT * FROM match_events WHERE match_id = $1 ORDER BY minute ASC, id ASC",
    )
    .bind(id)
    .fetch_all(&state.db)
    .await?;

    let odds: Vec<BettingOdds> = sqlx::query_as(
        "SELECT * FROM betting_odds WHERE match_id = $1 ORDER BY bookmaker ASC",
    )
    .bind(id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(MatchDetail {
        summary,
        events,
        odds,
    }))
}

pub async fn update_score(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ScoreUpdate>,
) -> Result<Json<Value>> {
    let updated = sqlx::query(
        "UPDATE matches
         SET home_score = COALESCE($1, home_score),
             away_score = COALESCE($2, away_score),
             minute = COALESCE($3, minute),
             status = COALESCE($4, status),
             updated_at = NOW()
         WHERE id = $5",
    )
    .bind(payload.home_score)
    .bind(payload.away_score)
    .bind(payload.minute)
    .bind(payload.status)
    .bind(id)
    .execute(&state.db)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::MatchNotFound);
    }

    tracing::info!("⚽ score updated for match {}", id);
    Ok(Json(json!({ "message": "Score updated", "matchId": id })))
}

pub async fn add_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CreateMatchEvent>,
) -> Result<(StatusCode, Json<MatchEvent>)> {
    let event_type = payload
        .event_type
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Event type is required"))?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM matches WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    if exists.is_none() {
        return Err(AppError::MatchNotFound);
    }

    let event: MatchEvent = sqlx::query_as(
        "INSERT INTO match_events (match_id, event_type, minute, player_name, team_id, description)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(id)
    .bind(&event_type)
    .bind(payload.minute)
    .bind(payload.player_name)
    .bind(payload.team_id)
    .bind(payload.description)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// Live odds from the upstream providers, falling back to the last
/// imported rows when no provider has any.
pub async fn match_odds(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM matches WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    if exists.is_none() {
        return Err(AppError::MatchNotFound);
    }

    let upstream = state.sports.match_odds(&id.to_string()).await;
    if !upstream.is_empty() {
        return Ok(Json(json!({ "source": "api", "odds": upstream })));
    }

    let odds: Vec<BettingOdds> = sqlx::query_as(
        "SELECT * FROM betting_odds WHERE match_id = $1 ORDER BY bookmaker ASC",
    )
    .bind(id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({ "source": "db", "odds": odds })))
}
