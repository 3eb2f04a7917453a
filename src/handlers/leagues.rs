use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::Result;
use crate::models::sports::LiveMatch;
use crate::models::team::League;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LeagueQuery {
    pub source: Option<String>,
}

/// Local league table by default; `?source=api` asks the upstream
/// providers instead.
pub async fn list_leagues(
    State(state): State<AppState>,
    Query(query): Query<LeagueQuery>,
) -> Result<Json<Value>> {
    if query.source.as_deref() == Some("api") {
        let leagues = state.sports.leagues().await;
        return Ok(Json(json!(leagues)));
    }

    let leagues: Vec<League> =
        sqlx::query_as("SELECT id, name, logo_url FROM leagues ORDER BY name ASC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(json!(leagues)))
}

/// Matches for one league, merged across the upstream providers. The
/// id is provider-scoped, so it stays a string.
pub async fn league_matches(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<LiveMatch>>> {
    let matches = state.sports.matches_by_league(&id).await;
    Ok(Json(matches))
}
