use axum::{routing::get, Router};

use crate::handlers::teams;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(teams::list_teams))
        .route("/:id", get(teams::get_team))
        .route("/:id/stats", get(teams::team_stats))
}
