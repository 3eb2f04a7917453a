use axum::{routing::get, Router};

use crate::handlers::leagues;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(leagues::list_leagues))
        .route("/:id/matches", get(leagues::league_matches))
}
