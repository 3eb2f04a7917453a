use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handlers::matches;
use crate::middleware::auth::{auth_middleware, require_not_blocked};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/:id/events", post(matches::add_event))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_not_blocked,
        ))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(matches::list_matches))
        .route("/live", get(matches::live_matches))
        .route("/:id", get(matches::get_match))
        .route("/:id/score", patch(matches::update_score))
        .route("/:id/odds", get(matches::match_odds))
        .merge(protected)
}
