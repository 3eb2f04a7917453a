use axum::{middleware, routing::post, Router};

use crate::handlers::reports;
use crate::middleware::auth::{auth_middleware, require_not_blocked};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(reports::create_report))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_not_blocked,
        ))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
