use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handlers::reports;
use crate::middleware::auth::{auth_middleware, require_admin};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/reports", get(reports::list_reports))
        .route("/reports/:id", patch(reports::handle_report))
        .route("/users/:id/warn", post(reports::warn_user))
        .route("/users/:id/block", post(reports::block_user))
        .route("/users/:id/unblock", post(reports::unblock_user))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
