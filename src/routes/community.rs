use axum::{middleware, routing::{get, post}, Router};

use crate::handlers::community;
use crate::middleware::auth::{auth_middleware, require_not_blocked};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/:topic", post(community::create_post))
        .route("/:topic/:id/comments", post(community::create_comment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_not_blocked,
        ))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/:topic", get(community::list_posts))
        .route("/:topic/:id", get(community::get_post))
        .merge(protected)
}
