use axum::{middleware, routing::{get, post}, Router};

use crate::handlers::board;
use crate::middleware::auth::{auth_middleware, require_not_blocked};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/:sport", post(board::create_post))
        .route("/:sport/:id/comments", post(board::create_comment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_not_blocked,
        ))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/:sport", get(board::list_posts))
        .route("/:sport/:id", get(board::get_post))
        .merge(protected)
}
