use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::auth;
use crate::middleware::auth::{auth_middleware, require_not_blocked};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(auth::get_profile).put(auth::update_profile))
        .route("/password", put(auth::change_password))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_not_blocked,
        ))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/social", post(auth::social_login))
        .merge(protected)
}
