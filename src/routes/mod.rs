pub mod admin;
pub mod auth;
pub mod board;
pub mod chat;
pub mod community;
pub mod leagues;
pub mod matches;
pub mod reports;
pub mod teams;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};

use crate::state::AppState;

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::routes(state.clone()))
        .nest("/matches", matches::routes(state.clone()))
        .nest("/chat", chat::routes())
        .nest("/teams", teams::routes())
        .nest("/leagues", leagues::routes())
        .nest("/board", board::routes(state.clone()))
        .nest("/community", community::routes(state.clone()))
        .nest("/reports", reports::routes(state.clone()))
        .nest("/admin", admin::routes(state))
}
