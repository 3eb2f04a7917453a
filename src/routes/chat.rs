use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::chat;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(chat::list_rooms))
        .route("/:match_id", get(chat::get_messages).post(chat::post_message))
        .route("/:match_id/system", post(chat::post_system_message))
}
