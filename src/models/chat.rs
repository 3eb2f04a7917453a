use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted chat message. `user_id` is NULL for system messages.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: i64,
    pub match_id: i64,
    pub user_id: Option<i64>,
    pub username: String,
    pub message: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatMessage {
    pub message: Option<String>,
    pub username: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSystemMessage {
    pub message: Option<String>,
    #[serde(default = "default_event_type")]
    pub event_type: String,
}

fn default_event_type() -> String {
    "system".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatHistoryQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A match that has chat activity, for the room listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChatRoomSummary {
    pub match_id: i64,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub status: String,
    pub minute: Option<i32>,
    pub home_team: String,
    pub home_team_logo: Option<String>,
    pub away_team: String,
    pub away_team_logo: Option<String>,
    pub league: String,
    pub last_message: Option<String>,
    pub last_message_time: Option<DateTime<Utc>>,
    pub message_count: Option<i64>,
}
