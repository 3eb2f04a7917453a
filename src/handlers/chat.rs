use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::errors::{AppError, Result};
use crate::models::chat::{
    ChatHistoryQuery, ChatMessage, ChatRoomSummary, CreateChatMessage, CreateSystemMessage,
};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// History comes back oldest-first; the newest page is selected with a
/// descending limit/offset and flipped.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
    Query(query): Query<ChatHistoryQuery>,
) -> Result<Json<Vec<ChatMessage>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let mut messages: Vec<ChatMessage> = sqlx::query_as(
        "SELECT cm.id, cm.match_id, cm.user_id, cm.username, cm.message,
                cm.message_type, cm.created_at, u.avatar_url
         FROM chat_messages cm
         LEFT JOIN users u ON cm.user_id = u.id
         WHERE cm.match_id = $1 AND cm.deleted = FALSE
         ORDER BY cm.created_at DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(match_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    messages.reverse();
    Ok(Json(messages))
}

pub async fn post_message(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
    Json(payload): Json<CreateChatMessage>,
) -> Result<(StatusCode, Json<ChatMessage>)> {
    let message = payload
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Message and username are required"))?;
    let username = payload
        .username
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Message and username are required"))?;

    let saved: ChatMessage = sqlx::query_as(
        "INSERT INTO chat_messages (match_id, user_id, username, message, message_type)
         VALUES ($1, $2, $3, $4, 'user')
         RETURNING id, match_id, user_id, username, message, message_type, created_at,
                   NULL::text AS avatar_url",
    )
    .bind(match_id)
    .bind(payload.user_id)
    .bind(&username)
    .bind(&message)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn post_system_message(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
    Json(payload): Json<CreateSystemMessage>,
) -> Result<(StatusCode, Json<ChatMessage>)> {
    let message = payload
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Message is required"))?;

    let saved: ChatMessage = sqlx::query_as(
        "INSERT INTO chat_messages (match_id, user_id, username, message, message_type)
         VALUES ($1, NULL, 'System', $2, $3)
         RETURNING id, match_id, user_id, username, message, message_type, created_at,
                   NULL::text AS avatar_url",
    )
    .bind(match_id)
    .bind(&message)
    .bind(&payload.event_type)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Matches that have chat activity, newest activity first.
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<ChatRoomSummary>>> {
    let rooms: Vec<ChatRoomSummary> = sqlx::query_as(
        "SELECT m.id AS match_id, m.home_score, m.away_score, m.status, m.minute,
                ht.name AS home_team, ht.logo_url AS home_team_logo,
                at.name AS away_team, at.logo_url AS away_team_logo,
                l.name AS league,
                lm.message AS last_message,
                lm.created_at AS last_message_time,
                mc.message_count
         FROM matches m
         JOIN teams ht ON m.home_team_id = ht.id
         JOIN teams at ON m.away_team_id = at.id
         JOIN leagues l ON m.league_id = l.id
         JOIN LATERAL (
             SELECT message, created_at FROM chat_messages
             WHERE match_id = m.id
             ORDER BY created_at DESC LIMIT 1
         ) lm ON TRUE
         JOIN LATERAL (
             SELECT COUNT(*) AS message_count FROM chat_messages
             WHERE match_id = m.id
         ) mc ON TRUE
         ORDER BY lm.created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rooms))
}
