use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};

use crate::errors::{AppError, Result};
use crate::models::board::{Comment, CreateComment, CreatePost, Post, PostDetail, PostSummary};
use crate::models::user::Claims;
use crate::state::AppState;

pub async fn list_posts(
    State(state): State<AppState>,
    Path(sport): Path<String>,
) -> Result<Json<Vec<PostSummary>>> {
    let posts: Vec<PostSummary> = sqlx::query_as(
        "SELECT p.id, p.title, p.author, p.created_at, COUNT(c.id) AS comment_count
         FROM board_posts p
         LEFT JOIN board_comments c ON c.post_id = p.id
         WHERE p.sport = $1 AND p.deleted = FALSE
         GROUP BY p.id
         ORDER BY p.created_at DESC",
    )
    .bind(&sport)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path((sport, id)): Path<(String, i64)>,
) -> Result<Json<PostDetail>> {
    let post: Post = sqlx::query_as(
        "SELECT id, title, content, author, created_at
         FROM board_posts
         WHERE id = $1 AND sport = $2 AND deleted = FALSE",
    )
    .bind(id)
    .bind(&sport)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::PostNotFound)?;

    let comments: Vec<Comment> = sqlx::query_as(
        "SELECT id, username, content, created_at
         FROM board_comments
         WHERE post_id = $1 AND deleted = FALSE
         ORDER BY created_at ASC",
    )
    .bind(id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(PostDetail { post, comments }))
}

pub async fn create_post(
    State(state): State<AppState>,
    Path(sport): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePost>,
) -> Result<(StatusCode, Json<Post>)> {
    let title = payload
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Title and content are required"))?;
    let content = payload
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Title and content are required"))?;

    let post: Post = sqlx::query_as(
        "INSERT INTO board_posts (sport, title, content, author, user_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, title, content, author, created_at",
    )
    .bind(&sport)
    .bind(&title)
    .bind(&content)
    .bind(&claims.username)
    .bind(claims.sub)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path((sport, id)): Path<(String, i64)>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateComment>,
) -> Result<(StatusCode, Json<Comment>)> {
    let content = payload
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Content is required"))?;

    let exists: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM board_posts WHERE id = $1 AND sport = $2 AND deleted = FALSE",
    )
    .bind(id)
    .bind(&sport)
    .fetch_optional(&state.db)
    .await?;
    if exists.is_none() {
        return Err(AppError::PostNotFound);
    }

    let comment: Comment = sqlx::query_as(
        "INSERT INTO board_comments (post_id, username, content, user_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id, username, content, created_at",
    )
    .bind(id)
    .bind(&claims.username)
    .bind(&content)
    .bind(claims.sub)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
