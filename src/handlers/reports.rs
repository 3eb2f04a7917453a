use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde_json::{json, Value};

use crate::errors::{AppError, Result};
use crate::models::report::{CreateReport, Report, ReportAction, REPORT_ACTIONS, REPORT_TARGET_TYPES};
use crate::models::user::{Claims, UserStatus};
use crate::state::AppState;

/// Warnings before an account flips to blocked.
pub const WARNING_LIMIT: i32 = 3;

fn target_table(target_type: &str) -> Option<&'static str> {
    match target_type {
        "post" => Some("board_posts"),
        "comment" => Some("board_comments"),
        "chat" => Some("chat_messages"),
        _ => None,
    }
}

pub async fn create_report(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateReport>,
) -> Result<(StatusCode, Json<Report>)> {
    let target_type = payload
        .target_type
        .filter(|t| REPORT_TARGET_TYPES.contains(&t.as_str()))
        .ok_or_else(|| AppError::invalid_data("Invalid report target type"))?;
    let target_id = payload
        .target_id
        .ok_or_else(|| AppError::invalid_data("Target id is required"))?;
    let reason = payload
        .reason
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Reason is required"))?;

    let duplicate: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM reports
         WHERE target_type = $1 AND target_id = $2 AND user_id = $3",
    )
    .bind(&target_type)
    .bind(target_id)
    .bind(claims.sub)
    .fetch_optional(&state.db)
    .await?;
    if duplicate.is_some() {
        return Err(AppError::conflict("You already reported this"));
    }

    let report: Report = sqlx::query_as(
        "INSERT INTO reports (target_type, target_id, reason, message, user_id, status)
         VALUES ($1, $2, $3, $4, $5, 'pending')
         RETURNING *",
    )
    .bind(&target_type)
    .bind(target_id)
    .bind(&reason)
    .bind(payload.message)
    .bind(claims.sub)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("🚨 report {} filed against {} {}", report.id, target_type, target_id);
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn list_reports(State(state): State<AppState>) -> Result<Json<Vec<Report>>> {
    let reports: Vec<Report> =
        sqlx::query_as("SELECT * FROM reports ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(reports))
}

/// `deleted` removes the offending content and warns its author in one
/// transaction; `resolved` just closes the report.
pub async fn handle_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReportAction>,
) -> Result<Json<Value>> {
    let action = payload
        .action
        .filter(|a| REPORT_ACTIONS.contains(&a.as_str()))
        .ok_or_else(|| AppError::invalid_data("Action must be 'resolved' or 'deleted'"))?;

    let report: Report = sqlx::query_as("SELECT * FROM reports WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::ReportNotFound)?;

    let mut tx = state.db.begin().await?;
    let mut warned: Option<(i32, UserStatus)> = None;

    if action == "deleted" {
        if let Some(table) = target_table(&report.target_type) {
            let sql = format!(
                "UPDATE {table} SET deleted = TRUE WHERE id = $1 RETURNING user_id"
            );
            let author: Option<Option<i64>> = sqlx::query_scalar(&sql)
                .bind(report.target_id)
                .fetch_optional(&mut *tx)
                .await?;

            if let Some(Some(user_id)) = author {
                let (warning_count, status): (i32, UserStatus) = sqlx::query_as(
                    "UPDATE users
                     SET warning_count = warning_count + 1,
                         status = CASE WHEN warning_count + 1 >= $2 THEN 'blocked' ELSE status END
                     WHERE id = $1
                     RETURNING warning_count, status",
                )
                .bind(user_id)
                .bind(WARNING_LIMIT)
                .fetch_one(&mut *tx)
                .await?;

                tracing::warn!(
                    "⚠️ user {} warned ({} of {})",
                    user_id,
                    warning_count,
                    WARNING_LIMIT
                );
                warned = Some((warning_count, status));
            }
        }
    }

    sqlx::query("UPDATE reports SET status = $1 WHERE id = $2")
        .bind(&action)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(json!({
        "message": "Report handled",
        "reportId": id,
        "action": action,
        "warning": warned.map(|(count, status)| json!({
            "warningCount": count,
            "status": status,
        })),
    })))
}

pub async fn warn_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let (warning_count, status): (i32, UserStatus) = sqlx::query_as(
        "UPDATE users
         SET warning_count = warning_count + 1,
             status = CASE WHEN warning_count + 1 >= $2 THEN 'blocked' ELSE status END
         WHERE id = $1
         RETURNING warning_count, status",
    )
    .bind(id)
    .bind(WARNING_LIMIT)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::UserNotFound)?;

    Ok(Json(json!({
        "userId": id,
        "warningCount": warning_count,
        "status": status,
    })))
}

pub async fn block_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let updated = sqlx::query("UPDATE users SET status = 'blocked' WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::UserNotFound);
    }

    Ok(Json(json!({ "userId": id, "status": UserStatus::Blocked })))
}

pub async fn unblock_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let updated = sqlx::query(
        "UPDATE users SET status = 'active', warning_count = 0 WHERE id = $1",
    )
    .bind(id)
    .execute(&state.db)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::UserNotFound);
    }

    Ok(Json(json!({ "userId": id, "status": UserStatus::Active })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_warning_blocks_the_account() {
        assert_eq!(WARNING_LIMIT, 3);
    }

    #[test]
    fn report_targets_map_to_content_tables() {
        assert_eq!(target_table("post"), Some("board_posts"));
        assert_eq!(target_table("comment"), Some("board_comments"));
        assert_eq!(target_table("chat"), Some("chat_messages"));
        // Betting reports have no content row to delete, only a warning.
        assert_eq!(target_table("betting"), None);
        assert_eq!(target_table("user"), None);
    }

    #[test]
    fn only_known_actions_and_targets_are_accepted() {
        assert!(REPORT_ACTIONS.contains(&"resolved"));
        assert!(REPORT_ACTIONS.contains(&"deleted"));
        assert!(!REPORT_ACTIONS.contains(&"escalated"));
        assert!(REPORT_TARGET_TYPES.contains(&"betting"));
        assert!(!REPORT_TARGET_TYPES.contains(&"profile"));
    }
}
