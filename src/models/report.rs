use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Report {
    pub id: i64,
    pub target_type: String,
    pub target_id: i64,
    pub reason: String,
    pub message: Option<String>,
    pub user_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReport {
    pub target_type: Option<String>,
    pub target_id: Option<i64>,
    pub reason: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportAction {
    pub action: Option<String>,
}

pub const REPORT_TARGET_TYPES: [&str; 4] = ["post", "comment", "chat", "betting"];
pub const REPORT_ACTIONS: [&str; 2] = ["resolved", "deleted"];
