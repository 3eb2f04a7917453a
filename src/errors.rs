// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // Same message for unknown user and wrong password, so login
    // failures cannot be used to enumerate accounts.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication token required")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Admin privileges required")]
    AdminRequired,

    #[error("Account is blocked")]
    AccountBlocked,

    #[error("Match not found")]
    MatchNotFound,

    #[error("Post not found")]
    PostNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Team not found")]
    TeamNotFound,

    #[error("Report not found")]
    ReportNotFound,

    #[error("Duplicate entry: {0}")]
    Conflict(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Service error: {0}")]
    ServiceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid username or password".to_string()),
            AppError::MissingToken => (StatusCode::UNAUTHORIZED, "Authentication token required".to_string()),
            AppError::InvalidToken => (StatusCode::FORBIDDEN, "Invalid or expired token".to_string()),
            AppError::AdminRequired => (StatusCode::FORBIDDEN, "Admin privileges required".to_string()),
            AppError::AccountBlocked => (StatusCode::FORBIDDEN, "Account is blocked".to_string()),
            AppError::MatchNotFound => (StatusCode::NOT_FOUND, "Match not found".to_string()),
            AppError::PostNotFound => (StatusCode::NOT_FOUND, "Post not found".to_string()),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            AppError::TeamNotFound => (StatusCode::NOT_FOUND, "Team not found".to_string()),
            AppError::ReportNotFound => (StatusCode::NOT_FOUND, "Report not found".to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::ExternalApi(_) => (StatusCode::BAD_GATEWAY, "External API error".to_string()),
            AppError::ConfigurationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error".to_string()),
            AppError::ServiceError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Service error".to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

// Manual From implementations
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ValidationError(format!("JSON parsing error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApi(format!("HTTP request failed: {}", err))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::ServiceError(format!("Password hashing failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_err: jsonwebtoken::errors::Error) -> Self {
        AppError::InvalidToken
    }
}

// Helper conversion functions
impl AppError {
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn external_api(msg: impl Into<String>) -> Self {
        AppError::ExternalApi(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::ConfigurationError(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        AppError::ServiceError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn rendered(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn login_failures_share_one_generic_message() {
        // Unknown account and wrong password both surface as this one
        // variant, so the response body cannot distinguish them.
        let (status, body) = rendered(AppError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid username or password");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn absent_entities_map_to_not_found() {
        for err in [
            AppError::MatchNotFound,
            AppError::PostNotFound,
            AppError::UserNotFound,
            AppError::TeamNotFound,
            AppError::ReportNotFound,
        ] {
            let (status, _) = rendered(err).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn duplicates_are_conflicts() {
        let (status, body) = rendered(AppError::conflict("Username or email already exists")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Username or email already exists");
    }

    #[tokio::test]
    async fn blocked_accounts_are_forbidden() {
        let (status, _) = rendered(AppError::AccountBlocked).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn token_errors_split_missing_from_invalid() {
        let (status, _) = rendered(AppError::MissingToken).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = rendered(AppError::InvalidToken).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
