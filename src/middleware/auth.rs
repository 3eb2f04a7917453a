use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::errors::{AppError, Result};
use crate::models::user::{Claims, UserStatus};
use crate::state::AppState;

/// Bearer-token check. Missing token is 401, a token that does not
/// verify is 403; valid claims land in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = headers
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or(AppError::MissingToken)?;

    let decoding_key = DecodingKey::from_secret(state.config.jwt_secret.as_ref());

    let token_data = decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))
        .map_err(|_| AppError::InvalidToken)?;

    request.extensions_mut().insert(token_data.claims);

    Ok(next.run(request).await)
}

/// Rejects blocked accounts regardless of token validity. Runs after
/// `auth_middleware`.
pub async fn require_not_blocked(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(AppError::MissingToken)?;

    let status: UserStatus =
        sqlx::query_scalar("SELECT status FROM users WHERE id = $1")
            .bind(claims.sub)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::UserNotFound)?;

    if status == UserStatus::Blocked {
        tracing::warn!("blocked user {} rejected", claims.sub);
        return Err(AppError::AccountBlocked);
    }

    Ok(next.run(request).await)
}

/// Admin gate: the configured admin user id only.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or(AppError::MissingToken)?;

    if claims.sub != state.config.admin_user_id {
        return Err(AppError::AdminRequired);
    }

    Ok(next.run(request).await)
}
