use axum::{extract::State, http::StatusCode, response::Json, Extension};
use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use validator::ValidateEmail;

use crate::errors::{AppError, Result};
use crate::models::user::{
    AuthResponse, ChangePassword, Claims, CreateUser, LoginUser, SocialLogin, UpdateProfile,
    User, UserResponse,
};
use crate::state::AppState;

const BCRYPT_COST: u32 = 12;
const MIN_PASSWORD_LEN: usize = 6;
const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

fn issue_token(state: &AppState, user_id: i64, username: &str) -> Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (Utc::now().timestamp() + TOKEN_TTL_SECS) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_ref()),
    )?;
    Ok(token)
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let username = payload
        .username
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Username, email and password are required"))?;
    let email = payload
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Username, email and password are required"))?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::invalid_data("Username, email and password are required"))?;

    if !email.validate_email() {
        return Err(AppError::invalid_data("Invalid email address"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_data(
            "Password must be at least 6 characters",
        ));
    }

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE username = $1 OR email = $2")
            .bind(&username)
            .bind(&email)
            .fetch_optional(&state.db)
            .await?;
    if existing.is_some() {
        return Err(AppError::conflict("Username or email already exists"));
    }

    let password_hash = hash(&password, BCRYPT_COST)?;
    let nickname = payload.nickname.unwrap_or_else(|| username.clone());

    let user: User = sqlx::query_as(
        "INSERT INTO users (username, email, password_hash, nickname)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(&username)
    .bind(&email)
    .bind(&password_hash)
    .bind(&nickname)
    .fetch_one(&state.db)
    .await?;

    let token = issue_token(&state, user.id, &user.username)?;
    tracing::info!("👤 registered user {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration complete".to_string(),
            user: UserResponse::from(&user),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginUser>,
) -> Result<Json<AuthResponse>> {
    let username = payload
        .username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::invalid_data("Username and password are required"))?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::invalid_data("Username and password are required"))?;

    // Identical error for unknown account and wrong password.
    let user: User = sqlx::query_as("SELECT * FROM users WHERE username = $1 OR email = $1")
        .bind(&username)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    // Social-only accounts have no hash and cannot password-login.
    let hash = user
        .password_hash
        .as_deref()
        .ok_or(AppError::InvalidCredentials)?;
    if !verify(&password, hash)? {
        return Err(AppError::InvalidCredentials);
    }

    sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
        .bind(user.id)
        .execute(&state.db)
        .await?;

    let token = issue_token(&state, user.id, &user.username)?;
    tracing::info!("🔑 user {} logged in", user.username);

    Ok(Json(AuthResponse {
        message: "Login complete".to_string(),
        user: UserResponse::from(&user),
        token,
    }))
}

/// Social login. The provider flow runs on the client; this endpoint
/// upserts the profile and issues the same token a password login gets.
pub async fn social_login(
    State(state): State<AppState>,
    Json(payload): Json<SocialLogin>,
) -> Result<Json<AuthResponse>> {
    let provider = payload
        .provider
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Provider and provider id are required"))?;
    let provider_id = payload
        .provider_id
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::invalid_data("Provider and provider id are required"))?;

    let existing: Option<User> =
        sqlx::query_as("SELECT * FROM users WHERE provider = $1 AND provider_id = $2")
            .bind(&provider)
            .bind(&provider_id)
            .fetch_optional(&state.db)
            .await?;

    let user = match existing {
        Some(user) => {
            sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
                .bind(user.id)
                .execute(&state.db)
                .await?;
            user
        }
        None => {
            let username = format!("{}_{}", provider, provider_id);
            let email = payload
                .email
                .unwrap_or_else(|| format!("{}@{}.social", provider_id, provider));
            let nickname = payload.nickname.unwrap_or_else(|| username.clone());

            sqlx::query_as(
                "INSERT INTO users (username, email, nickname, provider, provider_id, last_login)
                 VALUES ($1, $2, $3, $4, $5, NOW())
                 RETURNING *",
            )
            .bind(&username)
            .bind(&email)
            .bind(&nickname)
            .bind(&provider)
            .bind(&provider_id)
            .fetch_one(&state.db)
            .await?
        }
    };

    let token = issue_token(&state, user.id, &user.username)?;
    tracing::info!("🔑 social login via {} for user {}", provider, user.id);

    Ok(Json(AuthResponse {
        message: "Login complete".to_string(),
        user: UserResponse::from(&user),
        token,
    }))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Value>> {
    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(claims.sub)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "nickname": user.nickname,
        "created_at": user.created_at,
        "last_login": user.last_login,
    })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfile>,
) -> Result<Json<Value>> {
    if let Some(email) = &payload.email {
        if !email.validate_email() {
            return Err(AppError::invalid_data("Invalid email address"));
        }
    }

    let user: User = sqlx::query_as(
        "UPDATE users
         SET nickname = COALESCE($1, nickname), email = COALESCE($2, email)
         WHERE id = $3
         RETURNING *",
    )
    .bind(payload.nickname)
    .bind(payload.email)
    .bind(claims.sub)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::UserNotFound)?;

    Ok(Json(json!({
        "message": "Profile updated",
        "user": UserResponse::from(&user),
    })))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePassword>,
) -> Result<Json<Value>> {
    let current = payload
        .current_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::invalid_data("Current and new password are required"))?;
    let new = payload
        .new_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::invalid_data("Current and new password are required"))?;

    if new.len() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_data(
            "New password must be at least 6 characters",
        ));
    }

    let password_hash: Option<String> =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
            .bind(claims.sub)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::UserNotFound)?;
    let password_hash = password_hash
        .ok_or_else(|| AppError::invalid_data("This account has no password login"))?;

    if !verify(&current, &password_hash)? {
        return Err(AppError::invalid_data("Current password is incorrect"));
    }

    let new_hash = hash(&new, BCRYPT_COST)?;
    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(&new_hash)
        .bind(claims.sub)
        .execute(&state.db)
        .await?;

    Ok(Json(json!({ "message": "Password changed" })))
}
