// src/handlers/auth.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, RegisterRequest},
    services::users,
    utils::{
        hash::{hash_password, verify_password},
        jwt::{CurrentUser, sign_jwt},
    },
};

/// Registers a new user and logs them straight in.
///
/// Returns 201 Created with the user (without password hash) and a token.
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hashed_password = hash_password(&payload.password)?;
    let user = users::create(&pool, &payload, &hashed_password).await?;

    let token = sign_jwt(user.id, &user.name, &config.jwt_secret, config.jwt_expiration)?;
    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful. Welcome!",
            "token": token,
            "type": "Bearer",
            "user": user,
        })),
    ))
}

/// Authenticates by email and password and returns a bearer token.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invalid = || AppError::AuthError("Invalid email or password".to_string());

    let user = users::find_by_email(&pool, &payload.email)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = sign_jwt(user.id, &user.name, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "message": "Logged in successfully!",
        "token": token,
        "type": "Bearer",
        "user": user,
    })))
}

/// Tokens are stateless; the client discards its copy.
pub async fn logout(user: CurrentUser) -> StatusCode {
    tracing::info!(user_id = user.id, "User logged out");
    StatusCode::NO_CONTENT
}

/// The current user's profile.
pub async fn me(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let user = users::get(&pool, user.id).await?;
    Ok(Json(user))
}
