use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::{
    error::{AppError, is_unique_violation},
    models::user::{RegisterRequest, User},
};

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Like [`find_by_id`] but a missing row is a 404.
pub async fn get<'e, E>(executor: E, id: i64) -> Result<User, AppError>
where
    E: SqliteExecutor<'e>,
{
    find_by_id(executor, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await
}

/// Inserts a new account. A taken email is a 409.
pub async fn create(
    pool: &SqlitePool,
    req: &RegisterRequest,
    password_hash: &str,
) -> Result<User, AppError> {
    let email = normalize_email(&req.email);

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, name, class_name, division, roll_no, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&email)
    .bind(password_hash)
    .bind(req.name.trim())
    .bind(req.class_name.trim())
    .bind(req.division.trim())
    .bind(req.roll_no.trim())
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Email already registered.".to_string())
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })
}

/// Addresses are stored and compared lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
