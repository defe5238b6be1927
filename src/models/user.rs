// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::book::Book;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique login address; notifications go here.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password_hash: String,

    pub name: String,
    pub class_name: String,
    pub division: String,
    pub roll_no: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// "10-B" style class label used in pickup instructions and emails.
    pub fn class_label(&self) -> String {
        format!("{}-{}", self.class_name, self.division)
    }
}

/// DTO for registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required."), length(max = 150))]
    pub email: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    #[validate(length(min = 1, max = 150, message = "Name is required."))]
    pub name: String,
    #[validate(length(min = 1, max = 10))]
    pub class_name: String,
    #[validate(length(min = 1, max = 10))]
    pub division: String,
    #[validate(length(min = 1, max = 10))]
    pub roll_no: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Everything the dashboard shows for the current user.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Owned books that are currently on the shelf.
    pub owned_books: Vec<Book>,
    pub borrowed_books: Vec<Book>,
    pub user_has_borrowed: bool,
    pub has_overdue: bool,
    pub borrowed_history: Vec<Book>,
    pub lent_history: Vec<Book>,
    pub current_time: chrono::DateTime<chrono::Utc>,
}

/// Completed loans, most recently returned first.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub borrowed_history: Vec<Book>,
    pub lent_history: Vec<Book>,
}
