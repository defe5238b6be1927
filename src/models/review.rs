use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'reviews' table in the database.
/// Reviews are never edited; a user may leave several for the same book.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting a review.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,

    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: Option<String>,
}

/// DTO for displaying a review with its author's name.
#[derive(Debug, Serialize, FromRow)]
pub struct ReviewResponse {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub reviewer_name: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
