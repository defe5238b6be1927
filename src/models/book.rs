// src/models/book.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::lending::{LendingError, LoanColumns, LoanState};

use super::review::ReviewResponse;

/// Represents the 'books' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: Option<String>,

    /// File name under the upload directory.
    pub cover_image: Option<String>,

    /// Fixed at creation.
    pub owner_id: i64,

    // Loan columns; see `crate::lending::LoanState` for the valid combinations.
    pub borrower_id: Option<i64>,
    pub is_borrowed: bool,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub returned: bool,
    pub returned_at: Option<chrono::DateTime<chrono::Utc>>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Book {
    pub fn loan_columns(&self) -> LoanColumns {
        LoanColumns {
            is_borrowed: self.is_borrowed,
            borrower_id: self.borrower_id,
            due_date: self.due_date,
            returned: self.returned,
            returned_at: self.returned_at,
        }
    }

    pub fn loan_state(&self) -> Result<LoanState, LendingError> {
        LoanState::from_columns(&self.loan_columns())
    }

    /// The same book with its loan columns replaced by `state`.
    pub fn with_loan(self, state: &LoanState) -> Self {
        let cols = state.to_columns();
        Self {
            is_borrowed: cols.is_borrowed,
            borrower_id: cols.borrower_id,
            due_date: cols.due_date,
            returned: cols.returned,
            returned_at: cols.returned_at,
            ..self
        }
    }
}

/// A book on the "available" shelf, flagged with the viewer's favorite status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AvailableBook {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub book: Book,
    pub is_favorited: bool,
}

/// Response for the available-books listing.
#[derive(Debug, Serialize)]
pub struct AvailableBooksResponse {
    pub books: Vec<AvailableBook>,
    /// Whether the viewer already holds a book and therefore cannot borrow.
    pub user_has_borrowed: bool,
}

/// Single-book view with its reviews.
#[derive(Debug, Serialize)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub loan: LoanState,
    pub cover_url: Option<String>,
    pub average_rating: Option<f64>,
    pub reviews: Vec<ReviewResponse>,
}

/// Fields of the add-book form, collected from multipart parts.
#[derive(Debug, Default, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, max = 150, message = "Title must be between 1 and 150 chars"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Author must be between 1 and 100 chars"))]
    pub author: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

/// Query parameters for search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// DTO for emailing a book recommendation to a friend.
#[derive(Debug, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(email(message = "Please enter a valid email address."))]
    pub friend_email: String,
}

/// Pickup instructions shown to the borrower, with the QR rendering.
#[derive(Debug, Serialize)]
pub struct PickupResponse {
    pub book_id: i64,
    pub title: String,
    pub instructions: String,
    pub qr_svg: String,
}
