use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::user::{DashboardResponse, HistoryResponse},
    services::{catalog, interaction},
    utils::jwt::CurrentUser,
};

/// Current shelf, current loan and full history for the caller.
pub async fn dashboard(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();

    let owned_books = catalog::owned_on_shelf(&pool, user.id).await?;
    let borrowed_books = catalog::borrowed_by(&pool, user.id).await?;
    let has_overdue = borrowed_books
        .iter()
        .any(|book| book.due_date.is_some_and(|due| due < now));

    Ok(Json(DashboardResponse {
        owned_books,
        user_has_borrowed: !borrowed_books.is_empty(),
        borrowed_books,
        has_overdue,
        borrowed_history: catalog::borrowed_history(&pool, user.id).await?,
        lent_history: catalog::lent_history(&pool, user.id).await?,
        current_time: now,
    }))
}

/// Completed loans, most recent return first.
pub async fn history(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(HistoryResponse {
        borrowed_history: catalog::borrowed_history(&pool, user.id).await?,
        lent_history: catalog::lent_history(&pool, user.id).await?,
    }))
}

/// Books the caller has favorited.
pub async fn favorites(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let books = interaction::list_favorites(&pool, user.id).await?;
    Ok(Json(books))
}
