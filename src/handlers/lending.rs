// src/handlers/lending.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{error::AppError, services::lending, state::AppState, utils::jwt::CurrentUser};

/// Borrow a book for the configured loan period.
pub async fn borrow_book(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let book = lending::borrow(&state, id, user.id).await?;

    Ok(Json(json!({
        "message": "✅ Book borrowed! Please go to the owner's class during lunch break.",
        "qr_url": format!("/api/books/{}/qr", book.id),
        "book": book,
    })))
}

/// Return a borrowed book. Only the current borrower may do this.
pub async fn return_book(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let book = lending::return_book(&state, id, user.id).await?;

    Ok(Json(json!({
        "message": "✅ Book returned.",
        "book": book,
    })))
}
