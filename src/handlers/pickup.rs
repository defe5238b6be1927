//! Pickup QR codes, visible only to the book's borrower.

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{book::{Book, PickupResponse}, user::User},
    services::{catalog, users},
    utils::{
        jwt::CurrentUser,
        qr::{self, PickupNote},
    },
};

async fn load_for_borrower(
    pool: &SqlitePool,
    book_id: i64,
    user_id: i64,
    denied: &str,
) -> Result<(Book, User), AppError> {
    let book = catalog::get_book(pool, book_id).await?;
    if book.borrower_id != Some(user_id) {
        return Err(AppError::Forbidden(denied.to_string()));
    }
    let owner = users::get(pool, book.owner_id).await?;
    Ok((book, owner))
}

/// Pickup instructions and their QR code as inline SVG.
pub async fn show_qr(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(book_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let (book, owner) = load_for_borrower(
        &pool,
        book_id,
        user.id,
        "You are not allowed to view the QR code for this book.",
    )
    .await?;

    let instructions = qr::pickup_instructions(&book.title, &owner, PickupNote::Collect);
    let qr_svg = qr::render_svg(&instructions)?;

    Ok(Json(PickupResponse {
        book_id: book.id,
        title: book.title,
        instructions,
        qr_svg,
    }))
}

/// The QR code as a downloadable SVG file.
pub async fn download_qr(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(book_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let (book, owner) = load_for_borrower(
        &pool,
        book_id,
        user.id,
        "You are not allowed to download the QR code for this book.",
    )
    .await?;

    let instructions = qr::pickup_instructions(&book.title, &owner, PickupNote::Download);
    let svg = qr::render_svg(&instructions)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        qr::attachment_name(&book.title)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        svg,
    ))
}
