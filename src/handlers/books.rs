// src/handlers/books.rs

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::book::{AvailableBooksResponse, BookDetail, NewBook, SearchParams},
    services::{catalog, interaction, lending},
    state::AppState,
    utils::{
        jwt::CurrentUser,
        upload::{cover_url, save_cover},
    },
};

/// Lists a new book owned by the caller.
///
/// Multipart form: `title`, `author`, optional `description`, optional
/// `cover_image` file.
pub async fn add_book(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = NewBook::default();
    let mut cover = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = field.text().await?,
            "author" => form.author = field.text().await?,
            "description" => form.description = Some(field.text().await?),
            "cover_image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen.
                if !file_name.is_empty() && !bytes.is_empty() {
                    cover = Some((file_name, bytes));
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    form.validate()?;

    let cover_image = match cover {
        Some((file_name, bytes)) => {
            Some(save_cover(&state.config.upload_dir, &form.title, &file_name, &bytes).await?)
        }
        None => None,
    };

    let book = catalog::create_book(&state.pool, user.id, &form, cover_image).await?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// Title/author substring search. A missing or empty `q` yields an empty list.
pub async fn search(
    State(pool): State<SqlitePool>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let books = catalog::search(&pool, params.q.as_deref().unwrap_or_default()).await?;
    Ok(Json(books))
}

/// Books the caller could borrow, with their favorite flags.
pub async fn available_books(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let books = catalog::available_for(&pool, user.id).await?;
    let user_has_borrowed = catalog::holds_book(&pool, user.id).await?;

    Ok(Json(AvailableBooksResponse {
        books,
        user_has_borrowed,
    }))
}

/// A single book with its loan state and reviews.
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let book = catalog::get_book(&state.pool, id).await?;
    let loan = book.loan_state()?;
    let reviews = interaction::reviews_for(&state.pool, id).await?;

    Ok(Json(BookDetail {
        cover_url: book
            .cover_image
            .as_deref()
            .and_then(|file| cover_url(&state.config.public_base_url, file)),
        average_rating: interaction::average_rating(&reviews),
        loan,
        reviews,
        book,
    }))
}

/// Owner-only delete.
pub async fn delete_book(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    lending::delete_book(&state, id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
