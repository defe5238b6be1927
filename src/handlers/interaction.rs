use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{book::RecommendRequest, review::CreateReviewRequest},
    notify::{NotificationDispatcher, templates},
    services::{catalog, interaction},
    utils::jwt::CurrentUser,
};

/// Toggle Favorite on a book.
pub async fn toggle_favorite(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(book_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let favorited = interaction::toggle_favorite(&pool, user.id, book_id).await?;

    let message = if favorited {
        "❤️ Added to favorites!"
    } else {
        "💔 Removed from favorites."
    };
    Ok(Json(json!({ "favorited": favorited, "message": message })))
}

/// Submit a review. Users may review the same book more than once.
pub async fn create_review(
    State(pool): State<SqlitePool>,
    user: CurrentUser,
    Path(book_id): Path<i64>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let review = interaction::add_review(&pool, user.id, book_id, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "✅ Thanks for your review!", "review": review })),
    ))
}

/// List all reviews for a book.
pub async fn list_reviews(
    State(pool): State<SqlitePool>,
    Path(book_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    catalog::get_book(&pool, book_id).await?;
    let reviews = interaction::reviews_for(&pool, book_id).await?;
    Ok(Json(reviews))
}

/// Email a friend about a book.
pub async fn recommend_book(
    State(pool): State<SqlitePool>,
    State(notifier): State<NotificationDispatcher>,
    user: CurrentUser,
    Path(book_id): Path<i64>,
    Json(payload): Json<RecommendRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let book = catalog::get_book(&pool, book_id).await?;

    let friend = payload.friend_email.trim();
    notifier.dispatch(templates::recommendation(
        friend,
        &user.name,
        &book.title,
        &book.author,
    ));

    Ok(Json(json!({ "message": format!("✅ Book recommended to {friend}!") })))
}
