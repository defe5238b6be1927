//! Favorites and reviews. Neither touches the loan columns.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    db,
    error::AppError,
    models::{
        book::Book,
        review::{CreateReviewRequest, Review, ReviewResponse},
    },
    services::catalog,
    utils::html::clean_optional,
};

/// Adds or removes the book from the user's favorites.
/// Returns whether the book is a favorite afterwards.
pub async fn toggle_favorite(pool: &SqlitePool, user_id: i64, book_id: i64) -> Result<bool, AppError> {
    let mut tx = db::begin_write(pool).await?;

    catalog::get_book(&mut *tx, book_id).await?;

    let removed = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND book_id = ?")
        .bind(user_id)
        .bind(book_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed == 0 {
        sqlx::query("INSERT INTO favorites (user_id, book_id, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(book_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(removed == 0)
}

pub async fn list_favorites(pool: &SqlitePool, user_id: i64) -> Result<Vec<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(
        r#"
        SELECT b.*
        FROM favorites f
        JOIN books b ON b.id = f.book_id
        WHERE f.user_id = ?
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn add_review(
    pool: &SqlitePool,
    user_id: i64,
    book_id: i64,
    req: &CreateReviewRequest,
) -> Result<Review, AppError> {
    catalog::get_book(pool, book_id).await?;

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (book_id, user_id, rating, comment, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(book_id)
    .bind(user_id)
    .bind(req.rating)
    .bind(clean_optional(req.comment.as_deref()))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    tracing::info!(book_id, user_id, rating = review.rating, "Review added");
    Ok(review)
}

/// Reviews of a book, newest first, with reviewer names.
pub async fn reviews_for(pool: &SqlitePool, book_id: i64) -> Result<Vec<ReviewResponse>, sqlx::Error> {
    sqlx::query_as::<_, ReviewResponse>(
        r#"
        SELECT r.id, r.book_id, r.user_id, u.name AS reviewer_name,
               r.rating, r.comment, r.created_at
        FROM reviews r
        JOIN users u ON u.id = r.user_id
        WHERE r.book_id = ?
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(book_id)
    .fetch_all(pool)
    .await
}

/// Mean rating over a set of reviews, `None` when there are none.
pub fn average_rating(reviews: &[ReviewResponse]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: i64 = reviews.iter().map(|r| r.rating).sum();
    Some(total as f64 / reviews.len() as f64)
}
