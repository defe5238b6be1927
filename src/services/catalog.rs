//! Read-side book queries plus book creation.

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::{
    error::AppError,
    models::book::{AvailableBook, Book, NewBook},
    utils::html::clean_optional,
};

pub async fn create_book(
    pool: &SqlitePool,
    owner_id: i64,
    new_book: &NewBook,
    cover_image: Option<String>,
) -> Result<Book, AppError> {
    let book = sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO books (title, author, description, cover_image, owner_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(new_book.title.trim())
    .bind(new_book.author.trim())
    .bind(clean_optional(new_book.description.as_deref()))
    .bind(cover_image)
    .bind(owner_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create book: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(book_id = book.id, owner_id, "Book listed");
    Ok(book)
}

pub async fn find_book<'e, E>(executor: E, id: i64) -> Result<Option<Book>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Like [`find_book`] but a missing row is a 404.
pub async fn get_book<'e, E>(executor: E, id: i64) -> Result<Book, AppError>
where
    E: SqliteExecutor<'e>,
{
    find_book(executor, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
}

/// Books on the shelf that `viewer_id` could borrow: not lent out, not their own.
pub async fn available_for(
    pool: &SqlitePool,
    viewer_id: i64,
) -> Result<Vec<AvailableBook>, sqlx::Error> {
    sqlx::query_as::<_, AvailableBook>(
        r#"
        SELECT b.*, (f.user_id IS NOT NULL) AS is_favorited
        FROM books b
        LEFT JOIN favorites f ON f.book_id = b.id AND f.user_id = ?
        WHERE b.is_borrowed = 0 AND b.owner_id != ?
        ORDER BY b.created_at DESC, b.id DESC
        "#,
    )
    .bind(viewer_id)
    .bind(viewer_id)
    .fetch_all(pool)
    .await
}

/// The user's own books that are not currently lent out.
pub async fn owned_on_shelf(pool: &SqlitePool, owner_id: i64) -> Result<Vec<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(
        "SELECT * FROM books WHERE owner_id = ? AND is_borrowed = 0 ORDER BY id",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

/// Books the user currently holds. At most one under normal operation.
pub async fn borrowed_by(pool: &SqlitePool, borrower_id: i64) -> Result<Vec<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(
        "SELECT * FROM books WHERE borrower_id = ? AND is_borrowed = 1 ORDER BY due_date",
    )
    .bind(borrower_id)
    .fetch_all(pool)
    .await
}

/// Whether the user holds an unreturned book.
pub async fn holds_book<'e, E>(executor: E, user_id: i64) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let held: i64 = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM books WHERE borrower_id = ? AND is_borrowed = 1)",
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;
    Ok(held != 0)
}

/// Completed loans where the user was the borrower, latest return first.
pub async fn borrowed_history(pool: &SqlitePool, user_id: i64) -> Result<Vec<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(
        "SELECT * FROM books WHERE borrower_id = ? AND returned = 1 ORDER BY returned_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Completed loans of the user's own books, latest return first.
pub async fn lent_history(pool: &SqlitePool, user_id: i64) -> Result<Vec<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(
        "SELECT * FROM books WHERE owner_id = ? AND returned = 1 ORDER BY returned_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring match over title and author.
/// An empty query matches nothing; any other query, whitespace included, is
/// matched as typed.
pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<Book>, sqlx::Error> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let pattern = format!("%{}%", escape_like(&query.to_lowercase()));

    sqlx::query_as::<_, Book>(
        r#"
        SELECT * FROM books
        WHERE lower(title) LIKE ? ESCAPE '\' OR lower(author) LIKE ? ESCAPE '\'
        ORDER BY title
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("hobbit"), "hobbit");
    }
}
