//! Borrow, return and delete, each in its own write transaction.

use chrono::{Duration, Utc};

use crate::{
    db,
    error::{AppError, is_unique_violation},
    lending::{LendingError, LoanState, ensure_owner},
    models::book::Book,
    notify::templates,
    services::{catalog, users},
    state::AppState,
    utils::qr::{self, PickupNote},
};

/// Lends `book_id` to `user_id` for the configured loan period and notifies
/// the owner with the pickup code.
pub async fn borrow(state: &AppState, book_id: i64, user_id: i64) -> Result<Book, AppError> {
    let now = Utc::now();
    let mut tx = db::begin_write(&state.pool).await?;

    let book = catalog::get_book(&mut *tx, book_id).await?;
    let current = book.loan_state()?;

    if current.is_borrowed() {
        return Err(LendingError::AlreadyBorrowed.into());
    }
    if catalog::holds_book(&mut *tx, user_id).await? {
        return Err(LendingError::BorrowerHasBook.into());
    }

    let next = current.borrow(user_id, now, Duration::days(state.config.loan_days))?;
    write_loan(&mut tx, book_id, &next, Guard::OnShelf)
        .await
        .map_err(|e| match e {
            WriteError::Stale => AppError::from(LendingError::AlreadyBorrowed),
            WriteError::Db(e) if is_unique_violation(&e) => LendingError::BorrowerHasBook.into(),
            WriteError::Db(e) => e.into(),
        })?;

    tx.commit().await?;

    let book = book.with_loan(&next);
    tracing::info!(book_id, borrower_id = user_id, due_date = ?book.due_date, "Book borrowed");

    if let Err(e) = notify_borrowed(state, &book, user_id).await {
        tracing::warn!(book_id, "Could not prepare borrow notification: {}", e);
    }
    Ok(book)
}

/// Hands `book_id` back. Only the current borrower may do this; the borrower
/// stays on the row for history.
pub async fn return_book(state: &AppState, book_id: i64, user_id: i64) -> Result<Book, AppError> {
    let now = Utc::now();
    let mut tx = db::begin_write(&state.pool).await?;

    let book = catalog::get_book(&mut *tx, book_id).await?;
    let next = book.loan_state()?.return_by(user_id, now)?;

    write_loan(&mut tx, book_id, &next, Guard::HeldBy(user_id))
        .await
        .map_err(|e| match e {
            WriteError::Stale => AppError::from(LendingError::NotBorrower),
            WriteError::Db(e) => e.into(),
        })?;

    tx.commit().await?;

    let book = book.with_loan(&next);
    tracing::info!(book_id, borrower_id = user_id, "Book returned");

    if let Err(e) = notify_returned(state, &book, user_id).await {
        tracing::warn!(book_id, "Could not prepare return notification: {}", e);
    }
    Ok(book)
}

/// Removes a book. Only the owner may do this. A book that is currently out
/// is deleted all the same.
pub async fn delete_book(state: &AppState, book_id: i64, user_id: i64) -> Result<(), AppError> {
    let mut tx = db::begin_write(&state.pool).await?;

    let book = catalog::get_book(&mut *tx, book_id).await?;
    ensure_owner(book.owner_id, user_id)?;

    if book.is_borrowed {
        tracing::warn!(
            book_id,
            borrower_id = ?book.borrower_id,
            "Deleting a book that is still lent out"
        );
    }

    sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(book_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(book_id, owner_id = user_id, "Book deleted");

    if let Some(cover) = &book.cover_image {
        let path = state.config.upload_dir.join(cover);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), "Could not remove cover image: {}", e);
        }
    }
    Ok(())
}

enum WriteError {
    /// The guard matched no row: someone else changed the book first.
    Stale,
    Db(sqlx::Error),
}

/// What the row must still look like for the write to apply.
enum Guard {
    OnShelf,
    HeldBy(i64),
}

/// Stores `state` on the row, but only while `guard` still holds.
async fn write_loan(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    book_id: i64,
    state: &LoanState,
    guard: Guard,
) -> Result<(), WriteError> {
    let cols = state.to_columns();
    let (condition, holder) = match guard {
        Guard::OnShelf => ("is_borrowed = 0", None),
        Guard::HeldBy(user_id) => ("is_borrowed = 1 AND borrower_id = ?", Some(user_id)),
    };
    let sql = format!(
        "UPDATE books
         SET is_borrowed = ?, borrower_id = ?, due_date = ?, returned = ?, returned_at = ?
         WHERE id = ? AND {condition}"
    );

    let mut query = sqlx::query(&sql)
        .bind(cols.is_borrowed)
        .bind(cols.borrower_id)
        .bind(cols.due_date)
        .bind(cols.returned)
        .bind(cols.returned_at)
        .bind(book_id);
    if let Some(user_id) = holder {
        query = query.bind(user_id);
    }

    let result = query.execute(&mut **tx).await.map_err(WriteError::Db)?;

    if result.rows_affected() == 0 {
        Err(WriteError::Stale)
    } else {
        Ok(())
    }
}

async fn notify_borrowed(state: &AppState, book: &Book, borrower_id: i64) -> Result<(), AppError> {
    let owner = users::get(&state.pool, book.owner_id).await?;
    let borrower = users::get(&state.pool, borrower_id).await?;

    let instructions = qr::pickup_instructions(&book.title, &owner, PickupNote::Collect);
    let svg = match qr::render_svg(&instructions) {
        Ok(svg) => Some(svg),
        Err(e) => {
            tracing::warn!(book_id = book.id, "Sending borrow notice without QR: {}", e);
            None
        }
    };

    state
        .notifier
        .dispatch(templates::borrowed(&owner, &borrower, &book.title, svg));
    Ok(())
}

async fn notify_returned(state: &AppState, book: &Book, borrower_id: i64) -> Result<(), AppError> {
    let owner = users::get(&state.pool, book.owner_id).await?;
    let borrower = users::get(&state.pool, borrower_id).await?;

    state
        .notifier
        .dispatch(templates::returned(&owner, &book.title, &borrower.name));
    Ok(())
}
