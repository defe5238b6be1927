//! Due-date and overdue sweeps, run out-of-band by `lending-sweep`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    lending::{DueStatus, classify_due},
    models::{book::Book, user::User},
    notify::{NotificationDispatcher, templates},
    services::users,
};

/// A lent-out book together with both parties.
#[derive(Debug, Clone)]
pub struct ActiveLoan {
    pub book: Book,
    pub due_date: DateTime<Utc>,
    pub borrower: User,
    pub owner: User,
}

/// Counts of notices queued by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub due_soon: usize,
    pub overdue: usize,
}

/// Every book currently out, with its borrower and owner loaded.
pub async fn active_loans(pool: &SqlitePool) -> Result<Vec<ActiveLoan>, AppError> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT * FROM books WHERE is_borrowed = 1 AND due_date IS NOT NULL ORDER BY due_date",
    )
    .fetch_all(pool)
    .await?;

    let mut people: HashMap<i64, User> = HashMap::new();
    let mut loans = Vec::with_capacity(books.len());

    for book in books {
        let (Some(borrower_id), Some(due_date)) = (book.borrower_id, book.due_date) else {
            continue;
        };
        let borrower = cached_user(pool, &mut people, borrower_id).await?;
        let owner = cached_user(pool, &mut people, book.owner_id).await?;
        loans.push(ActiveLoan {
            book,
            due_date,
            borrower,
            owner,
        });
    }
    Ok(loans)
}

async fn cached_user(
    pool: &SqlitePool,
    cache: &mut HashMap<i64, User>,
    id: i64,
) -> Result<User, AppError> {
    if let Some(user) = cache.get(&id) {
        return Ok(user.clone());
    }
    let user = users::get(pool, id).await?;
    cache.insert(id, user.clone());
    Ok(user)
}

/// Reminds borrowers whose book is due within the next day.
pub fn send_due_reminders(
    loans: &[ActiveLoan],
    notifier: &NotificationDispatcher,
    now: DateTime<Utc>,
) -> usize {
    let mut sent = 0;
    for loan in loans {
        if classify_due(loan.due_date, now) == DueStatus::DueSoon {
            notifier.dispatch(templates::due_soon(&loan.borrower, &loan.owner, &loan.book.title));
            sent += 1;
        }
    }
    tracing::info!(count = sent, "Due reminders queued");
    sent
}

/// Alerts both borrower and owner for every book past its due date.
pub fn send_overdue_alerts(
    loans: &[ActiveLoan],
    notifier: &NotificationDispatcher,
    now: DateTime<Utc>,
) -> usize {
    let mut sent = 0;
    for loan in loans {
        if classify_due(loan.due_date, now) == DueStatus::Overdue {
            notifier.dispatch(templates::overdue_to_borrower(
                &loan.borrower,
                &loan.owner,
                &loan.book.title,
            ));
            notifier.dispatch(templates::overdue_to_owner(
                &loan.owner,
                &loan.borrower,
                &loan.book.title,
            ));
            sent += 1;
        }
    }
    tracing::info!(count = sent, "Overdue alerts queued");
    sent
}

/// Runs the selected sweeps over the current loans.
pub async fn sweep(
    pool: &SqlitePool,
    notifier: &NotificationDispatcher,
    now: DateTime<Utc>,
    due: bool,
    overdue: bool,
) -> Result<SweepReport, AppError> {
    let loans = active_loans(pool).await?;
    let mut report = SweepReport::default();
    if due {
        report.due_soon = send_due_reminders(&loans, notifier, now);
    }
    if overdue {
        report.overdue = send_overdue_alerts(&loans, notifier, now);
    }
    Ok(report)
}
