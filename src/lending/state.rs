use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::LendingError;

/// Where a book is in its borrow lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoanState {
    /// Listed and never lent.
    #[default]
    Available,
    /// Out with `borrower_id` until `due_date`.
    Borrowed {
        borrower_id: i64,
        due_date: DateTime<Utc>,
    },
    /// Available again; the last borrower is kept for history.
    Returned {
        borrower_id: i64,
        returned_at: DateTime<Utc>,
    },
}

/// The persisted representation of a [`LoanState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanColumns {
    pub is_borrowed: bool,
    pub borrower_id: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub returned: bool,
    pub returned_at: Option<DateTime<Utc>>,
}

impl LoanState {
    /// Decodes the five loan columns, rejecting combinations no transition produces.
    pub fn from_columns(cols: &LoanColumns) -> Result<Self, LendingError> {
        match (cols.is_borrowed, cols.returned) {
            (true, true) => Err(LendingError::InconsistentState(
                "book is both borrowed and returned".to_string(),
            )),
            (true, false) => match (cols.borrower_id, cols.due_date) {
                (Some(borrower_id), Some(due_date)) => Ok(Self::Borrowed {
                    borrower_id,
                    due_date,
                }),
                _ => Err(LendingError::InconsistentState(
                    "borrowed book without borrower or due date".to_string(),
                )),
            },
            (false, true) => match (cols.borrower_id, cols.returned_at, cols.due_date) {
                (Some(borrower_id), Some(returned_at), None) => Ok(Self::Returned {
                    borrower_id,
                    returned_at,
                }),
                _ => Err(LendingError::InconsistentState(
                    "returned book must keep its borrower and return time, and have no due date"
                        .to_string(),
                )),
            },
            (false, false) => {
                if cols.borrower_id.is_some() || cols.due_date.is_some() || cols.returned_at.is_some()
                {
                    Err(LendingError::InconsistentState(
                        "available book carries loan data".to_string(),
                    ))
                } else {
                    Ok(Self::Available)
                }
            }
        }
    }

    pub fn to_columns(&self) -> LoanColumns {
        match *self {
            Self::Available => LoanColumns::default(),
            Self::Borrowed {
                borrower_id,
                due_date,
            } => LoanColumns {
                is_borrowed: true,
                borrower_id: Some(borrower_id),
                due_date: Some(due_date),
                returned: false,
                returned_at: None,
            },
            Self::Returned {
                borrower_id,
                returned_at,
            } => LoanColumns {
                is_borrowed: false,
                borrower_id: Some(borrower_id),
                due_date: None,
                returned: true,
                returned_at: Some(returned_at),
            },
        }
    }

    /// Lends the book to `borrower_id` for `loan_period` starting at `now`.
    ///
    /// Whether the borrower already holds another book is a cross-row rule and
    /// is checked by the caller.
    pub fn borrow(
        &self,
        borrower_id: i64,
        now: DateTime<Utc>,
        loan_period: Duration,
    ) -> Result<Self, LendingError> {
        match self {
            Self::Borrowed { .. } => Err(LendingError::AlreadyBorrowed),
            Self::Available | Self::Returned { .. } => Ok(Self::Borrowed {
                borrower_id,
                due_date: now + loan_period,
            }),
        }
    }

    /// Hands the book back. Only the current borrower may do this.
    pub fn return_by(&self, user_id: i64, now: DateTime<Utc>) -> Result<Self, LendingError> {
        match *self {
            Self::Borrowed { borrower_id, .. } if borrower_id == user_id => Ok(Self::Returned {
                borrower_id,
                returned_at: now,
            }),
            _ => Err(LendingError::NotBorrower),
        }
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed { .. })
    }

    /// Current borrower, if the book is out.
    pub fn current_borrower(&self) -> Option<i64> {
        match *self {
            Self::Borrowed { borrower_id, .. } => Some(borrower_id),
            _ => None,
        }
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(*self, Self::Borrowed { due_date, .. } if due_date < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn borrow_sets_due_date_a_week_out() {
        let state = LoanState::Available
            .borrow(7, t0(), Duration::days(7))
            .unwrap();

        assert_eq!(
            state,
            LoanState::Borrowed {
                borrower_id: 7,
                due_date: t0() + Duration::days(7),
            }
        );
        let cols = state.to_columns();
        assert!(cols.is_borrowed);
        assert_eq!(cols.borrower_id, Some(7));
        assert!(!cols.returned);
    }

    #[test]
    fn borrowed_book_cannot_be_borrowed_again() {
        let state = LoanState::Available
            .borrow(1, t0(), Duration::days(7))
            .unwrap();

        assert_eq!(
            state.borrow(2, t0(), Duration::days(7)),
            Err(LendingError::AlreadyBorrowed)
        );
    }

    #[test]
    fn return_keeps_borrower_and_clears_due_date() {
        let later = t0() + Duration::days(2);
        let state = LoanState::Available
            .borrow(3, t0(), Duration::days(7))
            .unwrap()
            .return_by(3, later)
            .unwrap();

        let cols = state.to_columns();
        assert!(!cols.is_borrowed);
        assert!(cols.returned);
        assert_eq!(cols.due_date, None);
        assert_eq!(cols.borrower_id, Some(3));
        assert_eq!(cols.returned_at, Some(later));
    }

    #[test]
    fn only_current_borrower_may_return() {
        let state = LoanState::Available
            .borrow(3, t0(), Duration::days(7))
            .unwrap();

        assert_eq!(state.return_by(4, t0()), Err(LendingError::NotBorrower));
        assert_eq!(
            LoanState::Available.return_by(3, t0()),
            Err(LendingError::NotBorrower)
        );
    }

    #[test]
    fn returned_book_can_be_lent_again_and_loses_returned_flag() {
        let state = LoanState::Returned {
            borrower_id: 3,
            returned_at: t0(),
        }
        .borrow(9, t0(), Duration::days(7))
        .unwrap();

        let cols = state.to_columns();
        assert!(cols.is_borrowed);
        assert!(!cols.returned);
        assert_eq!(cols.returned_at, None);
        assert_eq!(cols.borrower_id, Some(9));
    }

    #[test]
    fn columns_round_trip_for_each_state() {
        for state in [
            LoanState::Available,
            LoanState::Borrowed {
                borrower_id: 1,
                due_date: t0(),
            },
            LoanState::Returned {
                borrower_id: 1,
                returned_at: t0(),
            },
        ] {
            assert_eq!(LoanState::from_columns(&state.to_columns()), Ok(state));
        }
    }

    #[test]
    fn rejects_inconsistent_columns() {
        let both = LoanColumns {
            is_borrowed: true,
            borrower_id: Some(1),
            due_date: Some(t0()),
            returned: true,
            returned_at: Some(t0()),
        };
        assert!(LoanState::from_columns(&both).is_err());

        let borrowed_without_due = LoanColumns {
            is_borrowed: true,
            borrower_id: Some(1),
            ..LoanColumns::default()
        };
        assert!(LoanState::from_columns(&borrowed_without_due).is_err());
    }

    #[test]
    fn overdue_only_when_due_date_has_passed() {
        let state = LoanState::Borrowed {
            borrower_id: 1,
            due_date: t0(),
        };
        assert!(!state.is_overdue(t0() - Duration::seconds(1)));
        assert!(state.is_overdue(t0() + Duration::seconds(1)));
        assert!(!LoanState::Available.is_overdue(t0()));
    }
}
