//! Borrow lifecycle of a single book.
//!
//! A book row carries its loan state in five columns (`is_borrowed`,
//! `borrower_id`, `due_date`, `returned`, `returned_at`). This module decodes
//! those columns into an explicit [`LoanState`], validates transitions, and
//! encodes the result back. Nothing here touches the database.

pub mod reminder;
pub mod state;

pub use reminder::{DueStatus, classify_due};
pub use state::{LoanColumns, LoanState};

use std::fmt;

/// Rule violations raised by lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LendingError {
    /// The book is currently out with a borrower.
    AlreadyBorrowed,
    /// The requesting user already holds an unreturned book.
    BorrowerHasBook,
    /// Only the current borrower may return a book.
    NotBorrower,
    /// Only the owner may delete a book.
    NotOwner,
    /// The persisted columns do not describe a valid state.
    InconsistentState(String),
}

impl std::error::Error for LendingError {}

impl fmt::Display for LendingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyBorrowed => write!(f, "Book is already borrowed."),
            Self::BorrowerHasBook => write!(f, "You can only borrow one book at a time."),
            Self::NotBorrower => write!(f, "You are not allowed to return this book."),
            Self::NotOwner => write!(f, "You are not allowed to delete this book."),
            Self::InconsistentState(msg) => write!(f, "Inconsistent loan state: {msg}"),
        }
    }
}

/// Owner gate for destructive operations.
pub fn ensure_owner(owner_id: i64, user_id: i64) -> Result<(), LendingError> {
    if owner_id == user_id {
        Ok(())
    } else {
        Err(LendingError::NotOwner)
    }
}
